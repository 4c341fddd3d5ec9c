//! CSS selectors for the seller, storefront and product pages.
//!
//! Marketplace markup changes without notice. When extraction starts coming
//! back empty, update the selectors here and extend the fixtures in
//! `extract`.

use once_cell::sync::Lazy;
use scraper::Selector;

/// Storefront link on the seller profile page.
pub static STOREFRONT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#seller-info-storefront-link > span > a").unwrap());

/// Listing containers carrying an item identifier on storefront pages.
pub static LISTING: Lazy<Selector> = Lazy::new(|| Selector::parse("div[data-asin]").unwrap());

/// Attribute holding the item identifier on a listing container.
pub static ITEM_ID_ATTR: &str = "data-asin";

/// Product page title element.
pub static PRODUCT_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("#productTitle").unwrap());

/// One named price source. Strategies are probed in declaration order and
/// the first non-empty match wins; a strategy that fails to parse or match
/// never suppresses the ones after it.
pub struct PriceStrategy {
    pub name: &'static str,
    pub css: &'static str,
}

/// Most specific price source first, decreasingly specific fallbacks after.
pub static PRICE_STRATEGIES: [PriceStrategy; 3] = [
    PriceStrategy {
        name: "core-price",
        css: "#corePrice_feature_div span.a-offscreen",
    },
    PriceStrategy {
        name: "offer-span",
        css: "span.a-price span.a-offscreen",
    },
    PriceStrategy {
        name: "legacy-block",
        css: "#priceblock_ourprice",
    },
];
