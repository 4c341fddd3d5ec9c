//! Pure extraction over captured page snapshots.
//!
//! Every function here works on HTML already pulled out of the tab, so the
//! uncertain part (third-party page structure) is probed without touching
//! the live session. Leaf steps report absence as a normal data outcome;
//! only faults that mean the snapshot itself is unusable surface as
//! `Failed`, and the orchestrator decides what that costs the run.

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::selectors;

/// Three-way outcome of a leaf extraction step. The orchestrator classifies
/// `NotFound` as a gate failure or a soft miss depending on the stage;
/// `Failed` is reserved for faults indicating a broken snapshot rather than
/// an absent element.
#[derive(Debug)]
pub enum StepOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

/// Resolve the seller's storefront link against the current page URL.
/// A missing element or empty href is `NotFound`; a page URL that does not
/// parse as a base is a broken snapshot and reported as `Failed`.
pub fn storefront_url(html: &str, page_url: &str) -> StepOutcome<String> {
    let doc = Html::parse_document(html);
    let href = match doc
        .select(&selectors::STOREFRONT_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
    {
        Some(h) if !h.is_empty() => h,
        _ => return StepOutcome::NotFound,
    };

    match Url::parse(page_url).and_then(|base| base.join(href)) {
        Ok(abs) => StepOutcome::Found(abs.to_string()),
        Err(e) => StepOutcome::Failed(format!(
            "cannot resolve storefront href {href:?} against {page_url:?}: {e}"
        )),
    }
}

/// Whether a candidate is a valid item identifier: exactly 10 alphanumeric
/// ASCII characters. Anything else is treated as not-found.
pub fn is_item_id(candidate: &str) -> bool {
    candidate.len() == 10 && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

/// First listing in document order whose identifier attribute satisfies the
/// item-id format. First match wins; later listings are never compared.
pub fn first_item_id(html: &str) -> StepOutcome<String> {
    let doc = Html::parse_document(html);
    for listing in doc.select(&selectors::LISTING) {
        if let Some(id) = listing.value().attr(selectors::ITEM_ID_ATTR) {
            if is_item_id(id) {
                return StepOutcome::Found(id.to_string());
            }
        }
    }
    StepOutcome::NotFound
}

/// Absolute product page URL for an item id, resolved against the storefront
/// page URL. This is URL arithmetic on the live page URL, not a DOM probe,
/// so a parse failure is unexpected and propagates.
pub fn product_url(page_url: &str, item_id: &str) -> anyhow::Result<String> {
    let path = format!("/dp/{item_id}");
    let abs = Url::parse(page_url)
        .and_then(|base| base.join(&path))
        .map_err(|e| anyhow::anyhow!("cannot resolve {path:?} against {page_url:?}: {e}"))?;
    Ok(abs.to_string())
}

/// Product page fields. Either side may come back empty: a title miss never
/// blocks price extraction, and a price miss is a normal outcome.
pub fn product_fields(html: &str) -> (String, String) {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&selectors::PRODUCT_TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let price = price_with_fallback(&doc);
    (title, price)
}

fn price_with_fallback(doc: &Html) -> String {
    for strategy in &selectors::PRICE_STRATEGIES {
        let selector = match Selector::parse(strategy.css) {
            Ok(s) => s,
            Err(e) => {
                warn!(strategy = strategy.name, error = ?e, "price selector did not parse, trying next");
                continue;
            }
        };
        if let Some(el) = doc.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                debug!(strategy = strategy.name, "price strategy matched");
                return text;
            }
        }
    }
    String::new()
}
