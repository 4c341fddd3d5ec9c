//! Sequences one capture: localize, resolve storefront, locate a listing,
//! extract fields, persist.
//!
//! Gate-versus-soft classification lives here, centrally: leaf steps only
//! report found / not-found / failed. A missing storefront or listing is an
//! expected gate failure and still persists a partial row; only navigation
//! faults and broken snapshots propagate to the caller.

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use headless_chrome::Tab;
use tracing::{info, warn};

use crate::extract::{self, StepOutcome};
use crate::locale;
use crate::regions::Region;
use crate::sink::{CsvSink, ResultRow};

pub struct RunConfig {
    pub region: Region,
    pub seller_url: String,
}

/// Pipeline stages, in the order a complete run passes through them. Both
/// abort branches (missing storefront, missing listing) still reach
/// `Persisted` with a partial row.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Init,
    LocationAttempted,
    StorefrontResolved,
    ProductLocated,
    FieldsExtracted,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::LocationAttempted => "location_attempted",
            Stage::StorefrontResolved => "storefront_resolved",
            Stage::ProductLocated => "product_located",
            Stage::FieldsExtracted => "fields_extracted",
            Stage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Run one capture end to end. Every run that gets past navigation appends
/// exactly one row, complete or partial. An unexpected failure returns an
/// error to the caller; fields already collected are not written in that
/// case and nothing further is attempted.
pub async fn run(tab: &Arc<Tab>, config: &RunConfig, sink: &CsvSink) -> Result<()> {
    let mut row = base_row(config);

    info!(stage = %Stage::Init, url = %config.seller_url, "opening seller page");
    goto(tab, &config.seller_url)?;

    info!("setting location");
    if !locale::set_location(tab, config.region.postal_code()).await {
        warn!("continuing unlocalized");
    }

    info!(stage = %Stage::LocationAttempted, "resolving storefront link");
    let storefront = match extract::storefront_url(
        &snapshot(tab, Stage::LocationAttempted)?,
        &tab.get_url(),
    ) {
        StepOutcome::Found(url) => url,
        StepOutcome::NotFound => {
            warn!("storefront not found, persisting partial row");
            return persist(sink, &row);
        }
        StepOutcome::Failed(detail) => {
            return Err(anyhow!(detail)).context("resolving storefront link")
        }
    };

    info!(url = %storefront, "opening storefront");
    goto(tab, &storefront)?;

    info!(stage = %Stage::StorefrontResolved, "locating first listing");
    let item_id = match extract::first_item_id(&snapshot(tab, Stage::StorefrontResolved)?) {
        StepOutcome::Found(id) => id,
        StepOutcome::NotFound => {
            warn!("no qualifying listing, persisting partial row");
            return persist(sink, &row);
        }
        StepOutcome::Failed(detail) => return Err(anyhow!(detail)).context("locating listing"),
    };

    let product_url = extract::product_url(&tab.get_url(), &item_id)?;
    info!(url = %product_url, "opening product page");
    goto(tab, &product_url)?;
    row.product_url = product_url;

    info!(stage = %Stage::ProductLocated, "extracting product fields");
    let (title, price) = extract::product_fields(&snapshot(tab, Stage::ProductLocated)?);
    if title.is_empty() {
        warn!("title not found");
    }
    if price.is_empty() {
        warn!("price not found");
    }
    row.title = title;
    row.price = price;

    info!(stage = %Stage::FieldsExtracted, "persisting row");
    persist(sink, &row)?;

    let shown: String = row.title.chars().take(50).collect();
    info!(stage = %Stage::Persisted, title = %shown, price = %row.price, "saved");
    Ok(())
}

/// Seller-side fields are known up front; product fields fill in as stages
/// succeed and stay empty on a gate failure.
fn base_row(config: &RunConfig) -> ResultRow {
    ResultRow {
        country: config.region.code().to_string(),
        zip: config.region.postal_code().to_string(),
        seller_url: config.seller_url.clone(),
        product_url: String::new(),
        title: String::new(),
        price: String::new(),
    }
}

fn goto(tab: &Arc<Tab>, url: &str) -> Result<()> {
    tab.navigate_to(url)
        .with_context(|| format!("navigating to {url}"))?;
    tab.wait_until_navigated()
        .with_context(|| format!("waiting for {url} to load"))?;
    Ok(())
}

fn snapshot(tab: &Arc<Tab>, stage: Stage) -> Result<String> {
    tab.get_content()
        .with_context(|| format!("capturing page content at stage {stage}"))
}

fn persist(sink: &CsvSink, row: &ResultRow) -> Result<()> {
    sink.append_row(row).context("appending result row")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_row_has_seller_fields_only() {
        let config = RunConfig {
            region: Region::Es,
            seller_url: "https://www.amazon.es/sp?seller=A0SELLER01".to_string(),
        };
        let row = base_row(&config);
        assert_eq!(row.country, "es");
        assert_eq!(row.zip, "28001");
        assert_eq!(row.seller_url, "https://www.amazon.es/sp?seller=A0SELLER01");
        assert!(row.product_url.is_empty());
        assert!(row.title.is_empty());
        assert!(row.price.is_empty());
    }
}
