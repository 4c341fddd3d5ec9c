mod browser;
mod extract;
mod locale;
mod pipeline;
mod regions;
mod selectors;
mod sink;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::pipeline::RunConfig;
use crate::regions::Region;
use crate::sink::CsvSink;

const SELLER_URL_DEFAULT: &str = "https://www.amazon.co.uk/sp?seller=A01609602H16VOVDUKH19";

#[derive(Debug, Parser)]
#[command(
    name = "seller-snapshot",
    version,
    about = "Capture one localized product snapshot from a marketplace seller's storefront"
)]
struct Cli {
    /// Target region; controls the postal code applied to the session
    #[arg(long, value_enum, default_value_t = Region::Uk)]
    country: Region,

    /// Seller profile URL to start from
    #[arg(long, default_value = SELLER_URL_DEFAULT)]
    seller: String,

    /// CSV log the captured row is appended to
    #[arg(long, value_name = "FILE", default_value = "out.csv")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    info!(
        country = cli.country.code(),
        zip = cli.country.postal_code(),
        seller = %cli.seller,
        "starting snapshot run"
    );

    let sink = CsvSink::new(&cli.output);
    sink.ensure_initialized()?;

    let browser = browser::launch()?;
    let tab = browser.new_tab()?;

    let config = RunConfig {
        region: cli.country,
        seller_url: cli.seller,
    };

    // Unexpected failures are logged with their stage context rather than
    // panicking out of the process; the browser is released on drop on every
    // exit path.
    if let Err(e) = pipeline::run(&tab, &config, &sink).await {
        error!(error = ?e, "snapshot run failed");
    }

    Ok(())
}
