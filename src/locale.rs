//! Applies a postal code to the browsing session so regional pricing and
//! availability are reflected on subsequent page loads.
//!
//! Every interactive micro-step is bounded at roughly one second. Failure
//! anywhere in the sequence leaves the session unlocalized and is reported
//! to the caller as `false`, never raised.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::Tab;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Bounded wait for each interactive micro-step.
const STEP_TIMEOUT: Duration = Duration::from_secs(1);

const LOCATION_POPOVER: &str = "#nav-global-location-popover-link";
const POSTAL_INPUT: &str = "#GLUXZipUpdateInput";

/// Attempt the full location-change sequence. Returns `true` only when every
/// step completed; on any failure the cause is logged and `false` is
/// returned so the pipeline can proceed unlocalized.
pub async fn set_location(tab: &Arc<Tab>, postal_code: &str) -> bool {
    match try_set_location(tab, postal_code).await {
        Ok(()) => {
            info!(zip = postal_code, "location set");
            true
        }
        Err(e) => {
            error!(zip = postal_code, error = ?e, "failed to set location");
            false
        }
    }
}

async fn try_set_location(tab: &Arc<Tab>, postal_code: &str) -> Result<()> {
    let popover = tab
        .wait_for_element_with_custom_timeout(LOCATION_POPOVER, STEP_TIMEOUT)
        .context("location control not present")?;
    popover.click().context("location control not clickable")?;

    let input = tab
        .wait_for_element_with_custom_timeout(POSTAL_INPUT, STEP_TIMEOUT)
        .context("postal code input not present")?;
    input.click().context("postal code input not clickable")?;
    tab.type_str(postal_code).context("could not type postal code")?;

    confirm(tab, "Apply")?;
    sleep(Duration::from_millis(500)).await;

    // A follow-up confirmation dialog is dismissed the same way.
    confirm(tab, "Continue")?;
    sleep(Duration::from_secs(1)).await;

    Ok(())
}

/// Click the first visible button whose label contains `label`; when no such
/// button exists, fall back to a keyboard confirm.
fn confirm(tab: &Arc<Tab>, label: &str) -> Result<()> {
    if click_button_with_text(tab, label)? {
        return Ok(());
    }
    warn!(label, "confirm button not found, falling back to Enter");
    tab.press_key("Enter").context("keyboard confirm failed")?;
    Ok(())
}

/// Text-matched button click, done in page context because the confirm
/// controls carry no stable ids across page variants.
fn click_button_with_text(tab: &Arc<Tab>, label: &str) -> Result<bool> {
    let script = format!(
        r#"
        (() => {{
            const needle = "{label}";
            const candidates = document.querySelectorAll("button, input[type='submit'], .a-button-input");
            for (const btn of candidates) {{
                const text = (btn.textContent || btn.value || "").trim();
                if (text.includes(needle) && btn.offsetParent !== null) {{
                    btn.click();
                    return "clicked";
                }}
            }}
            return "not_found";
        }})();
        "#
    );

    let result = tab
        .evaluate(&script, false)
        .with_context(|| format!("probing for {label:?} button"))?;
    Ok(matches!(result.value, Some(Value::String(s)) if s == "clicked"))
}
