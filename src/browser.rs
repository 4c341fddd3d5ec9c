use std::ffi::OsStr;

use anyhow::Result;
use headless_chrome::{Browser, LaunchOptions};

/// Fixed desktop user agent. Regional pages must render the desktop layout
/// the selectors expect.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const VIEWPORT: (u32, u32) = (1366, 768);

/// Launch a headless Chrome session with the fixed user agent and viewport.
/// The returned browser owns the Chrome process; dropping it releases the
/// session on every exit path, including panics.
pub fn launch() -> Result<Browser> {
    let ua_arg = format!("--user-agent={USER_AGENT}");
    let args = vec![
        OsStr::new("--headless=new"),
        OsStr::new("--no-sandbox"),
        OsStr::new("--disable-dev-shm-usage"),
        OsStr::new("--disable-blink-features=AutomationControlled"),
        OsStr::new("--ignore-certificate-errors"),
        OsStr::new(&ua_arg),
    ];

    let browser = Browser::new(LaunchOptions {
        headless: false, // new headless mode is passed via args
        window_size: Some(VIEWPORT),
        args,
        ..Default::default()
    })?;

    Ok(browser)
}
