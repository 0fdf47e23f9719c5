use std::cell::Cell;

use miix_core::GrantNotifier;

/// Prints short codes to the terminal. Reports cancellation once `max_codes`
/// codes have been shown.
pub(crate) struct TerminalNotifier {
    verification_url: String,
    max_codes: Option<u32>,
    shown: Cell<u32>,
}

impl TerminalNotifier {
    pub(crate) fn new(host: &str, max_codes: Option<u32>) -> Self {
        Self {
            verification_url: verification_url(host),
            max_codes,
            shown: Cell::new(0),
        }
    }
}

impl GrantNotifier for TerminalNotifier {
    fn prompt(&self, code: &str) {
        self.shown.set(self.shown.get() + 1);
        println!("Visit: {}", self.verification_url);
        println!("Code: {code}");
    }

    fn is_cancelled(&self) -> bool {
        self.max_codes
            .is_some_and(|max_codes| self.shown.get() >= max_codes)
    }
}

/// The page where codes are entered lives at `/go` on the host's origin.
pub(crate) fn verification_url(host: &str) -> String {
    match reqwest::Url::parse(host).and_then(|url| url.join("/go")) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}/go", host.trim_end_matches('/')),
    }
}
