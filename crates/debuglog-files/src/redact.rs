//! Scrubbing of rendered messages before they reach disk

use once_cell::sync::Lazy;
use regex::Regex;

/// `scheme://user:password@` - the password is replaced
static URL_CREDENTIALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z][a-z0-9+.\-]*://[^\s:/@]+):[^\s/@]+@").expect("valid regex")
});

/// npm granular/automation access tokens
static NPM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnpm_[A-Za-z0-9]{36}\b").expect("valid regex"));

/// Replace ANSI escape introducers and redact credentials
pub fn sanitize(message: &str) -> String {
    let printable = message.replace(['\u{1b}', '\u{9b}'], "^[");
    let redacted = URL_CREDENTIALS.replace_all(&printable, "${1}:***@");
    NPM_TOKEN.replace_all(&redacted, "npm_***").into_owned()
}
