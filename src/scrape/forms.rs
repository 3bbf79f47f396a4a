// src/scrape/forms.rs
use super::fields::input_value;
use crate::config::consts::{ALERTS_UI_MARKER, MOVED_MARKER};
use crate::error::ScrapeError;

/// `sig` from the create-alert form page.
pub fn parse_create_alert_form(html: &str) -> Result<String, ScrapeError> {
    if !html.contains(ALERTS_UI_MARKER) {
        return Err(ScrapeError::NotAuthenticated);
    }
    input_value(html, "hidden", "sig").ok_or(ScrapeError::MissingFormToken("sig"))
}

/// True when a mutation POST came back as the "moved" redirect body,
/// the only acceptance signal the alerts endpoints give.
pub fn confirm_redirect(html: &str) -> bool {
    html.contains(MOVED_MARKER)
}
