// src/scrape/manage.rs
use tracing::debug;

use super::fields::{anchors, input_value};
use crate::config::consts::{ALERTS_UI_MARKER, NO_ALERTS_MARKER};
use crate::core::html::{TagBlocks, to_lower};
use crate::core::sanitize::fold_term;
use crate::data::{AlertEntry, Directory, FormContext};
use crate::error::ScrapeError;

const ROW_CLASS: &str = "data_row";

/// Parse the alerts manage page into a complete `Directory`.
///
/// Form tokens are checked before any row is read, so a page that lost its
/// `sig` or `e` field never yields a partial directory.
pub fn parse_management_page(html: &str) -> Result<Directory, ScrapeError> {
    if !html.contains(ALERTS_UI_MARKER) {
        return Err(ScrapeError::NotAuthenticated);
    }

    let form = extract_form_context(html)?;

    if html.contains(NO_ALERTS_MARKER) {
        debug!("manage page reports no alerts");
        return Ok(Directory::empty(form));
    }

    let mut dir = Directory::empty(form);
    for (open, row) in TagBlocks::new(html, "tr") {
        if !to_lower(open).contains(ROW_CLASS) {
            continue;
        }
        let Some(entry) = parse_row(row) else {
            debug!(row_len = row.len(), "skipping data row without a term");
            continue;
        };
        if dir.entries.contains_key(&entry.term) {
            debug!(term = %entry.term, "duplicate term on manage page, keeping last");
        }
        dir.entries.insert(entry.term.clone(), entry);
    }

    debug!(alerts = dir.len(), "parsed manage page");
    Ok(dir)
}

pub(super) fn extract_form_context(html: &str) -> Result<FormContext, ScrapeError> {
    let sig = input_value(html, "hidden", "sig").ok_or(ScrapeError::MissingFormToken("sig"))?;
    let email = input_value(html, "hidden", "e").ok_or(ScrapeError::MissingFormToken("e"))?;
    Ok(FormContext { sig, email })
}

fn parse_row(row: &str) -> Option<AlertEntry> {
    let mut term = None;
    let mut feed_url = None;

    for (href, text) in anchors(row) {
        let h = to_lower(&href);
        let is_news =
            h.starts_with("http://news.google.com") || h.starts_with("https://news.google.com");
        if term.is_none() && is_news {
            term = Some(text);
        } else if feed_url.is_none() && text.eq_ignore_ascii_case("feed") {
            feed_url = Some(href);
        }
    }

    let term = fold_term(&term?);
    if term.is_empty() {
        return None;
    }

    Some(AlertEntry {
        term,
        feed_url,
        deletion_token: input_value(row, "checkbox", "s"),
    })
}
