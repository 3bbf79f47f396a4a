// src/data.rs
//
// Values scraped from the alerts pages.
//
// - FormContext: the two hidden tokens every mutation must echo back.
// - AlertEntry: one row of the manage table, keyed by its folded term.
// - Directory: one complete read of the manage page. Never merged,
//              only replaced by the next read.

use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormContext {
    pub sig: String,
    pub email: String, // the `e` field
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertEntry {
    pub term: String,
    pub feed_url: Option<String>,
    pub deletion_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directory {
    pub form: FormContext,
    pub entries: BTreeMap<String, AlertEntry>,
}

/// term → feed URL, the shape callers see from `list()`.
pub type AlertList = BTreeMap<String, Option<String>>;

impl Directory {
    pub fn empty(form: FormContext) -> Self {
        Self { form, entries: BTreeMap::new() }
    }

    pub fn get(&self, term: &str) -> Option<&AlertEntry> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn to_list(&self) -> AlertList {
        self.entries
            .iter()
            .map(|(term, entry)| (term.clone(), entry.feed_url.clone()))
            .collect()
    }
}

/// Outcome of `purge_all`.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub attempted: usize,
    pub removed: Vec<String>,
    pub failed: Vec<(String, crate::error::MutationError)>,
}

impl PurgeReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
