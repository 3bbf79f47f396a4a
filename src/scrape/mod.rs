// src/scrape/mod.rs
//
// All knowledge of the alerts markup lives here. Everything above this
// module sees `Directory`, `FormContext` and plain tokens only.

mod fields;
mod forms;
mod manage;

pub use forms::{confirm_redirect, parse_create_alert_form};
pub use manage::parse_management_page;
