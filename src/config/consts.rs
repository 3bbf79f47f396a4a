// src/config/consts.rs

// Accounts endpoints
pub const LOGIN_REFERER: &str = "https://www.google.com/accounts/Login";
pub const LOGIN_AUTH_URL: &str = "https://www.google.com/accounts/LoginAuth";
pub const CHECK_COOKIE_URL: &str = "https://www.google.com/accounts/CheckCookie?chtml=LoginDoneHtml";

// Alerts endpoints
pub const ALERTS_REFERER: &str = "http://www.google.com/alerts";
pub const CREATE_FORM_URL: &str = "http://www.google.com/alerts?hl=en&gl=us";
pub const CREATE_URL: &str = "http://www.google.com/alerts/create?hl=en&gl=us";
pub const MANAGE_URL: &str = "http://www.google.com/alerts/manage?hl=en&gl=us";
pub const SAVE_URL: &str = "http://www.google.com/alerts/save?hl=en&gl=us";

// Page markers
pub const LOGIN_DONE_MARKER: &str = "LoginDoneHtml";
pub const COOKIE_CONFIRMED_MARKER: &str = "ManageAccount";
pub const ALERTS_UI_MARKER: &str = "conditionallySetSingleSelectValue";
pub const NO_ALERTS_MARKER: &str = "You don't have any Google Alerts";
pub const MOVED_MARKER: &str = "The document has moved";

// Fixed form codes
pub const SEARCH_TYPE_COMPREHENSIVE: &str = "7";
pub const DELIVERY_FEED: &str = "feed";
pub const DELETE_ACTION: &str = "Delete";

// Client defaults
pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 5.1)";
pub const COOKIE_FILE_PREFIX: &str = "alert_scrape.";
pub const COOKIE_FILE_EXT: &str = "cookie";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// The alerts write path lags its read path; anything under 2s races it.
pub const SETTLE_DELAY_MS: u64 = 2_000;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
