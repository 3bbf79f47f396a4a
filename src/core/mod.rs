// src/core/mod.rs

pub mod cookies;
pub mod html;
pub mod net;
pub mod sanitize;

pub use net::{HttpTransport, Method, Request, Transport};
