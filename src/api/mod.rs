//! Site HTTP module.
//!
//! This module provides:
//! - HTTP client for page and image requests
//! - Redirect resolution for lookup URLs

pub mod client;

pub use client::{Document, WebtoonClient, DEFAULT_USER_AGENT, SITE_BASE};
