//! Browser cookie export loading.
//!
//! Session establishment is delegated to the browser: the operator logs in
//! and exports the site's cookies as JSON (Cookie-Editor and similar
//! extensions produce an array of objects). Only `name` and `value` are
//! used; they are folded into a single `Cookie` request header.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct BrowserCookie {
    name: String,
    value: String,
}

/// Build a `Cookie` header value from a JSON cookie export.
///
/// # Errors
///
/// Returns `CookiesNotFound` if the file is missing and `Config` if it is
/// not a non-empty cookie array.
pub fn load_cookie_header(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::CookiesNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    cookie_header_from_json(&content)
}

/// Build a `Cookie` header value from JSON text.
///
/// # Errors
///
/// Returns `Config` if the text is not a cookie array or the array is
/// empty.
pub fn cookie_header_from_json(content: &str) -> Result<String> {
    let cookies: Vec<BrowserCookie> = serde_json::from_str(content)
        .map_err(|e| Error::Config(format!("cookie file is not a JSON cookie export: {e}")))?;
    if cookies.is_empty() {
        return Err(Error::Config("cookie file contains no cookies".to_string()));
    }

    Ok(cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; "))
}
