//! Cookie collaborator interface.
//!
//! Parsing of `Cookie` header attributes is left to the caller; the parser
//! only hands over the raw header value once the request has been validated.

use crate::error::Result;

/// A single cookie as produced by a [`CookieParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl Cookie {
    /// Creates a cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Turns a raw `Cookie` header into cookie records.
///
/// Called once per request, after all header checks passed, with an empty
/// string when no `Cookie` header was sent. An error does not fail the
/// handshake: the request simply carries no cookies.
pub trait CookieParser {
    /// Parses the raw header value.
    fn parse_cookies(&self, raw: &str) -> Result<Vec<Cookie>>;
}

impl<F> CookieParser for F
where
    F: Fn(&str) -> Result<Vec<Cookie>>,
{
    fn parse_cookies(&self, raw: &str) -> Result<Vec<Cookie>> {
        self(raw)
    }
}

/// Stub for a cookie parser that never finds any cookie.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCookies;

impl CookieParser for NoCookies {
    fn parse_cookies(&self, _raw: &str) -> Result<Vec<Cookie>> {
        Ok(Vec::new())
    }
}
