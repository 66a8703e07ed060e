//! Destination template expansion.
//!
//! Substitution is a pure function over the template and a token
//! resolver; no scan state survives a call, so expansion is reentrant
//! across concurrent requests.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)|:(\w+)").expect("token pattern is valid"));

/// One substitution token found in a destination template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'t> {
    /// `$n` — 1-based match slot in matching mode, or the params entry
    /// keyed by the digits otherwise. `$0` is the whole match.
    Slot(usize),
    /// `:name` — named capture or params entry.
    Name(&'t str),
}

/// Expand every `$n` / `:name` token through `resolve`. An unresolved
/// token becomes the empty string, never an error.
pub fn expand<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(Token<'_>) -> Option<String>,
{
    TOKEN
        .replace_all(template, |caps: &Captures<'_>| {
            let token = if let Some(digits) = caps.get(1) {
                match digits.as_str().parse::<usize>() {
                    Ok(slot) => Token::Slot(slot),
                    Err(_) => return String::new(),
                }
            } else {
                match caps.get(2) {
                    Some(name) => Token::Name(name.as_str()),
                    None => return String::new(),
                }
            };
            resolve(token).unwrap_or_default()
        })
        .into_owned()
}
