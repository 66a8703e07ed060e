//! Source pattern compilation.
//!
//! # Responsibilities
//! - Turn a path template or prebuilt regex into a matcher
//! - Record one capture descriptor per group, left to right
//! - Fail at rule construction, never per request
//!
//! # Design Decisions
//! - Templates anchor at both ends with an optional trailing slash
//! - Matching runs against the path component only, query excluded
//! - The template grammar covers the capture and substitution contract
//!   (`:name`, `:name?`, raw `(...)` groups, `*`), not full template
//!   language parity; raw groups are passed through verbatim, so nested
//!   or non-capturing groups inside them are the caller's business

use regex::Regex;
use tracing::debug;

use crate::error::RewriteError;
use crate::pattern::captures::{CaptureDescriptor, CaptureIndex, CaptureName, MatchResult};

/// A user-supplied source pattern.
#[derive(Debug, Clone)]
pub enum SourcePattern {
    /// Path template, e.g. `/user/:id` or `/old/(\d+)`.
    Template(String),
    /// Prebuilt regular expression, adopted as-is (no re-anchoring).
    Regex(Regex),
}

impl From<&str> for SourcePattern {
    fn from(template: &str) -> Self {
        SourcePattern::Template(template.to_owned())
    }
}

impl From<String> for SourcePattern {
    fn from(template: String) -> Self {
        SourcePattern::Template(template)
    }
}

impl From<Regex> for SourcePattern {
    fn from(regex: Regex) -> Self {
        SourcePattern::Regex(regex)
    }
}

/// A compiled source pattern: the matcher plus capture bookkeeping.
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
    descriptors: Vec<CaptureDescriptor>,
    index: CaptureIndex,
}

impl CompiledPattern {
    /// Compile a source pattern. Fails fast so misconfiguration is caught
    /// at wiring time.
    pub fn compile(pattern: SourcePattern) -> Result<Self, RewriteError> {
        let (regex, descriptors) = match pattern {
            SourcePattern::Template(template) => {
                let (source, descriptors) = translate(&template);
                let regex = Regex::new(&source).map_err(|err| RewriteError::Pattern {
                    pattern: template,
                    source: err,
                })?;
                (regex, descriptors)
            }
            SourcePattern::Regex(regex) => {
                let descriptors = descriptors_of(&regex);
                (regex, descriptors)
            }
        };

        let index = CaptureIndex::build(&descriptors);
        debug!(
            pattern = %regex.as_str(),
            groups = descriptors.len(),
            "compiled source pattern"
        );

        Ok(Self {
            regex,
            descriptors,
            index,
        })
    }

    /// Apply the matcher to a path. `None` means the rule does not apply
    /// and the caller continues without error.
    pub fn matches(&self, path: &str) -> Option<MatchResult> {
        let captures = self.regex.captures(path)?;
        let slots = (0..captures.len())
            .map(|slot| captures.get(slot).map(|m| m.as_str().to_owned()))
            .collect();
        Some(MatchResult::new(slots))
    }

    pub fn capture_index(&self) -> &CaptureIndex {
        &self.index
    }

    pub fn descriptors(&self) -> &[CaptureDescriptor] {
        &self.descriptors
    }
}

/// Translate a path template into regex source plus descriptors.
fn translate(template: &str) -> (String, Vec<CaptureDescriptor>) {
    let bytes = template.as_bytes();
    let mut source = String::with_capacity(template.len() + 8);
    source.push('^');
    let mut descriptors = Vec::new();
    let mut anonymous = 0usize;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b':' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len()
                    && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                if end == start {
                    // lone ':' is a literal
                    source.push(':');
                    i += 1;
                    continue;
                }

                let name = &template[start..end];
                let optional = bytes.get(end) == Some(&b'?');
                let group = format!("(?P<{name}>[^/]+)");
                if optional && source.ends_with('/') {
                    // fold the separator into the optional group so
                    // `/a/:id?` also matches `/a`
                    source.pop();
                    source.push_str("(?:/");
                    source.push_str(&group);
                    source.push_str(")?");
                } else if optional {
                    source.push_str("(?:");
                    source.push_str(&group);
                    source.push_str(")?");
                } else {
                    source.push_str(&group);
                }

                descriptors.push(CaptureDescriptor {
                    name: CaptureName::Named(name.to_owned()),
                    position: descriptors.len(),
                });
                i = end + usize::from(optional);
            }
            b'(' => {
                // raw group, copied through verbatim; unbalanced parens
                // fall through to the regex compiler, which reports them
                let mut depth = 0usize;
                let mut j = i;
                while j < bytes.len() {
                    match bytes[j] {
                        b'\\' => j += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    j += 1;
                }
                let end = (j + 1).min(bytes.len());
                source.push_str(&template[i..end]);
                descriptors.push(CaptureDescriptor {
                    name: CaptureName::Index(anonymous),
                    position: descriptors.len(),
                });
                anonymous += 1;

                if bytes.get(end) == Some(&b'?') {
                    source.push('?');
                    i = end + 1;
                } else {
                    i = end;
                }
            }
            b'*' => {
                source.push_str("(.*)");
                descriptors.push(CaptureDescriptor {
                    name: CaptureName::Index(anonymous),
                    position: descriptors.len(),
                });
                anonymous += 1;
                i += 1;
            }
            _ => {
                let rest = &template[i..];
                if let Some(ch) = rest.chars().next() {
                    push_literal(&mut source, ch);
                    i += ch.len_utf8();
                } else {
                    break;
                }
            }
        }
    }

    source.push_str("/?$");
    (source, descriptors)
}

fn push_literal(source: &mut String, ch: char) {
    if matches!(
        ch,
        '\\' | '.' | '+' | '?' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
    ) {
        source.push('\\');
    }
    source.push(ch);
}

/// Descriptors for a prebuilt regex, taken from its group list.
fn descriptors_of(regex: &Regex) -> Vec<CaptureDescriptor> {
    let mut anonymous = 0usize;
    regex
        .capture_names()
        .skip(1) // entry 0 is the whole match, not a group
        .enumerate()
        .map(|(position, name)| CaptureDescriptor {
            name: match name {
                Some(name) => CaptureName::Named(name.to_owned()),
                None => {
                    let ordinal = anonymous;
                    anonymous += 1;
                    CaptureName::Index(ordinal)
                }
            },
            position,
        })
        .collect()
}
