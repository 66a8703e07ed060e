//! Rule construction.
//!
//! # Responsibilities
//! - Collect source pattern, destination template, method set, filter
//! - Compile at build time so misconfiguration fails at wiring time,
//!   never mid-request
//! - Per-method constructors as a fixed verb table

use std::collections::HashSet;

use http::Method;

use crate::engine::handler::Rewriter;
use crate::error::RewriteError;
use crate::filter::Filter;
use crate::pattern::{CompiledPattern, SourcePattern};

/// Method applicability of a rule.
#[derive(Debug, Clone, Default)]
pub enum MethodSet {
    /// Wildcard: the rule applies to every method.
    #[default]
    Any,
    /// Only the listed methods.
    Only(HashSet<Method>),
}

impl MethodSet {
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            MethodSet::Any => true,
            MethodSet::Only(set) => set.contains(method),
        }
    }
}

/// Builder for a [`Rewriter`].
///
/// `new` enables matching mode; `to` substitutes purely from route
/// parameters bound by an outer router. The per-method constructors pin
/// the verb and ignore later `methods` calls.
pub struct Rewrite {
    source: Option<SourcePattern>,
    destination: String,
    methods: Vec<String>,
    pinned: Option<Method>,
    filter: Option<Filter>,
}

macro_rules! method_constructors {
    ($(($name:ident, $to_name:ident, $verb:ident)),* $(,)?) => {
        $(
            /// Matching-mode rule pinned to this verb.
            pub fn $name(
                source: impl Into<SourcePattern>,
                destination: impl Into<String>,
            ) -> Self {
                Self::pinned(Method::$verb, Some(source.into()), destination.into())
            }

            /// Pure-substitution rule pinned to this verb.
            pub fn $to_name(destination: impl Into<String>) -> Self {
                Self::pinned(Method::$verb, None, destination.into())
            }
        )*
    };
}

impl Rewrite {
    /// Matching mode: rewrite paths matching `source` into `destination`.
    pub fn new(source: impl Into<SourcePattern>, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            destination: destination.into(),
            methods: Vec::new(),
            pinned: None,
            filter: None,
        }
    }

    /// Pure-substitution mode: rewrite into `destination` using route
    /// parameters bound by the outer router.
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            source: None,
            destination: destination.into(),
            methods: Vec::new(),
            pinned: None,
            filter: None,
        }
    }

    fn pinned(method: Method, source: Option<SourcePattern>, destination: String) -> Self {
        Self {
            source,
            destination,
            methods: Vec::new(),
            pinned: Some(method),
            filter: None,
        }
    }

    method_constructors!(
        (get, get_to, GET),
        (post, post_to, POST),
        (put, put_to, PUT),
        (delete, delete_to, DELETE),
        (patch, patch_to, PATCH),
        (head, head_to, HEAD),
        (options, options_to, OPTIONS),
        (trace, trace_to, TRACE),
        (connect, connect_to, CONNECT),
    );

    /// Restrict the rule to one method, case-insensitive. `*` restores
    /// the wildcard.
    pub fn method(self, method: impl AsRef<str>) -> Self {
        self.methods([method])
    }

    /// Restrict the rule to the listed methods, case-insensitive.
    /// Ignored on per-method constructors, which pin the verb.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.pinned.is_none() {
            self.methods = methods
                .into_iter()
                .map(|m| m.as_ref().to_owned())
                .collect();
        }
        self
    }

    /// Attach an async veto filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Compile the rule. Fails on a malformed pattern or method token.
    pub fn build(self) -> Result<Rewriter, RewriteError> {
        let methods = match self.pinned {
            Some(method) => MethodSet::Only(HashSet::from([method])),
            None => parse_methods(&self.methods)?,
        };
        let source = self.source.map(CompiledPattern::compile).transpose()?;

        Ok(Rewriter::assemble(
            source,
            self.destination,
            methods,
            self.filter,
        ))
    }
}

fn parse_methods(tokens: &[String]) -> Result<MethodSet, RewriteError> {
    let mut set = HashSet::new();
    for token in tokens {
        if token == "*" {
            return Ok(MethodSet::Any);
        }
        let method = Method::from_bytes(token.to_ascii_uppercase().as_bytes())
            .map_err(|_| RewriteError::Method(token.clone()))?;
        set.insert(method);
    }

    if set.is_empty() {
        Ok(MethodSet::Any)
    } else {
        Ok(MethodSet::Only(set))
    }
}
