//! Resource addresses in the management model.
//!
//! An address is an ordered list of `(type, name)` pairs. Two textual forms
//! are accepted by [`ResourceAddress::parse`]:
//!
//! - slash pairs: `subsystem/datasources/data-source/ExampleDS`
//! - CLI pairs: `/subsystem=datasources/data-source=ExampleDS`
//!
//! CLI pairs are only recognised behind a leading `/`. Slash pairs keep any
//! `=` inside a token, as in `deployment/app=1.war`.
//!
//! [`Display`](std::fmt::Display) always writes the slash-pair form, so
//! `parse(address.to_string())` yields the same address.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One `(type, name)` step of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Child type, e.g. `data-source`
    pub kind: String,
    /// Child name, e.g. `ExampleDS`
    pub name: String,
}

/// Parsed, immutable resource address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceAddress {
    segments: Vec<Segment>,
}

impl ResourceAddress {
    /// The root resource of an endpoint.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse an address.
    ///
    /// `""` and `"/"` are the root. A leading `/` whose first token holds a
    /// `=` selects CLI pairs, where every token must be `type=name`.
    /// Anything else is split on `/` alone, so names may contain `=`.
    /// Fails with [`Error::MalformedAddress`] when a segment is empty or the
    /// tokens do not pair up.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let cli_form = trimmed.starts_with('/');
        let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let body = body.strip_suffix('/').unwrap_or(body);

        if body.is_empty() {
            return Ok(Self::root());
        }

        let tokens: Vec<&str> = body.split('/').collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(Error::malformed(raw, "empty segment"));
        }

        if cli_form && tokens[0].contains('=') {
            return Self::from_cli_pairs(raw, &tokens);
        }

        if tokens.len() % 2 != 0 {
            return Err(Error::malformed(
                raw,
                format!("odd number of segments ({})", tokens.len()),
            ));
        }

        let segments = tokens
            .chunks(2)
            .map(|pair| Segment {
                kind: pair[0].to_string(),
                name: pair[1].to_string(),
            })
            .collect();

        Ok(Self { segments })
    }

    fn from_cli_pairs(raw: &str, tokens: &[&str]) -> Result<Self> {
        let segments = tokens
            .iter()
            .map(|token| match token.split_once('=') {
                Some((kind, name)) if !kind.is_empty() && !name.is_empty() && !name.contains('=') => {
                    Ok(Segment {
                        kind: kind.to_string(),
                        name: name.to_string(),
                    })
                }
                _ => Err(Error::malformed(raw, format!("invalid pair '{token}'"))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// The `(type, name)` pairs, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the root address.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render in CLI syntax, e.g. `/subsystem=datasources`.
    ///
    /// The root renders as the empty string, so root operations come out as
    /// `:read-resource(...)`.
    pub fn to_cli(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}={}", s.kind, s.name))
            .collect()
    }

    /// Find the node this address names inside a recursive dump.
    ///
    /// Walks `tree[type][name]` for each segment. Returns `None` when a step
    /// is missing or the node is null.
    pub fn locate<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        let mut node = tree;
        for segment in &self.segments {
            node = node.get(&segment.kind)?.get(&segment.name)?;
        }
        (!node.is_null()).then_some(node)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}/{}", segment.kind, segment.name)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
