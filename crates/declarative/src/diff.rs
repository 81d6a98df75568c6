//! Attribute diff between a resource's current and desired options
//!
//! The result is the ordered list of `undefine-attribute` and
//! `write-attribute` operations that moves the current attributes to the
//! desired ones. Order is significant: it is the literal command sequence
//! sent to the endpoint.

use mgmtkit::{Command, Options, ResourceAddress, render_value};
use serde_json::Value;
use std::fmt;

/// Desired value that asks for an attribute to be cleared.
///
/// A caller cannot desire the literal string `"undefined"`.
pub const UNDEFINED: &str = "undefined";

/// One attribute operation
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeOp {
    /// `undefine-attribute(name=...)`
    Undefine { name: String },
    /// `write-attribute(name=..., value=...)`
    Write { name: String, value: Value },
}

impl AttributeOp {
    /// Attribute this operation touches
    pub fn name(&self) -> &str {
        match self {
            Self::Undefine { name } | Self::Write { name, .. } => name,
        }
    }

    /// Format as a management command against `address`
    pub fn to_command(&self, address: &ResourceAddress) -> Command {
        match self {
            Self::Undefine { name } => Command::undefine_attribute(address.clone(), name),
            Self::Write { name, value } => {
                Command::write_attribute(address.clone(), name, value.clone())
            }
        }
    }
}

impl fmt::Display for AttributeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefine { name } => write!(f, "undefine {name}"),
            Self::Write { name, value } => write!(f, "{name} = {}", render_value(value)),
        }
    }
}

/// Whether a desired value is the undefine sentinel
pub fn is_undefined(value: &Value) -> bool {
    value.as_str() == Some(UNDEFINED)
}

/// Whether a current value counts as set
fn is_tracked(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

/// Compare a current and a desired value.
///
/// Scalars compare by their textual form, so `"10"` matches `10` and
/// `"true"` matches `true`. When either side is a number, both sides are
/// also compared as numbers, so `1.0` matches `1` and `"1"`. Lists and
/// objects compare structurally.
pub fn values_match(current: &Value, desired: &Value) -> bool {
    match (current, desired) {
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_match(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| values_match(x, y)))
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        (a, b) => scalars_match(a, b),
    }
}

fn scalars_match(current: &Value, desired: &Value) -> bool {
    let (Some(a), Some(b)) = (scalar_text(current), scalar_text(desired)) else {
        return current.is_null() && desired.is_null();
    };
    if a == b {
        return true;
    }
    if !current.is_number() && !desired.is_number() {
        return false;
    }
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).is_eq(),
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Compute the operations that move `current` to `desired`.
///
/// Undefines come first, then writes; each group follows the iteration
/// order of `desired`. Undefining an attribute that is not set is a no-op.
pub fn diff(current: &Options, desired: &Options) -> Vec<AttributeOp> {
    let undefines = desired
        .iter()
        .filter(|(name, value)| is_undefined(value) && is_tracked(current.get(*name)))
        .map(|(name, _)| AttributeOp::Undefine { name: name.clone() });

    let writes = desired
        .iter()
        .filter(|(_, value)| !is_undefined(value))
        .filter(|(name, value)| {
            current
                .get(*name)
                .is_none_or(|existing| !values_match(existing, value))
        })
        .map(|(name, value)| AttributeOp::Write {
            name: name.clone(),
            value: value.clone(),
        });

    undefines.chain(writes).collect()
}

/// Desired options with undefine sentinels removed, for `add`.
pub fn defined_options(desired: &Options) -> Options {
    desired
        .iter()
        .filter(|(_, value)| !is_undefined(value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
