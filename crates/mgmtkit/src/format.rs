//! Management operations and their CLI rendering.

use crate::address::ResourceAddress;
use crate::types::Options;
use serde_json::Value;

/// `read-resource`
pub const READ_RESOURCE: &str = "read-resource";
/// `add`
pub const ADD: &str = "add";
/// `remove`
pub const REMOVE: &str = "remove";
/// `write-attribute`
pub const WRITE_ATTRIBUTE: &str = "write-attribute";
/// `undefine-attribute`
pub const UNDEFINE_ATTRIBUTE: &str = "undefine-attribute";

/// A single management operation against one address.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Target resource
    pub address: ResourceAddress,
    /// Operation name
    pub operation: String,
    /// Operation parameters, rendered in insertion order
    pub parameters: Options,
}

impl Command {
    /// Create a command with no parameters.
    pub fn new(address: ResourceAddress, operation: impl Into<String>) -> Self {
        Self {
            address,
            operation: operation.into(),
            parameters: Options::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// `read-resource(recursive=true)`
    pub fn read_resource_recursive(address: ResourceAddress) -> Self {
        Self::new(address, READ_RESOURCE).with_param("recursive", true)
    }

    /// `add(...)` with the given attributes as parameters.
    pub fn add(address: ResourceAddress, attributes: &Options) -> Self {
        format_command(address, ADD, attributes.clone())
    }

    /// `remove`
    pub fn remove(address: ResourceAddress) -> Self {
        Self::new(address, REMOVE)
    }

    /// `write-attribute(name=..., value=...)`
    pub fn write_attribute(address: ResourceAddress, name: &str, value: Value) -> Self {
        Self::new(address, WRITE_ATTRIBUTE)
            .with_param("name", name)
            .with_param("value", value)
    }

    /// `undefine-attribute(name=...)`
    pub fn undefine_attribute(address: ResourceAddress, name: &str) -> Self {
        Self::new(address, UNDEFINE_ATTRIBUTE).with_param("name", name)
    }

    /// Render as a CLI line, e.g.
    /// `/subsystem=datasources/data-source=ExampleDS:write-attribute(name="pool-size",value=10)`.
    pub fn to_cli(&self) -> String {
        let mut line = format!("{}:{}", self.address.to_cli(), self.operation);
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(name, value)| format!("{}={}", name, render_value(value)))
                .collect();
            line.push('(');
            line.push_str(&params.join(","));
            line.push(')');
        }
        line
    }
}

/// Build a command from an address, an operation and a parameter map.
pub fn format_command(address: ResourceAddress, operation: &str, parameters: Options) -> Command {
    Command {
        address,
        operation: operation.to_string(),
        parameters,
    }
}

/// Render a parameter value in CLI syntax.
///
/// Strings are double-quoted, numbers and booleans bare, null is
/// `undefined`, objects use the DMR `{"key" => value}` notation.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}=>{}", quote(k), render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(","))
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
