//! Reading management responses out of CLI output.
//!
//! With `--output-json` the CLI prints plain JSON. Older CLIs print DMR
//! text instead:
//!
//! ```text
//! {
//!     "outcome" => "success",
//!     "result" => {"max-pool-size" => 20L, "url" => undefined}
//! }
//! ```
//!
//! [`to_json`] rewrites DMR into JSON, leaving string literals untouched.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static DMR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        (?P<str>"(?:[^"\\]|\\.)*")
        | expression\s+(?P<expr>"(?:[^"\\]|\\.)*")
        | bytes\s*\{(?P<bytes>[^}]*)\}
        | big\s+(?:integer|decimal)\s+
        | (?P<arrow>=>)
        | (?P<long>-?\b\d+)L\b
        | (?P<undefined>\bundefined\b)
        | (?P<open>\()
        | (?P<close>\))
        "#,
    )
    .expect("DMR token pattern is valid")
});

/// Rewrite DMR text into JSON text.
pub fn to_json(dmr: &str) -> String {
    DMR_TOKEN
        .replace_all(dmr, |caps: &Captures| {
            if let Some(s) = caps.name("str") {
                s.as_str().to_string()
            } else if let Some(expr) = caps.name("expr") {
                expr.as_str().to_string()
            } else if let Some(bytes) = caps.name("bytes") {
                let compact: String = bytes.as_str().split_whitespace().collect();
                format!("\"{compact}\"")
            } else if caps.name("arrow").is_some() {
                ":".to_string()
            } else if let Some(long) = caps.name("long") {
                long.as_str().to_string()
            } else if caps.name("undefined").is_some() {
                "null".to_string()
            } else if caps.name("open").is_some() {
                "{".to_string()
            } else if caps.name("close").is_some() {
                "}".to_string()
            } else {
                // `big integer` / `big decimal` prefixes
                String::new()
            }
        })
        .into_owned()
}

/// Extract the last management response from CLI output.
///
/// The output may hold one response per executed command plus status
/// lines; the last object carrying an `outcome` wins. JSON is tried first,
/// then the DMR rewrite.
pub fn parse_response(output: &str) -> Result<Value> {
    if let Some(response) = last_response(output) {
        return Ok(response);
    }

    log::trace!("no JSON response found, trying DMR rewrite");
    last_response(&to_json(output)).ok_or_else(|| Error::ResponseParse {
        message: format!(
            "no management response in output: {}",
            output.trim().lines().next().unwrap_or_default()
        ),
    })
}

fn last_response(text: &str) -> Option<Value> {
    json_objects(text)
        .into_iter()
        .rev()
        .find(|v| v.get("outcome").is_some())
}

fn json_objects(text: &str) -> Vec<Value> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        let candidate = &rest[start..];
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                found.push(value);
                rest = &candidate[consumed..];
            }
            _ => rest = &candidate[1..],
        }
    }

    found
}
