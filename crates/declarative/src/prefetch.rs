//! Pass-scoped cache of endpoint resource trees
//!
//! Reading a resource costs one CLI round-trip, so each endpoint is dumped
//! once per pass with a recursive `read-resource` at the root and every
//! resource on that endpoint is resolved against the dump.

use crate::error::{Error, Result};
use crate::types::{CurrentState, DesiredResource};
use mgmtkit::backend::Transport;
use mgmtkit::{Command, Endpoint, Options, ResourceAddress, ResourceTree};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Resource trees fetched during one pass, keyed by endpoint name
#[derive(Debug, Default)]
pub struct PrefetchCache {
    trees: HashMap<String, ResourceTree>,
    fetches: usize,
}

impl PrefetchCache {
    /// Create an empty cache for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bulk reads performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Whether the endpoint's tree is already cached.
    pub fn contains(&self, server: &str) -> bool {
        self.trees.contains_key(server)
    }

    /// Return the endpoint's tree, reading it on first access.
    ///
    /// A failed read is returned as an error and nothing is cached, so a
    /// later call will try again.
    pub fn get_or_fetch<T>(&mut self, endpoint: &Endpoint, transport: &T) -> Result<&ResourceTree>
    where
        T: Transport + ?Sized,
    {
        match self.trees.entry(endpoint.name.clone()) {
            Entry::Occupied(entry) => {
                log::debug!("Using cached resource tree of '{}'", endpoint.name);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                log::debug!(
                    "Reading resource tree of '{}' ({})",
                    endpoint.name,
                    endpoint.controller
                );
                let tree = fetch_tree(endpoint, transport)?;
                self.fetches += 1;
                Ok(entry.insert(tree))
            }
        }
    }

    /// Parse a resource's address and determine its current state.
    ///
    /// Returns `None` for `noop` resources, which are neither fetched nor
    /// resolved. A malformed address is reported before any read.
    pub fn resolve_resource<T>(
        &mut self,
        resource: &DesiredResource,
        endpoint: &Endpoint,
        transport: &T,
    ) -> Result<Option<(ResourceAddress, CurrentState)>>
    where
        T: Transport + ?Sized,
    {
        if resource.noop {
            return Ok(None);
        }

        let address = ResourceAddress::parse(&resource.address)?;
        let tree = self.get_or_fetch(endpoint, transport)?;
        let current = resolve(&address, tree);
        Ok(Some((address, current)))
    }
}

fn fetch_tree<T>(endpoint: &Endpoint, transport: &T) -> Result<ResourceTree>
where
    T: Transport + ?Sized,
{
    let command = Command::read_resource_recursive(ResourceAddress::root());
    let outcome = transport.execute_one(endpoint, &command)?;

    if !outcome.success {
        return Err(Error::Prefetch {
            server: endpoint.name.clone(),
            message: outcome.failure_text().to_string(),
        });
    }

    Ok(outcome
        .result
        .unwrap_or_else(|| Value::Object(Options::new())))
}

/// Resolve an address against a resource tree.
///
/// A missing or null segment anywhere along the path means absent. A node
/// that is not an object (which a resource never is) counts as present with
/// no options.
pub fn resolve(address: &ResourceAddress, tree: &ResourceTree) -> CurrentState {
    match address.locate(tree) {
        Some(Value::Object(node)) => CurrentState::present(node.clone()),
        Some(_) => CurrentState::present(Options::new()),
        None => CurrentState::absent(),
    }
}
