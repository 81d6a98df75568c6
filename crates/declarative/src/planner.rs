//! Execution planner - resolves resources and classifies their changes

use crate::change::{Change, stage};
use crate::diff::{AttributeOp, diff};
use crate::error::{Error, Result};
use crate::prefetch::PrefetchCache;
use crate::types::{CurrentState, DesiredResource, Endpoints};
use mgmtkit::ResourceAddress;
use mgmtkit::backend::Transport;

/// A resource with its resolved state and the change it needs
#[derive(Debug, Clone)]
pub struct PlannedResource {
    /// The declaration
    pub resource: DesiredResource,
    /// Parsed address; `None` for noop resources
    pub address: Option<ResourceAddress>,
    /// State found on the endpoint; `None` for noop resources
    pub current: Option<CurrentState>,
    /// Classified change
    pub change: Change,
    /// Attribute operations an update would send
    pub ops: Vec<AttributeOp>,
}

impl PlannedResource {
    fn skipped(resource: DesiredResource) -> Self {
        Self {
            resource,
            address: None,
            current: None,
            change: Change::NoOp,
            ops: Vec::new(),
        }
    }

    fn resolved(resource: DesiredResource, address: ResourceAddress, current: CurrentState) -> Self {
        let change = stage(&resource, &current).into_change();
        let ops = match &change {
            Change::UpdateAttributes(desired) => diff(&current.options, desired),
            _ => Vec::new(),
        };
        Self {
            resource,
            address: Some(address),
            current: Some(current),
            change,
            ops,
        }
    }

    /// Whether the resource is excluded from the pass
    pub fn is_skipped(&self) -> bool {
        self.resource.noop
    }

    /// Whether applying would touch the endpoint
    pub fn needs_change(&self) -> bool {
        !self.is_skipped() && self.change.is_change()
    }
}

/// Resources of one pass in manifest order
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Entries in manifest order
    pub entries: Vec<PlannedResource>,
    prefetches: usize,
}

impl Plan {
    /// Resolve every resource and classify its change.
    ///
    /// Endpoints are read at most once. Noop resources are skipped before
    /// their server is looked up. An unknown server, a malformed address or a
    /// failed read aborts the plan.
    pub fn build<T>(resources: &[DesiredResource], endpoints: &Endpoints, transport: &T) -> Result<Self>
    where
        T: Transport + ?Sized,
    {
        let mut cache = PrefetchCache::new();
        let mut entries = Vec::with_capacity(resources.len());

        for resource in resources {
            if resource.noop {
                log::debug!("Skipping noop resource '{}'", resource.name);
                entries.push(PlannedResource::skipped(resource.clone()));
                continue;
            }

            let endpoint = endpoints
                .get(&resource.server)
                .ok_or_else(|| Error::UnknownServer {
                    server: resource.server.clone(),
                    resource: resource.name.clone(),
                })?;

            let entry = match cache.resolve_resource(resource, endpoint, transport)? {
                Some((address, current)) => {
                    PlannedResource::resolved(resource.clone(), address, current)
                }
                None => PlannedResource::skipped(resource.clone()),
            };
            entries.push(entry);
        }

        log::info!(
            "Planned {} resource(s) with {} read(s)",
            entries.len(),
            cache.fetch_count()
        );

        Ok(Self {
            entries,
            prefetches: cache.fetch_count(),
        })
    }

    /// Entries that would change the endpoint
    pub fn changes(&self) -> impl Iterator<Item = &PlannedResource> {
        self.entries.iter().filter(|e| e.needs_change())
    }

    /// Number of entries that would change the endpoint
    pub fn change_count(&self) -> usize {
        self.changes().count()
    }

    /// Number of bulk reads performed while planning
    pub fn prefetch_count(&self) -> usize {
        self.prefetches
    }

    /// Total number of resources in the plan
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keep only resources matching a target pattern
///
/// Target format: "name", "server:" or "server:name"
pub fn filter_resources(resources: Vec<DesiredResource>, target: Option<&str>) -> Vec<DesiredResource> {
    match target {
        None => resources,
        Some(t) => {
            let (server, name) = parse_target(t);
            resources
                .into_iter()
                .filter(|r| matches_filter(r, server.as_deref(), name.as_deref()))
                .collect()
        }
    }
}

/// Parse a target string like "server:name" into (server, name)
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = target.split(':').collect();
    match parts.as_slice() {
        [name] => (None, Some((*name).to_string())),
        [server, ""] => (Some((*server).to_string()), None),
        [server, name] => (Some((*server).to_string()), Some((*name).to_string())),
        _ => (None, Some(target.to_string())),
    }
}

/// Check if a resource matches the filter criteria
fn matches_filter(resource: &DesiredResource, server: Option<&str>, name: Option<&str>) -> bool {
    if let Some(s) = server
        && resource.server != s
    {
        return false;
    }

    if let Some(n) = name
        && !resource.name.contains(n)
    {
        return false;
    }

    true
}
