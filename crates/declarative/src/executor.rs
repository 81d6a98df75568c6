//! Execution engine - applies a plan resource by resource

use crate::context::{ConfirmCallback, ProgressCallback, RetryReporter};
use crate::error::{Error, Result};
use crate::planner::{Plan, PlannedResource};
use crate::provider::Provider;
use crate::retry::Sleeper;
use crate::types::{ApplyResult, DesiredResource, Endpoints, ExecuteSummary};
use mgmtkit::Options;
use mgmtkit::backend::Transport;

/// Execute a plan with the given callbacks
///
/// # Type Parameters
/// * `T` - Transport type
/// * `P` - Progress callback type
/// * `C` - Confirm callback type
///
/// # Arguments
/// * `plan` - The plan to apply
/// * `endpoints` - Endpoints the plan's resources refer to
/// * `transport` - Executes management operations
/// * `sleeper` - Pauses between retry attempts
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback, asked once before any change
///
/// # Returns
/// Summary of execution results. A failed resource is counted and the pass
/// moves on to the next one.
pub fn execute<T, P, C>(
    plan: &Plan,
    endpoints: &Endpoints,
    transport: &T,
    sleeper: &dyn Sleeper,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    T: Transport + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let total_changes = plan.change_count();
    let mut summary = ExecuteSummary::default();

    let proceed = total_changes > 0
        && confirm.confirm(&format!("Apply {total_changes} change(s)?"))?;

    for entry in &plan.entries {
        let result = if entry.is_skipped() {
            ApplyResult::Skipped {
                reason: "noop".into(),
            }
        } else if !entry.needs_change() {
            ApplyResult::NoChange
        } else if !proceed {
            ApplyResult::Skipped {
                reason: "not confirmed".into(),
            }
        } else {
            progress.on_resource_start(&entry.resource.name, &entry.change);
            let result = apply_entry(entry, endpoints, transport, sleeper, progress);
            progress.on_resource_complete(&entry.resource.name, &result);
            result
        };
        summary.add_result(&result);
    }

    Ok(summary)
}

/// Apply a single planned resource
fn apply_entry<T, P>(
    entry: &PlannedResource,
    endpoints: &Endpoints,
    transport: &T,
    sleeper: &dyn Sleeper,
    progress: &mut P,
) -> ApplyResult
where
    T: Transport + ?Sized,
    P: ProgressCallback,
{
    let name = &entry.resource.name;
    let outcome = endpoints
        .get(&entry.resource.server)
        .ok_or_else(|| Error::UnknownServer {
            server: entry.resource.server.clone(),
            resource: name.clone(),
        })
        .and_then(|endpoint| {
            let Some(address) = entry.address.as_ref() else {
                return Ok(ApplyResult::NoChange);
            };
            let empty = Options::new();
            let current = entry.current.as_ref().map_or(&empty, |c| &c.options);
            let mut reporter = RetryReporter::new(name, progress);

            Provider::new(endpoint, transport, sleeper).flush(
                &entry.resource,
                address,
                current,
                &entry.change,
                Some(&mut reporter),
            )
        });

    match outcome {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Resource '{name}' failed: {e}");
            ApplyResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Plan and apply resources in one pass
///
/// Builds a fresh plan, so every endpoint is read once per pass.
pub fn run_pass<T, P, C>(
    resources: &[DesiredResource],
    endpoints: &Endpoints,
    transport: &T,
    sleeper: &dyn Sleeper,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    T: Transport + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let plan = Plan::build(resources, endpoints, transport)?;
    execute(&plan, endpoints, transport, sleeper, progress, confirm)
}
