//! End-to-end passes against an in-memory management endpoint.

use declarative::{
    ApplyResult, AutoConfirm, Change, DesiredResource, Endpoints, Ensure, Error, NoProgress, Plan,
    ProgressCallback, Sleeper, execute, run_pass,
};
use mgmtkit::backend::Transport;
use mgmtkit::format::READ_RESOURCE;
use mgmtkit::{Command, Endpoint, Outcome};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// One recorded transport call
#[derive(Debug, Clone)]
struct Call {
    server: String,
    commands: Vec<String>,
    atomic: bool,
}

/// Serves a fixed resource tree and scripted write outcomes
struct FakeServer {
    tree: Value,
    replies: RefCell<VecDeque<Outcome>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeServer {
    fn new(tree: Value) -> Self {
        Self {
            tree,
            replies: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing_writes(self, description: &str, count: usize) -> Self {
        self.replies
            .borrow_mut()
            .extend(std::iter::repeat_n(Outcome::failed(description), count));
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn reads(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.commands.iter().any(|line| line.contains(READ_RESOURCE)))
            .count()
    }

    fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !c.commands.iter().any(|line| line.contains(READ_RESOURCE)))
            .collect()
    }
}

impl Transport for FakeServer {
    fn execute(
        &self,
        endpoint: &Endpoint,
        commands: &[Command],
        atomic: bool,
    ) -> mgmtkit::Result<Outcome> {
        self.calls.borrow_mut().push(Call {
            server: endpoint.name.clone(),
            commands: commands.iter().map(Command::to_cli).collect(),
            atomic,
        });

        if commands.iter().any(|c| c.operation == READ_RESOURCE) {
            return Ok(Outcome::success(Some(self.tree.clone())));
        }

        Ok(self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Outcome::success(None)))
    }
}

#[derive(Default)]
struct RecordingSleeper(RefCell<Vec<Duration>>);

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.0.borrow_mut().push(duration);
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Vec<String>,
}

impl ProgressCallback for RecordingProgress {
    fn on_resource_start(&mut self, name: &str, change: &Change) {
        self.events.push(format!("start {name} {change}"));
    }

    fn on_retry(&mut self, name: &str, attempt: u32, tries: u32, _error: &Error, _delay: Duration) {
        self.events.push(format!("retry {name} {attempt}/{tries}"));
    }

    fn on_resource_complete(&mut self, name: &str, result: &ApplyResult) {
        self.events.push(format!("done {name} {}", result.is_success()));
    }
}

fn endpoints() -> Endpoints {
    let mut endpoints = Endpoints::new();
    for name in ["default", "standby"] {
        endpoints.insert(
            name.into(),
            Endpoint::new(name, "localhost:9990", "/opt/wildfly/bin/jboss-cli.sh"),
        );
    }
    endpoints
}

fn server_with_datasource(options: Value) -> FakeServer {
    FakeServer::new(json!({
        "subsystem": {
            "datasources": {
                "data-source": {"ExampleDS": options}
            }
        }
    }))
}

const EXAMPLE_DS: &str = "subsystem/datasources/data-source/ExampleDS";

#[test]
fn creates_missing_resource_with_full_options() {
    let server = FakeServer::new(json!({"subsystem": {"logging": {}}}));
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS)
        .with_option("jndi-name", "java:jboss/datasources/ExampleDS")
        .with_option("pool-size", 10)
        .with_option("enabled", true);

    let plan = Plan::build(std::slice::from_ref(&resource), &endpoints(), &server).unwrap();
    let entry = &plan.entries[0];
    assert!(!entry.current.as_ref().unwrap().is_present());
    assert_eq!(entry.change, Change::Create);

    let summary = execute(
        &plan,
        &endpoints(),
        &server,
        &RecordingSleeper::default(),
        &mut NoProgress,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(summary.created, 1);
    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0].commands,
        vec![
            "/subsystem=datasources/data-source=ExampleDS:add(\
             jndi-name=\"java:jboss/datasources/ExampleDS\",pool-size=10,enabled=true)"
                .to_string()
        ]
    );
}

#[test]
fn writes_only_drifted_attributes() {
    let server = server_with_datasource(json!({"jndi-name": "a", "pool-size": 5}));
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS)
        .with_option("jndi-name", "a")
        .with_option("pool-size", "10")
        .with_option("max-pool-size", "undefined");

    let summary = run_pass(
        &[resource],
        &endpoints(),
        &server,
        &RecordingSleeper::default(),
        &mut NoProgress,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(summary.modified, 1);
    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].atomic);
    assert_eq!(
        writes[0].commands,
        vec![
            "/subsystem=datasources/data-source=ExampleDS:write-attribute(\
             name=\"pool-size\",value=\"10\")"
                .to_string()
        ]
    );
}

#[test]
fn converged_resource_makes_no_writes() {
    let server = server_with_datasource(json!({"jndi-name": "a", "pool-size": 10}));
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS)
        .with_option("pool-size", "10")
        .with_option("max-pool-size", "undefined");

    let summary = run_pass(
        &[resource],
        &endpoints(),
        &server,
        &RecordingSleeper::default(),
        &mut NoProgress,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(summary.no_change, 1);
    assert!(server.writes().is_empty());
}

#[test]
fn failed_remove_is_retried_with_constant_sleep() {
    let server = server_with_datasource(json!({"jndi-name": "a"}))
        .failing_writes("WFLYCTL0158: Operation handler failed", 3);
    let sleeper = RecordingSleeper::default();
    let mut progress = RecordingProgress::default();
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS)
        .with_ensure(Ensure::Absent)
        .with_retries(3, 2.0);

    let summary = run_pass(
        &[resource],
        &endpoints(),
        &server,
        &sleeper,
        &mut progress,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(summary.failed, 1);
    let writes = server.writes();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|c| c.commands
        == vec!["/subsystem=datasources/data-source=ExampleDS:remove".to_string()]));
    assert_eq!(*sleeper.0.borrow(), vec![Duration::from_secs(2); 2]);
    assert_eq!(
        progress.events,
        vec![
            "start ExampleDS destroy",
            "retry ExampleDS 1/3",
            "retry ExampleDS 2/3",
            "done ExampleDS false",
        ]
    );
}

#[test]
fn failure_message_is_last_attempt_verbatim() {
    let server = server_with_datasource(json!({"jndi-name": "a"}))
        .failing_writes("anything", 1);
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS).with_ensure(Ensure::Absent);
    let plan = Plan::build(&[resource], &endpoints(), &server).unwrap();

    struct Capture(Option<ApplyResult>);
    impl ProgressCallback for Capture {
        fn on_resource_start(&mut self, _: &str, _: &Change) {}
        fn on_resource_complete(&mut self, _: &str, result: &ApplyResult) {
            self.0 = Some(result.clone());
        }
    }

    let mut capture = Capture(None);
    execute(
        &plan,
        &endpoints(),
        &server,
        &RecordingSleeper::default(),
        &mut capture,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(
        capture.0,
        Some(ApplyResult::Failed {
            error: "Error removing resource".into()
        })
    );
}

#[test]
fn one_bulk_read_per_server() {
    let server = server_with_datasource(json!({"jndi-name": "a"}));
    let resources = vec![
        DesiredResource::new("ExampleDS", EXAMPLE_DS).with_option("jndi-name", "a"),
        DesiredResource::new("mail", "subsystem/mail/mail-session/default"),
        DesiredResource::new("standby-ds", EXAMPLE_DS).on_server("standby"),
    ];

    let plan = Plan::build(&resources, &endpoints(), &server).unwrap();

    assert_eq!(plan.prefetch_count(), 2);
    assert_eq!(server.reads(), 2);
    let servers: Vec<String> = server.calls().into_iter().map(|c| c.server).collect();
    assert_eq!(servers, vec!["default", "standby"]);
    assert_eq!(plan.change_count(), 1);
}

#[test]
fn noop_resource_bypasses_prefetch() {
    let server = server_with_datasource(json!({"jndi-name": "a"}));
    let resource = DesiredResource::new("ExampleDS", EXAMPLE_DS)
        .with_ensure(Ensure::Absent)
        .noop();

    let summary = run_pass(
        &[resource],
        &endpoints(),
        &server,
        &RecordingSleeper::default(),
        &mut NoProgress,
        &mut AutoConfirm,
    )
    .unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(server.calls().is_empty());
}

#[test]
fn malformed_address_aborts_the_pass() {
    let server = server_with_datasource(json!({}));
    let resources = vec![DesiredResource::new("bad", "subsystem/datasources/data-source")];

    let err = Plan::build(&resources, &endpoints(), &server).unwrap_err();
    assert!(matches!(
        err,
        Error::Cli(mgmtkit::Error::MalformedAddress { .. })
    ));
    assert!(server.calls().is_empty());
}

#[test]
fn unknown_server_aborts_the_pass() {
    let server = server_with_datasource(json!({}));
    let resources = vec![DesiredResource::new("ExampleDS", EXAMPLE_DS).on_server("missing")];

    let err = Plan::build(&resources, &endpoints(), &server).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown server 'missing' for resource 'ExampleDS'"
    );
}

#[test]
fn noop_resource_on_unconfigured_server_is_skipped() {
    let server = server_with_datasource(json!({"jndi-name": "a"}));
    let resources = vec![
        DesiredResource::new("parked", "subsystem/mail/mail-session/default")
            .on_server("gone")
            .noop(),
        DesiredResource::new("ExampleDS", EXAMPLE_DS).with_option("jndi-name", "b"),
    ];

    let plan = Plan::build(&resources, &endpoints(), &server).unwrap();

    assert_eq!(plan.len(), 2);
    assert!(plan.entries[0].is_skipped());
    assert_eq!(plan.change_count(), 1);
    assert_eq!(server.reads(), 1);
}
