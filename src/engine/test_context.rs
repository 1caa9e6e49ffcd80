//! In-memory `WorkflowContext` test double (§2.1 "Test tooling").
//!
//! Records every activity/child-workflow invocation, lets tests enqueue
//! signal payloads ahead of time, and resolves timers immediately —
//! deterministic by construction, no simulated clock needed for unit
//! tests that only care about call sequence.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::engine::context::WorkflowContext;
use crate::engine::options::{ActivityOptions, ChildWorkflowOptions};
use crate::error::ActivityError;

/// One recorded invocation, for assertions like "ReleaseInventoryReservation
/// was invoked exactly once" (§8 scenario 4).
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub input: Value,
}

/// Canned activity response queued by name; activities not stubbed
/// return `ActivityError::NotFound` so an unexpected call fails loudly
/// rather than silently returning a default.
pub struct TestWorkflowContext {
    calls: Mutex<Vec<RecordedCall>>,
    activity_responses: Mutex<std::collections::HashMap<String, VecDeque<Result<Value, ActivityError>>>>,
    signal_queues: Mutex<std::collections::HashMap<String, VecDeque<Value>>>,
    child_responses: Mutex<std::collections::HashMap<String, VecDeque<Value>>>,
    now: Mutex<DateTime<Utc>>,
}

impl TestWorkflowContext {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            activity_responses: Mutex::new(std::collections::HashMap::new()),
            signal_queues: Mutex::new(std::collections::HashMap::new()),
            child_responses: Mutex::new(std::collections::HashMap::new()),
            now: Mutex::new(Utc.timestamp_opt(0, 0).single().expect("epoch is a valid instant")),
        }
    }

    pub fn stub_activity<O: Serialize>(&self, name: &str, output: O) {
        let value = serde_json::to_value(output).expect("test stub serializes");
        self.activity_responses
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Ok(value));
    }

    pub fn stub_activity_error(&self, name: &str, error: ActivityError) {
        self.activity_responses
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Err(error));
    }

    pub fn stub_child_workflow<O: Serialize>(&self, workflow_type: &str, output: O) {
        let value = serde_json::to_value(output).expect("test stub serializes");
        self.child_responses
            .lock()
            .unwrap()
            .entry(workflow_type.to_string())
            .or_default()
            .push_back(value);
    }

    pub fn enqueue_signal<S: Serialize>(&self, signal_name: &str, payload: S) {
        let value = serde_json::to_value(payload).expect("test stub serializes");
        self.signal_queues
            .lock()
            .unwrap()
            .entry(signal_name.to_string())
            .or_default()
            .push_back(value);
    }

    pub fn set_now(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.name == name).count()
    }
}

impl Default for TestWorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowContext for TestWorkflowContext {
    async fn execute_activity<I, O>(
        &self,
        activity: &'static str,
        input: I,
        _options: &ActivityOptions,
    ) -> Result<O, ActivityError>
    where
        I: Serialize + Send + 'async_trait,
        O: DeserializeOwned,
    {
        let input_value = serde_json::to_value(&input).expect("test input serializes");
        self.calls.lock().unwrap().push(RecordedCall { name: activity.to_string(), input: input_value });

        let mut responses = self.activity_responses.lock().unwrap();
        let queued = responses.get_mut(activity).and_then(|q| q.pop_front());
        match queued {
            Some(Ok(value)) => Ok(serde_json::from_value(value).expect("test stub deserializes to O")),
            Some(Err(err)) => Err(err),
            None => Err(ActivityError::NotFound(format!("no stub registered for activity {activity}"))),
        }
    }

    async fn start_child_workflow<I, O>(
        &self,
        workflow_type: &'static str,
        workflow_id: String,
        input: I,
        _options: &ChildWorkflowOptions,
    ) -> Result<O, crate::error::EngineError>
    where
        I: Serialize + Send + 'async_trait,
        O: DeserializeOwned,
    {
        let input_value = serde_json::to_value(&input).expect("test input serializes");
        self.calls.lock().unwrap().push(RecordedCall { name: format!("child:{workflow_type}:{workflow_id}"), input: input_value });

        let mut responses = self.child_responses.lock().unwrap();
        match responses.get_mut(workflow_type).and_then(|q| q.pop_front()) {
            Some(value) => Ok(serde_json::from_value(value).expect("test stub deserializes to O")),
            None => Err(crate::error::EngineError::ChildWorkflowFailed(
                workflow_type.to_string(),
                "no stub registered".to_string(),
            )),
        }
    }

    async fn new_timer(&self, _duration: Duration) {
        // Resolves immediately; tests race this against `wait_for_signal`
        // via `select2` to exercise timeout branches deterministically.
    }

    async fn wait_for_signal<S>(&self, signal_name: &'static str) -> S
    where
        S: DeserializeOwned,
    {
        loop {
            let popped = self.signal_queues.lock().unwrap().get_mut(signal_name).and_then(|q| q.pop_front());
            if let Some(value) = popped {
                return serde_json::from_value(value).expect("test stub deserializes to S");
            }
            tokio::task::yield_now().await;
        }
    }

    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn get_version(&self, _change_id: &str, _min_supported: i32, max_supported: i32) -> i32 {
        max_supported
    }
}
