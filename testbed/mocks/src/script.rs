//! Queues of scripted responses

use karrot_types::{ApiError, ApiResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Holds a scripted response back until opened.
#[derive(Clone, Default)]
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the response waiting on this gate. Opening before the request
    /// arrives is fine, the permit is kept.
    pub fn open(&self) {
        self.notify.notify_one();
    }
}

struct Step<T> {
    result: ApiResult<T>,
    gate: Option<Gate>,
}

/// FIFO of responses for one endpoint
pub struct Script<T> {
    steps: Mutex<VecDeque<Step<T>>>,
    calls: AtomicUsize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Script<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: T) {
        self.push(Ok(value), None);
    }

    pub fn push_err(&self, error: ApiError) {
        self.push(Err(error), None);
    }

    pub fn push_gated(&self, result: ApiResult<T>, gate: &Gate) {
        self.push(result, Some(gate.clone()));
    }

    fn push(&self, result: ApiResult<T>, gate: Option<Gate>) {
        self.steps.lock().unwrap().push_back(Step { result, gate });
    }

    /// Number of requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }

    /// Resolves the next request, waiting on its gate if it has one.
    pub async fn next(&self) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step { result, gate }) => {
                if let Some(gate) = gate {
                    gate.notify.notified().await;
                }
                result
            }
            None => Err(ApiError::transport("no scripted response left")),
        }
    }

    /// Yields until `count` requests have arrived, used to line up races.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_pops_in_order() {
        let script = Script::new();
        script.push_ok(1);
        script.push_err(ApiError::transport("boom"));

        assert_eq!(script.next().await, Ok(1));
        assert!(script.next().await.is_err());
        assert_eq!(script.calls(), 2);
        assert_eq!(script.remaining(), 0);
    }

    #[tokio::test]
    async fn test_gate_opened_before_request() {
        let script = Script::new();
        let gate = Gate::new();
        script.push_gated(Ok("late"), &gate);
        gate.open();

        assert_eq!(script.next().await, Ok("late"));
    }
}
