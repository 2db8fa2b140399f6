//! Pull-based debug stepping.
//!
//! A [`DebugSession`] runs the interpreter on a worker thread and exposes
//! execution as an iterator of [`Step`]s. Zero-capacity channels give a
//! strict rendezvous: the worker parks before every statement until the
//! driver pulls, so the first `next()` observes the program before anything
//! has run, and each later `next()` executes exactly one statement. Draining
//! the iterator runs the program to completion; dropping the session stops
//! the worker through the shared flag.

use crate::env::Environment;
use crate::host::Host;
use crate::interpreter::{Interpreter, StepSink};
use crossbeam_channel::{bounded, Receiver, Sender};
use gaddis_compiler::compiler::ast::Program;
use gaddis_core::{RuntimeError, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Fully-owned mirror of [`Value`] with no shared-ownership wrappers, so
/// snapshots can cross the worker-thread boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<SnapshotValue>),
    Null,
}

impl From<&Value> for SnapshotValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(n) => SnapshotValue::Integer(*n),
            Value::Real(r) => SnapshotValue::Real(*r),
            Value::String(s) => SnapshotValue::String(s.clone()),
            Value::Array(items) => {
                SnapshotValue::Array(items.borrow().iter().map(SnapshotValue::from).collect())
            }
            Value::Null => SnapshotValue::Null,
        }
    }
}

impl SnapshotValue {
    pub fn to_display_string(&self) -> String {
        match self {
            SnapshotValue::Integer(n) => n.to_string(),
            SnapshotValue::Real(r) => {
                let s = r.to_string();
                match s.strip_suffix(".0") {
                    Some(trimmed) => trimmed.to_string(),
                    None => s,
                }
            }
            SnapshotValue::String(s) => s.clone(),
            SnapshotValue::Array(items) => {
                let parts: Vec<String> =
                    items.iter().map(SnapshotValue::to_display_string).collect();
                format!("[{}]", parts.join(", "))
            }
            SnapshotValue::Null => String::new(),
        }
    }
}

/// One step point: the line about to execute and the visible scope,
/// globals first, keyed by each variable's original-casing name.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub line: usize,
    pub scope: IndexMap<String, SnapshotValue>,
}

struct ChannelSink {
    steps: Sender<Step>,
    resume: Receiver<()>,
}

impl StepSink for ChannelSink {
    fn on_step(&mut self, line: usize, env: &Environment) -> Result<(), RuntimeError> {
        let scope = env
            .snapshot()
            .into_iter()
            .map(|(name, value)| (name, SnapshotValue::from(&value)))
            .collect();
        if self.steps.send(Step { line, scope }).is_err() {
            return Err(RuntimeError::Stopped);
        }
        match self.resume.recv() {
            Ok(()) => Ok(()),
            Err(_) => Err(RuntimeError::Stopped),
        }
    }
}

/// Combines the session's own stop flag with the driver host's.
struct SessionHost {
    inner: Arc<dyn Host>,
    stop: Arc<AtomicBool>,
}

impl Host for SessionHost {
    fn display(&self, values: &[Value]) {
        self.inner.display(values);
    }

    fn input(&self, prompt: &str) -> Option<String> {
        self.inner.input(prompt)
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst) || self.inner.should_stop()
    }
}

pub struct DebugSession {
    steps: Receiver<Step>,
    resume: Sender<()>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), RuntimeError>>>,
    started: bool,
}

impl DebugSession {
    pub(crate) fn spawn(program: Program, host: Arc<dyn Host>) -> Self {
        let (step_tx, step_rx) = bounded(0);
        let (resume_tx, resume_rx) = bounded(0);
        let stop = Arc::new(AtomicBool::new(false));
        let session_host = SessionHost {
            inner: host,
            stop: Arc::clone(&stop),
        };
        let handle = thread::spawn(move || {
            let mut sink = ChannelSink {
                steps: step_tx,
                resume: resume_rx,
            };
            let mut interpreter = Interpreter::new(&program, &session_host)?;
            interpreter.execute(&mut sink)
        });
        Self {
            steps: step_rx,
            resume: resume_tx,
            stop,
            handle: Some(handle),
            started: false,
        }
    }

    /// Drain the remaining steps and surface the program's result.
    pub fn finish(mut self) -> Result<(), RuntimeError> {
        while self.next().is_some() {}
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(Err(RuntimeError::Stopped)),
            None => Ok(()),
        }
    }

    /// Ask the worker to stop at its next poll.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Iterator for DebugSession {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.started {
            self.resume.send(()).ok()?;
        } else {
            self.started = true;
        }
        self.steps.recv().ok()
    }
}

impl Drop for DebugSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Receivers drop with self; a worker parked on the step rendezvous
        // unblocks with a send error and unwinds as Stopped.
    }
}
