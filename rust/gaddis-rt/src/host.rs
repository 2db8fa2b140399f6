//! The driver boundary.
//!
//! The interpreter exchanges text with the outside world only through a
//! [`Host`]: Display lines go out through `display`, Input reads come back
//! through `input`, and `should_stop` is polled at every statement boundary
//! and input resolution for cooperative cancellation. The interpreter never
//! touches external storage.

use gaddis_core::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub trait Host: Send + Sync {
    /// Deliver one finished Display line as its evaluated item values, in
    /// order. Rendering and concatenation policy belongs to the driver;
    /// [`render_display_line`] is the plain-text default.
    fn display(&self, values: &[Value]);

    /// Blocking read of one line of user input. `None` signals cancellation.
    fn input(&self, prompt: &str) -> Option<String>;

    /// Polled before every statement and at every input resolution.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Concatenate a Display line's values with no separator.
pub fn render_display_line(values: &[Value]) -> String {
    values.iter().map(Value::to_display_string).collect()
}

/// Test host: records Display lines and serves Input from a scripted queue.
/// An exhausted queue answers `None`, the cancellation signal.
#[derive(Default)]
pub struct CollectHost {
    lines: Mutex<Vec<String>>,
    inputs: Mutex<VecDeque<String>>,
    stop: AtomicBool,
}

impl CollectHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Mutex::new(inputs.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Host for CollectHost {
    fn display(&self, values: &[Value]) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(render_display_line(values));
    }

    fn input(&self, _prompt: &str) -> Option<String> {
        self.inputs.lock().expect("inputs lock").pop_front()
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}
