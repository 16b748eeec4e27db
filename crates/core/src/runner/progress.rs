//! Progress indicators shown while a command runs.

use std::io::{self, Write};
use std::time::Duration;

use tokio::task::JoinHandle;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(80);

/// A visual handle started before a command spawns and stopped when it closes.
pub trait ProgressIndicator: Send {
    fn start(&mut self);

    fn stop(&mut self);
}

/// Braille spinner drawn on stderr by a background task.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct Spinner {
    message: String,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), task: None }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl ProgressIndicator for Spinner {
    fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        let message = self.message.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            for frame in FRAMES.iter().cycle() {
                interval.tick().await;
                let mut err = io::stderr().lock();
                let _ = write!(err, "\r{frame} {message}").and_then(|()| err.flush());
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let mut err = io::stderr().lock();
            let _ = write!(err, "\r\x1b[2K").and_then(|()| err.flush());
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
