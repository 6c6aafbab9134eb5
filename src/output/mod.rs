//! Display events produced while running requests.
//!
//! The runner never prints. It emits [`RunEvent`]s into an [`EventSink`];
//! the binary uses [`ConsoleSink`] and tests use [`RecordingSink`].

pub mod console;
pub mod json;

pub use console::{ConsoleSink, DisplayOptions};
pub use json::format_json_pretty;

use crate::assertions::AssertionOutcome;
use crate::commands::CommandOutput;
use crate::models::HttpMethod;
use crate::variables::Variable;
use std::time::Duration;

/// Which command list produced a [`RunEvent::Commands`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPhase {
    Pre,
    Post,
}

/// Something observable that happened while running a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    RequestStarted { name: String },
    RequestLine { method: HttpMethod, url: String },
    /// Headers as sent, including the default `User-Agent`.
    RequestHeaders(Vec<(String, String)>),
    RequestBody(String),
    Elapsed(Duration),
    StatusLine { status_code: u16, status_text: String },
    /// Response headers with multiple values joined by `", "`.
    ResponseHeaders(Vec<(String, String)>),
    ResponseBody { text: String, is_json: bool },
    Commands {
        phase: CommandPhase,
        outputs: Vec<CommandOutput>,
    },
    /// Store snapshot in display order.
    Variables(Vec<Variable>),
    Assertions(Vec<AssertionOutcome>),
    Summary { name: String, failures: usize },
    /// Emitted between two requests of a batch.
    Separator,
}

/// Receiver of [`RunEvent`]s. Output only; nothing flows back.
pub trait EventSink {
    fn emit(&mut self, event: RunEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: RunEvent) {
        (**self).emit(event)
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<RunEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo lines in emission order.
    pub fn echoes(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RunEvent::Commands { outputs, .. } => Some(outputs),
                _ => None,
            })
            .flatten()
            .filter_map(|output| output.echo.clone())
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&RunEvent) -> bool) -> usize {
        self.events.iter().filter(|e| matches(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: RunEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.emit(RunEvent::RequestStarted {
            name: "healthz".to_string(),
        });
        sink.emit(RunEvent::Separator);

        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[1], RunEvent::Separator);
        assert_eq!(sink.count(|e| matches!(e, RunEvent::Separator)), 1);
    }

    #[test]
    fn test_recording_sink_echoes() {
        let mut sink = RecordingSink::new();
        sink.emit(RunEvent::Commands {
            phase: CommandPhase::Post,
            outputs: vec![
                CommandOutput {
                    description: "print".to_string(),
                    echo: Some("code 200".to_string()),
                },
                CommandOutput {
                    description: "store".to_string(),
                    echo: None,
                },
            ],
        });

        assert_eq!(sink.echoes(), vec!["code 200".to_string()]);
    }
}
