//! Human-readable terminal rendering of [`RunEvent`]s.

use super::json::format_json_pretty;
use super::{EventSink, RunEvent};
use crate::assertions::AssertionOutcome;
use crate::commands::CommandOutput;
use log::warn;
use std::io::{self, Write};

const KEY_COLOR: (u8, u8, u8) = (53, 177, 226);
const STATUS_COLOR: (u8, u8, u8) = (53, 42, 226);
const SEPARATOR: &str = "----------------------------------------";

/// Which optional sections the console shows.
///
/// The request line, elapsed time, status line, response body and summary
/// are always printed. `verbose` turns every section on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub full_request: bool,
    pub request_headers: bool,
    pub request_body: bool,
    pub headers: bool,
    pub show_variables: bool,
    pub show_asserts: bool,
    pub show_commands: bool,
    pub verbose: bool,
    /// Emit 24-bit ANSI colour codes.
    pub color: bool,
}

impl DisplayOptions {
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn shows_request_headers(&self) -> bool {
        self.verbose || self.full_request || self.request_headers
    }

    pub fn shows_request_body(&self) -> bool {
        self.verbose || self.full_request || self.request_body
    }

    pub fn shows_response_headers(&self) -> bool {
        self.verbose || self.headers
    }

    pub fn shows_variables(&self) -> bool {
        self.verbose || self.show_variables
    }

    pub fn shows_asserts(&self) -> bool {
        self.verbose || self.show_asserts
    }

    pub fn shows_commands(&self) -> bool {
        self.verbose || self.show_commands
    }
}

/// Writes events to a terminal (stdout by default).
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    options: DisplayOptions,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(options: DisplayOptions) -> Self {
        Self::new(io::stdout(), options)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, options: DisplayOptions) -> Self {
        Self { out, options }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, (r, g, b): (u8, u8, u8)) -> String {
        if self.options.color {
            format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text)
        } else {
            text.to_string()
        }
    }

    fn write_pairs(&mut self, pairs: &[(String, String)]) -> io::Result<()> {
        for (key, value) in pairs {
            let key = self.paint(key, KEY_COLOR);
            writeln!(self.out, "{}: {}", key, value)?;
        }
        Ok(())
    }

    fn write_commands(&mut self, outputs: &[CommandOutput]) -> io::Result<()> {
        writeln!(self.out, "🔧 Commands:")?;
        for output in outputs {
            writeln!(self.out, "  ✨ {}", output.description)?;
            if let Some(echo) = &output.echo {
                writeln!(self.out, "       {}", echo)?;
            }
        }
        writeln!(self.out)
    }

    fn render(&mut self, event: &RunEvent) -> io::Result<()> {
        let opts = self.options.clone();

        match event {
            RunEvent::RequestStarted { name } => writeln!(self.out, "😺 Running request {}", name),
            RunEvent::RequestLine { method, url } => writeln!(self.out, "🚀 {} {}", method, url),
            RunEvent::RequestHeaders(headers) if opts.shows_request_headers() => {
                self.write_pairs(headers)
            }
            RunEvent::RequestBody(body) if opts.shows_request_body() => {
                writeln!(self.out, "\n{}", body)
            }
            RunEvent::Elapsed(elapsed) => writeln!(self.out, "🕒 Request took {:?}", elapsed),
            RunEvent::StatusLine {
                status_code,
                status_text,
            } => {
                let status = self.paint(&format!("HTTP/1.1 {}", status_code), STATUS_COLOR);
                writeln!(self.out, "{} {}", status, status_text)
            }
            RunEvent::ResponseHeaders(headers) if opts.shows_response_headers() => {
                self.write_pairs(headers)?;
                writeln!(self.out)
            }
            RunEvent::ResponseBody { text, is_json } => {
                let pretty = if *is_json {
                    format_json_pretty(text)
                } else {
                    None
                };
                writeln!(self.out, "{}\n", pretty.as_deref().unwrap_or(text))
            }
            RunEvent::Commands { outputs, .. } if opts.shows_commands() && !outputs.is_empty() => {
                self.write_commands(outputs)
            }
            RunEvent::Variables(variables) if opts.shows_variables() && !variables.is_empty() => {
                writeln!(self.out, "🔑 Stored variables:")?;
                for variable in variables {
                    let key = self.paint(&variable.key, KEY_COLOR);
                    writeln!(self.out, "  {}: {}", key, variable.value)?;
                }
                writeln!(self.out)
            }
            RunEvent::Assertions(outcomes) if opts.shows_asserts() && !outcomes.is_empty() => {
                writeln!(self.out, "👀 Asserts:")?;
                for outcome in outcomes {
                    match outcome {
                        AssertionOutcome::Pass { description } => {
                            writeln!(self.out, "  ✅ {}", description)?
                        }
                        AssertionOutcome::Fail(failure) => writeln!(self.out, "  ❌ {}", failure)?,
                    }
                }
                writeln!(self.out)
            }
            RunEvent::Summary { failures, .. } => {
                if *failures > 0 {
                    writeln!(self.out, "😿 There were errors in the request")
                } else {
                    writeln!(self.out, "😻 Request ran successfully")
                }
            }
            RunEvent::Separator => writeln!(self.out, "{}", SEPARATOR),
            _ => Ok(()),
        }
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn emit(&mut self, event: RunEvent) {
        if let Err(e) = self.render(&event).and_then(|_| self.out.flush()) {
            warn!("failed to write output: {}", e);
        }
    }
}
