//! Command loop.
//!
//! Reads one command per line from any `BufRead`, runs it against the
//! session's store and writes one reply line. Interactive use prints a
//! prompt before each line; pipe and script input run silently.

use crate::dispatch::{execute, Reply};
use crate::parse::parse_line;
use nestkv_core::Store;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Prompt printed before each interactive line.
pub const PROMPT: &str = "Enter command: ";

/// Options controlling the command loop.
#[derive(Debug, Clone, Default)]
pub struct ReplOptions {
    /// Print a prompt before reading each line.
    pub prompt: bool,
    /// Log the frame chain as JSON after every state-changing command.
    pub dump_frames: bool,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// An `END` command was read.
    End,
    /// The input was exhausted.
    Eof,
}

/// A command session over one input and one output.
pub struct Repl<R, W> {
    store: Store,
    input: R,
    output: W,
    options: ReplOptions,
    lines: u64,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a session over `store`.
    pub fn new(store: Store, input: R, output: W, options: ReplOptions) -> Self {
        Self {
            store,
            input,
            output,
            options,
            lines: 0,
        }
    }

    /// Consumes the session and returns its store.
    ///
    /// Open transactions are left as they are.
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Runs until `END` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Bad
    /// commands are reported on the output and never end the loop.
    pub fn run(&mut self) -> io::Result<Exit> {
        let mut line = String::new();
        loop {
            if self.options.prompt {
                write!(self.output, "{PROMPT}")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!(lines = self.lines, "end of input");
                return Ok(Exit::Eof);
            }
            self.lines += 1;

            if self.step(&line)? == Some(Exit::End) {
                debug!(
                    lines = self.lines,
                    open_transactions = self.store.depth(),
                    "session ended"
                );
                return Ok(Exit::End);
            }
        }
    }

    /// Runs a single line, writing its reply.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the reply fails.
    pub fn step(&mut self, line: &str) -> io::Result<Option<Exit>> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(None),
            Err(err) => {
                debug!(line = self.lines, error = %err, "rejected line");
                writeln!(self.output, "{err}")?;
                return Ok(None);
            }
        };

        let mutating = command.is_mutating();
        let keyword = command.keyword();
        match execute(&mut self.store, command) {
            Reply::End => return Ok(Some(Exit::End)),
            reply => writeln!(self.output, "{reply}")?,
        }

        if mutating && self.options.dump_frames {
            self.dump_frames(keyword);
        }
        Ok(None)
    }

    fn dump_frames(&self, after: &str) {
        match serde_json::to_string(&self.store.frames()) {
            Ok(frames) => debug!(after, depth = self.store.depth(), %frames, "frame chain"),
            Err(err) => warn!(error = %err, "failed to render frame chain"),
        }
    }
}
