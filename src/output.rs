//! Output rendering abstraction for chatelix.
//!
//! Defines the [`StreamSink`] trait that decouples streamed generations from
//! the display layer. [`StdoutRenderer`] prints deltas directly to the
//! terminal as they arrive.

use colored::Colorize;
use std::io::{self, Write};

use crate::recovery::{analyze_error, format_user_message, should_show_to_user};
use crate::stream::StreamError;

/// Receives the events of a streamed generation.
///
/// For every generation, `on_chunk` fires zero or more times, followed by
/// exactly one of `on_complete`, `on_cancelled` or `on_error`.
pub trait StreamSink {
    /// Render a single delta as it arrives.
    fn on_chunk(&mut self, text: &str);

    /// Called once with the full text when the stream ends.
    fn on_complete(&mut self, full_text: &str);

    /// Called when a stream fails. Not called for failures the fallback
    /// cascade recovers from.
    fn on_error(&mut self, err: &StreamError);

    /// Called when the caller cancels the stream.
    fn on_cancelled(&mut self) {}

    /// Called when the fallback cascade abandons `failed` and moves to `next`.
    fn on_fallback(&mut self, failed: &str, next: &str, err: &StreamError) {
        let _ = (failed, next, err);
    }
}

/// Renders streaming output directly to stdout.
///
/// Each delta is printed immediately with an explicit flush so the user
/// sees a "typing" effect. Diagnostics go to stderr.
pub struct StdoutRenderer {
    chunk_count: usize,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self { chunk_count: 0 }
    }
}

impl StreamSink for StdoutRenderer {
    fn on_chunk(&mut self, text: &str) {
        print!("{}", text);
        // Flush immediately so each delta appears as it arrives
        io::stdout().flush().ok();
        self.chunk_count += 1;
    }

    fn on_complete(&mut self, _full_text: &str) {
        println!();
        println!();
        println!("{}", format!("[{} chunks]", self.chunk_count).dimmed());
    }

    /// Prints the recovery hints; the raw error is reported by the caller.
    fn on_error(&mut self, err: &StreamError) {
        let info = analyze_error(err);
        if should_show_to_user(&info) {
            eprintln!();
            eprint!("{}", format_user_message(&info).yellow());
        }
    }

    fn on_cancelled(&mut self) {
        println!();
        println!("{}", "[cancelled]".yellow());
    }

    fn on_fallback(&mut self, failed: &str, next: &str, err: &StreamError) {
        if self.chunk_count > 0 {
            println!();
        }
        eprintln!(
            "{} {} failed ({}), trying {}",
            "fallback:".yellow().bold(),
            failed,
            err,
            next.cyan()
        );
    }
}
