//! Progress counter for long-running operations.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// A progress counter that updates in place on TTY terminals.
///
/// Shows completion percentage and current/total counts in git style:
/// "Hashing files: 100% (6/6), done."
///
/// Counters are atomic so rayon workers can call [`Progress::inc`] through a
/// shared reference during the parallel hash pass.
pub struct Progress {
    /// Title displayed before the counter
    title: String,
    /// Total number of items to process
    total: usize,
    /// Number of items processed so far
    current: AtomicUsize,
    /// Whether stderr is a TTY (enables inline updating)
    is_tty: bool,
    /// Last displayed percentage (to avoid redundant redraws)
    last_percent: AtomicU8,
}

impl Progress {
    /// Creates a new progress counter with the given title and total items.
    ///
    /// If stderr is a TTY, progress updates inline. Otherwise it is silent.
    #[must_use]
    pub fn new(title: &str, total: usize) -> Self {
        let is_tty = io::stderr().is_terminal();

        let progress = Self {
            title: title.to_string(),
            total,
            current: AtomicUsize::new(0),
            is_tty,
            last_percent: AtomicU8::new(0),
        };

        if is_tty && total > 0 {
            progress.display(0);
        }

        progress
    }

    /// Records one completed item, redrawing when the percentage changes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn inc(&self) {
        let current = (self.current.fetch_add(1, Ordering::Relaxed) + 1).min(self.total);

        let percent = if self.total > 0 {
            ((current * 100) / self.total) as u8
        } else {
            0
        };

        let previous = self.last_percent.swap(percent, Ordering::Relaxed);
        if percent != previous && self.is_tty {
            self.display(percent);
        }
    }

    /// Number of items recorded so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current.load(Ordering::Relaxed).min(self.total)
    }

    /// Completes the counter and displays the final "done" message.
    pub fn finish(self) {
        if self.is_tty && self.total > 0 {
            eprintln!(
                "\r{}: 100% ({}/{}), done.",
                self.title.dimmed(),
                self.total,
                self.total
            );
        }
    }

    /// Displays the current progress state (percentage and count).
    fn display(&self, percent: u8) {
        if !self.is_tty || self.total == 0 {
            return;
        }

        eprint!(
            "\r{}: {}% ({}/{})",
            self.title.dimmed(),
            percent.to_string().dimmed(),
            self.position(),
            self.total
        );
        let _ = io::stderr().flush();
    }
}
