//! Build-log sink used by the decision layer.
//!
//! Decision routines report per-file rationale at low importance and
//! cache problems as warnings. Callers hand a sink down by reference;
//! the terminal sink filters by verbosity, the memory sink accumulates
//! everything for inspection in tests.

use std::sync::Mutex;

/// Importance of a progress message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Importance {
    /// Per-file rationale, shown only in verbose mode.
    Low,
    /// Regular progress, hidden by quiet mode.
    Normal,
    /// Always shown.
    High,
}

/// Sink for progress messages and warnings from the decision pass.
pub trait BuildLog {
    /// Reports a progress or rationale message.
    fn message(&self, importance: Importance, text: &str);

    /// Reports a warning, such as a cache that could not be read.
    fn warning(&self, text: &str);
}

/// Terminal sink that respects the CLI quiet/verbose flags.
pub struct ConsoleLog {
    quiet: bool,
    verbose: bool,
}

impl ConsoleLog {
    /// Creates a terminal sink. `quiet` silences everything below
    /// [`Importance::High`]; `verbose` reveals the per-file rationale.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

impl BuildLog for ConsoleLog {
    fn message(&self, importance: Importance, text: &str) {
        let visible = match importance {
            Importance::Low => self.verbose && !self.quiet,
            Importance::Normal => !self.quiet,
            Importance::High => true,
        };
        if visible {
            eprintln!("{text}");
        }
    }

    fn warning(&self, text: &str) {
        eprintln!("warning: {text}");
    }
}

/// A recorded log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEntry {
    /// A progress message and its importance.
    Message(Importance, String),
    /// A warning.
    Warning(String),
}

/// Accumulating sink for tests.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Just the warning texts, in order.
    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Warning(text) => Some(text),
                LogEntry::Message(..) => None,
            })
            .collect()
    }

    /// Just the message texts, in order, regardless of importance.
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Message(_, text) => Some(text),
                LogEntry::Warning(_) => None,
            })
            .collect()
    }
}

impl BuildLog for MemoryLog {
    fn message(&self, importance: Importance, text: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(LogEntry::Message(importance, text.to_string()));
    }

    fn warning(&self, text: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(LogEntry::Warning(text.to_string()));
    }
}
