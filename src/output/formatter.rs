//! Terminal styling for outcomes.
//!
//! Every line the binary prints goes through an [`OutputFormatter`], which
//! decides from its quiet and verbose settings whether the line is shown and
//! how it is marked.
//!
//! # Examples
//!
//! ```
//! use pdf_toolkit::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.success("Success: PDFs merged successfully!");
//! formatter.file_list("Created files:", ["doc_page_1.pdf", "doc_page_2.pdf"]);
//! ```

use std::fmt::Display;
use std::io::{self, IsTerminal};

use crate::outcome::Severity;

/// How a line is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    /// Diagnostics shown only with `--verbose`.
    Detail,
}

impl Tone {
    fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Error => ("✗ ", "\x1b[31m"),
            Self::Detail => ("→ ", "\x1b[36m"),
        }
    }
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => Self::Success,
            Severity::Warning => Self::Warning,
            Severity::Error => Self::Error,
        }
    }
}

/// Prints outcome lines with configurable verbosity.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter. Colour is used only on a terminal with `TERM` set.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Create a formatter that never emits escape codes.
    pub fn plain(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: false,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn success(&self, message: &str) {
        self.emit(Tone::Success, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Tone::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Tone::Error, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Tone::Detail, message);
    }

    /// Print `message` marked with `tone`, if the settings allow it.
    ///
    /// Quiet mode keeps warnings and errors; details need verbose mode.
    pub fn emit(&self, tone: Tone, message: &str) {
        if self.shows(tone) {
            println!("{}", self.style(tone, message));
        }
    }

    /// Print a numbered list under `heading`. Nothing is printed for an
    /// empty list or in quiet mode.
    pub fn file_list<I, T>(&self, heading: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        if self.quiet {
            return;
        }
        if let Some(block) = numbered(heading, items) {
            println!("{block}");
        }
    }

    /// Print a line verbatim, even in quiet mode.
    pub fn raw(&self, text: &str) {
        println!("{text}");
    }

    fn shows(&self, tone: Tone) -> bool {
        match tone {
            Tone::Warning | Tone::Error => true,
            Tone::Success => !self.quiet,
            Tone::Detail => self.verbose,
        }
    }

    fn style(&self, tone: Tone, message: &str) -> String {
        let (prefix, color) = tone.marker();
        if self.colored {
            format!("{color}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }
}

fn numbered<I, T>(heading: &str, items: I) -> Option<String>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let mut block = format!("\n{heading}");
    let mut count = 0;
    for (i, item) in items.into_iter().enumerate() {
        block.push_str(&format!("\n  {}. {item}", i + 1));
        count += 1;
    }
    (count > 0).then_some(block)
}
