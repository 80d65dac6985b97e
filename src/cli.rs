//! CLI argument parsing and the terminal password prompt.
//!
//! This module defines the command-line interface structure using `clap`
//! and the interactive prompt that answers password requests coming from
//! an engine running on a worker thread.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use pdf_toolkit::config::RunSettings;
use pdf_toolkit::password::PasswordResponse;
use pdf_toolkit::preferences::PreferenceSlot;

/// Typed at the password prompt to skip the current file.
pub const SKIP_TOKEN: &str = "__skip__";

/// Typed at the password prompt to skip this and every later encrypted file.
pub const SKIP_ALL_TOKEN: &str = "__skip_all__";

/// Merge, split, extract and rename PDF files.
///
/// Every operation reports a title and a message. Encrypted inputs are
/// unlocked by asking for their password on the terminal.
#[derive(Parser, Debug)]
#[command(name = "pdf-toolkit")]
#[command(version)]
#[command(about = "Merge, split, extract and rename PDF files", long_about = None)]
#[command(author)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Skip every encrypted PDF without asking for a password
    #[arg(long, global = true)]
    pub skip_all: bool,

    /// Print the outcome as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output, including debug diagnostics on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Command {
    /// Merge PDF files, in the order given, into one document
    ///
    /// Examples:
    ///   pdf-toolkit merge -f a.pdf b.pdf -o merged.pdf
    ///   pdf-toolkit merge -f "chapter*.pdf" -o book.pdf
    Merge {
        /// Input PDF files or glob patterns
        #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
        files: Vec<String>,

        /// Output PDF file path, used as given
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Rename a PDF and move it into a directory
    Rename {
        /// PDF file to rename
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Directory the renamed file is moved to
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output_dir: PathBuf,

        /// New file name; `.pdf` is added when missing
        #[arg(short = 'n', long = "newname", value_name = "NAME")]
        name: String,
    },

    /// Split a PDF into one file per page range
    ///
    /// Example:
    ///   pdf-toolkit split -f report.pdf -r "1-3, 5" -o out/
    Split(RangeArgs),

    /// Extract page ranges from a PDF into separate files
    Extract(RangeArgs),

    /// Merge every PDF in a directory, in file-name order
    BatchMerge(BatchArgs),

    /// Rename every PDF in a directory to `<name>_<n>.pdf`
    BatchRename(BatchArgs),

    /// Split a PDF into single-page files
    BatchSplit {
        /// PDF file to split
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Output directory, defaults to the directory of the file
        #[arg(short = 'o', long = "output", alias = "outputdirectory", value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Show or change saved preferences
    Preferences(PreferencesArgs),
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Source PDF file
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Page ranges, e.g. "1-3, 5, 7-9"
    #[arg(short, long, value_name = "RANGES")]
    pub range: String,

    /// Output directory
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory holding the input PDFs
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Base name of the result
    #[arg(short = 'n', long = "newname", value_name = "NAME")]
    pub name: String,

    /// Output directory, defaults to the input directory
    #[arg(short = 'o', long = "output", alias = "outputdirectory", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct PreferencesArgs {
    /// Print the saved preferences
    #[arg(long)]
    pub show: bool,

    /// Start remembering last-used locations
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Stop remembering last-used locations
    #[arg(long)]
    pub disable: bool,

    /// Forget everything and turn remembering off
    #[arg(long, conflicts_with_all = ["enable", "disable"])]
    pub reset: bool,
}

impl Cli {
    /// Process-level settings for this invocation.
    pub fn settings(&self) -> RunSettings {
        RunSettings {
            policy: RunSettings::initial_policy(self.skip_all),
            json: self.json,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

impl Command {
    /// The preference entry a successful run of this command updates.
    pub fn preference(&self) -> Option<(PreferenceSlot, PathBuf)> {
        match self {
            Self::Merge { files, .. } => files
                .first()
                .map(|f| (PreferenceSlot::MergedInput, PathBuf::from(f))),
            Self::Rename { file, .. } => Some((PreferenceSlot::Renamed, file.clone())),
            Self::Split(args) => Some((PreferenceSlot::Split, args.file.clone())),
            Self::Extract(args) => Some((PreferenceSlot::Extract, args.file.clone())),
            Self::BatchMerge(args) => Some((PreferenceSlot::BatchMerged, args.input_dir.clone())),
            Self::BatchRename(args) => {
                Some((PreferenceSlot::BatchRenamed, args.input_dir.clone()))
            }
            Self::BatchSplit { file, .. } => Some((PreferenceSlot::BatchSplit, file.clone())),
            Self::Preferences(_) => None,
        }
    }
}

/// Expand merge inputs given as glob patterns.
///
/// Arguments without glob metacharacters pass through untouched, so a
/// missing file still reaches the engine and is reported there. Matches of
/// one pattern are kept in the order `glob` yields them.
///
/// # Errors
///
/// Returns an error for a malformed pattern or an unreadable match.
pub fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !is_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let matches = glob::glob(input)
            .map_err(|e| anyhow::anyhow!("invalid pattern '{input}': {e}"))?;
        let before = paths.len();
        for entry in matches {
            paths.push(entry?);
        }
        if paths.len() == before {
            tracing::warn!(pattern = %input, "pattern matched no files");
        }
    }
    Ok(paths)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Asks for passwords on a terminal-like stream.
pub struct PasswordPrompt<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> PasswordPrompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    /// Ask for the password of `path`.
    ///
    /// End of input counts as skipping every remaining file.
    pub async fn ask(&mut self, path: &Path) -> PasswordResponse {
        let question = format!(
            "{} is encrypted. Enter its password ({SKIP_TOKEN} to skip, {SKIP_ALL_TOKEN} to skip all): ",
            path.display()
        );

        loop {
            let Some(answer) = self.read_answer(&question).await else {
                return PasswordResponse::SkipAll;
            };

            match answer.trim() {
                SKIP_ALL_TOKEN => return PasswordResponse::SkipAll,
                SKIP_TOKEN => match self.read_answer("Skip this file? [y/N]: ").await {
                    None => return PasswordResponse::SkipAll,
                    Some(confirm) if is_yes(&confirm) => return PasswordResponse::SkipOne,
                    Some(_) => continue,
                },
                _ => return PasswordResponse::Password(answer),
            }
        }
    }

    async fn read_answer(&mut self, question: &str) -> Option<String> {
        // A prompt that cannot be shown is not fatal; the answer is still read.
        let _ = self.output.write_all(question.as_bytes()).await;
        let _ = self.output.flush().await;

        match self.lines.next_line().await {
            Ok(Some(line)) => Some(line.trim_end_matches('\r').to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read from the terminal");
                None
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
