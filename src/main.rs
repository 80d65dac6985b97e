//! pdf-toolkit - Merge, split, extract and rename PDF files.

mod cli;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::cli::{BatchArgs, Cli, Command, PasswordPrompt, PreferencesArgs, RangeArgs};
use pdf_toolkit::config::RunSettings;
use pdf_toolkit::engine;
use pdf_toolkit::io::LopdfLibrary;
use pdf_toolkit::logging;
use pdf_toolkit::outcome::Outcome;
use pdf_toolkit::output::{OutputFormatter, display_outcome, outcome_json};
use pdf_toolkit::password::{ChannelPasswordProvider, PasswordRequest, PasswordResolver};
use pdf_toolkit::preferences::{PreferenceSlot, PreferencesStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let settings = cli.settings();

    let Some(command) = cli.command else {
        // Nothing to do; show usage and leave successfully.
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    let log_path = logging::init(settings.verbose);
    let formatter = OutputFormatter::new(settings.quiet, settings.verbose);
    if let Some(path) = &log_path {
        formatter.debug(&format!("Activity log: {}", path.display()));
    }

    match run(command, &settings, &formatter).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            tracing::error!(error = ?err, "pdf-toolkit failed");
            formatter.error(&format!("Error: {err:#}"));
            process::exit(1);
        }
    }
}

/// Main application logic. Returns the process exit code.
async fn run(
    command: Command,
    settings: &RunSettings,
    formatter: &OutputFormatter,
) -> anyhow::Result<i32> {
    if let Command::Preferences(args) = &command {
        preferences_command(args, formatter)?;
        return Ok(0);
    }

    let preference = command.preference();
    let job = Job::try_from(command)?;
    let outcome = run_job(job, settings).await?;

    if settings.json {
        formatter.raw(&outcome_json(&outcome)?);
    } else {
        display_outcome(formatter, &outcome);
    }

    if outcome.success
        && let Some((slot, location)) = preference
    {
        remember(slot, &location);
    }

    Ok(outcome.exit_code())
}

/// A fully resolved engine invocation, ready to move onto a worker thread.
enum Job {
    Merge { inputs: Vec<PathBuf>, output: PathBuf },
    Rename { file: PathBuf, output_dir: PathBuf, name: String },
    Split(RangeArgs),
    Extract(RangeArgs),
    BatchMerge(BatchArgs),
    BatchRename(BatchArgs),
    BatchSplit { file: PathBuf, output_dir: Option<PathBuf> },
}

impl TryFrom<Command> for Job {
    type Error = anyhow::Error;

    fn try_from(command: Command) -> anyhow::Result<Self> {
        Ok(match command {
            Command::Merge { files, output } => Job::Merge {
                inputs: cli::expand_inputs(&files)?,
                output,
            },
            Command::Rename {
                file,
                output_dir,
                name,
            } => Job::Rename {
                file,
                output_dir,
                name,
            },
            Command::Split(args) => Job::Split(args),
            Command::Extract(args) => Job::Extract(args),
            Command::BatchMerge(args) => Job::BatchMerge(args),
            Command::BatchRename(args) => Job::BatchRename(args),
            Command::BatchSplit { file, output_dir } => Job::BatchSplit { file, output_dir },
            Command::Preferences(_) => anyhow::bail!("preferences is not an engine operation"),
        })
    }
}

impl Job {
    fn execute(self, library: &LopdfLibrary, resolver: &mut PasswordResolver<'_>) -> Outcome {
        match self {
            Job::Merge { inputs, output } => engine::merge_pdfs(library, &inputs, &output, resolver),
            Job::Rename {
                file,
                output_dir,
                name,
            } => engine::rename_pdf(library, &file, &output_dir, &name),
            Job::Split(args) => {
                engine::split_pdf(library, &args.file, &args.range, &args.output_dir, resolver)
            }
            Job::Extract(args) => {
                engine::extract_pages(library, &args.file, &args.range, &args.output_dir, resolver)
            }
            Job::BatchMerge(args) => engine::batch_merge_pdfs(
                library,
                &args.input_dir,
                &args.name,
                args.output_dir.as_deref(),
                resolver,
            ),
            Job::BatchRename(args) => engine::batch_rename_pdfs(
                library,
                &args.input_dir,
                &args.name,
                args.output_dir.as_deref(),
            ),
            Job::BatchSplit { file, output_dir } => {
                engine::batch_split_pdf(library, &file, output_dir.as_deref(), resolver)
            }
        }
    }
}

/// Run `job` on a blocking worker while this task answers password requests.
async fn run_job(job: Job, settings: &RunSettings) -> anyhow::Result<Outcome> {
    let (provider, requests) = ChannelPasswordProvider::channel();
    let policy = settings.policy;

    let worker = tokio::task::spawn_blocking(move || {
        let library = LopdfLibrary::new();
        let mut resolver = PasswordResolver::with_provider(policy, provider);
        job.execute(&library, &mut resolver)
    });

    answer_password_requests(requests).await;

    worker.await.context("operation worker failed")
}

/// Serve password requests until the engine drops its provider.
async fn answer_password_requests(mut requests: mpsc::Receiver<PasswordRequest>) {
    // Prompts go to stderr so that `--json` output stays parseable.
    let mut prompt = PasswordPrompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr());

    while let Some(request) = requests.recv().await {
        let response = prompt.ask(&request.path).await;
        request.respond(response);
    }
}

fn preferences_command(args: &PreferencesArgs, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let mut store = PreferencesStore::open_default()?;

    if args.reset {
        store.reset()?;
        formatter.success("Preferences reset");
    }
    if args.enable {
        store.set_enabled(true)?;
        formatter.success("Preferences will be saved");
    }
    if args.disable {
        store.set_enabled(false)?;
        formatter.success("Preferences will no longer be saved");
    }

    let changed = args.reset || args.enable || args.disable;
    if args.show || !changed {
        formatter.debug(&format!("Preferences file: {}", store.path().display()));
        formatter.raw(&serde_json::to_string_pretty(store.preferences())?);
    }
    Ok(())
}

/// Record the last-used location, never failing the run over it.
fn remember(slot: PreferenceSlot, location: &Path) {
    let result = PreferencesStore::open_default().and_then(|mut store| store.record(slot, location));
    if let Err(e) = result {
        tracing::warn!(error = %format!("{e:#}"), "failed to save preferences");
    }
}
