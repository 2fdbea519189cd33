use clap::Parser;
use miette::{IntoDiagnostic, Result};
use silanpay_verification::application::engine::VerificationEngine;
use silanpay_verification::domain::ports::{AccessControlBox, NotifierBox, SubmissionStoreBox};
use silanpay_verification::domain::step::StepRegistry;
use silanpay_verification::domain::submission::ReviewOutcome;
use silanpay_verification::infrastructure::access::AllowListAccessControl;
use silanpay_verification::infrastructure::in_memory::InMemorySubmissionStore;
use silanpay_verification::infrastructure::notify::LogNotifier;
use silanpay_verification::interfaces::csv::action_reader::{Action, ActionReader, ActionType};
use silanpay_verification::interfaces::csv::progress_writer::ProgressWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input verification actions CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Reviewer identity allowed to approve and reject (repeatable)
    #[arg(long = "admin")]
    admins: Vec<String>,

    /// TOML file overriding the built-in step definitions
    #[arg(long)]
    steps: Option<PathBuf>,

    /// Emit the per-step projection instead of the per-user summary
    #[arg(long)]
    detail: bool,
}

#[cfg(feature = "storage-rocksdb")]
fn build_store(cli: &Cli) -> Result<SubmissionStoreBox> {
    use silanpay_verification::infrastructure::rocksdb::RocksDbSubmissionStore;

    if let Some(db_path) = &cli.db_path {
        let store = RocksDbSubmissionStore::open(db_path).into_diagnostic()?;
        Ok(Box::new(store))
    } else {
        Ok(Box::new(InMemorySubmissionStore::new()))
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_store(_cli: &Cli) -> Result<SubmissionStoreBox> {
    Ok(Box::new(InMemorySubmissionStore::new()))
}

async fn apply_action(engine: &VerificationEngine, action: Action) -> silanpay_verification::error::Result<()> {
    let reviewer = action.actor.as_deref().unwrap_or("");
    match action.action {
        ActionType::Submit => {
            engine
                .submit(action.user, action.step, action.fields())
                .await?;
        }
        ActionType::Approve => {
            engine
                .review(reviewer, action.user, action.step, ReviewOutcome::Approve, None)
                .await?;
        }
        ActionType::Reject => {
            engine
                .review(
                    reviewer,
                    action.user,
                    action.step,
                    ReviewOutcome::Reject,
                    action.reason,
                )
                .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let registry = match &cli.steps {
        Some(path) => {
            let content = std::fs::read_to_string(path).into_diagnostic()?;
            StepRegistry::from_toml(&content).into_diagnostic()?
        }
        None => StepRegistry::default_steps(),
    };

    let store = build_store(&cli)?;
    let access: AccessControlBox = Box::new(AllowListAccessControl::new(cli.admins.clone()));
    let notifier: NotifierBox = Box::new(LogNotifier);
    let engine = VerificationEngine::new(registry, store, access, notifier);

    // Process actions
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => {
                if let Err(e) = apply_action(&engine, action).await {
                    eprintln!("Error processing action: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    // Output the final projection
    let reports = engine.all_progress().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ProgressWriter::new(stdout.lock());
    if cli.detail {
        writer.write_steps(&reports).into_diagnostic()?;
    } else {
        writer.write_summary(&reports).into_diagnostic()?;
    }

    Ok(())
}
