//! Command-line interface for doccheck.
//!
//! Provides commands for analyzing a set of documents, running the
//! external update monitor, and inspecting the template catalog and
//! resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::LocalFile;
use crate::config::{self, Settings};
use crate::core::{catalog, EntryPath, Session};
use crate::domain::{format_size, ExternalUpdate};
use crate::monitor::{ExternalUpdateSimulator, UpdateCallback};

/// doccheck - Find contradictions across policy documents (simulated)
#[derive(Parser, Debug)]
#[command(name = "doccheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to .doccheck/config.yaml discovery)
    #[arg(long, global = true, env = "DOCCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload documents and analyze them for contradictions
    Analyze {
        /// Files to upload (at least 2 are needed)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat the files as chosen in a picker rather than dropped
        #[arg(long)]
        picker: bool,

        /// Override the maximum number of files
        #[arg(long)]
        max_files: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch for simulated external policy updates
    Monitor {
        /// How long to run, in seconds
        #[arg(short, long, default_value = "60")]
        duration: u64,

        /// Switch monitoring on at start (emits one update shortly after)
        #[arg(short, long)]
        activate: bool,
    },

    /// List the contradiction templates
    Catalog,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let resolved = config::config(self.config.as_deref())?;
        let settings = resolved.settings.clone();

        match self.command {
            Commands::Analyze {
                files,
                picker,
                max_files,
                json,
            } => analyze(settings, files, picker, max_files, json).await,
            Commands::Monitor { duration, activate } => {
                monitor(settings, duration, activate).await
            }
            Commands::Catalog => {
                show_catalog();
                Ok(())
            }
            Commands::Config => show_config(resolved),
        }
    }
}

/// Upload the given files into a fresh session and analyze them
async fn analyze(
    mut settings: Settings,
    paths: Vec<PathBuf>,
    picker: bool,
    max_files: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(max) = max_files {
        settings.intake.max_files = max;
        settings.validate()?;
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match LocalFile::open(path).await {
            Ok(file) => files.push(file),
            Err(e) => eprintln!("Skipping {}: {}", path.display(), e),
        }
    }

    let entry = if picker {
        EntryPath::Picker
    } else {
        EntryPath::DragDrop
    };

    let mut session = Session::new(&settings)?;
    let outcome = session.upload(files, entry).await;

    for name in &outcome.rejected {
        eprintln!("Unsupported file type: {}", name);
    }
    if !outcome.dropped.is_empty() {
        eprintln!(
            "Maximum of {} files allowed; ignored: {}",
            settings.intake.max_files,
            outcome.dropped.join(", ")
        );
    }
    for failure in &outcome.failed {
        eprintln!("Upload failed: {}", failure);
    }

    eprintln!("Documents:");
    for doc in session.documents() {
        eprintln!("  {} ({})", doc.name, format_size(doc.size));
    }

    if !session.can_analyze() {
        anyhow::bail!(
            "Please upload at least 2 documents for analysis ({} uploaded)",
            session.documents().len()
        );
    }

    eprintln!(
        "\nScanning {} documents for contradictions...",
        session.documents().len()
    );

    let report = session.analyze().await?;

    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        println!("{}", report.render_text());
    }

    eprintln!("\nUsage & billing:");
    eprint!("{}", session.usage().render_text(&settings.billing));

    session.clear_analysis();
    Ok(())
}

/// Run the update simulator for a fixed duration
async fn monitor(settings: Settings, duration: u64, activate: bool) -> Result<()> {
    let on_update: UpdateCallback = Arc::new(|update: &ExternalUpdate| {
        // Updates are only logged; no re-analysis is triggered
        tracing::info!(id = %update.id, "External update received: {}", update.title);
    });

    let handle = ExternalUpdateSimulator::spawn(&settings, on_update)?;

    if activate {
        handle.set_monitoring(true);
    }

    eprintln!("Monitoring external sources for {}s (Ctrl-C to stop)...", duration);

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(duration)) => {}
        _ = tokio::signal::ctrl_c() => eprintln!("Interrupted"),
    }

    let updates = handle.updates();
    handle.stop().await?;

    if updates.is_empty() {
        println!("No external updates detected");
        return Ok(());
    }

    println!("Recent updates ({}):", updates.len());
    for update in updates {
        println!(
            "\n{} - {} ({})",
            update.source,
            update.title,
            update.detected_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for change in &update.changes {
            println!("  -> {}", change);
        }
        println!("  Impacted: {}", update.impacted_policies.join(", "));
    }

    Ok(())
}

/// Print the contradiction templates
fn show_catalog() {
    for (idx, template) in catalog().iter().enumerate() {
        println!(
            "{}. {} / {}",
            idx + 1,
            template.category,
            template.severity
        );
        for statement in &template.statements {
            println!("   - \"{}\"", statement);
        }
        println!("   {}", template.explanation);
    }
}

/// Show resolved configuration
fn show_config(resolved: &config::ResolvedConfig) -> Result<()> {
    match &resolved.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }

    let file = config::ConfigFile {
        version: Some("1.0".to_string()),
        intake: resolved.settings.intake.clone(),
        analysis: resolved.settings.analysis.clone(),
        billing: resolved.settings.billing,
        monitor: resolved.settings.monitor.clone(),
        seed: resolved.settings.seed,
    };
    let yaml = serde_yaml::to_string(&file).context("Failed to render configuration")?;
    println!("\n{}", yaml);

    Ok(())
}
