use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use store::MemoryStore;
use tools::{
    backup_store, format_inspect_pretty, load_document, restore_backup, scan_backup, summarize,
    verify_backup, BackupOptions, Exclusions, OutputFormat, RestoreOptions,
};
use tracing_subscriber::{fmt, EnvFilter};
use value::DatabaseId;

#[derive(Parser)]
#[command(
    name = "docvault",
    version,
    about = "Back up, restore and inspect document store data"
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the tag tree of a backed-up document, or of every document in a backup.
    Inspect {
        /// A document file or a backup directory.
        path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = InspectFormat::Pretty)]
        format: InspectFormat,
    },
    /// Restore a backup into memory and check it re-encodes unchanged.
    Verify {
        /// Backup directory.
        backup: PathBuf,
        /// Database references are bound to (`projects/p/databases/d` or a project id).
        #[arg(long, default_value = "local")]
        database: DatabaseId,
        /// Glob patterns of collections to leave out.
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Restore a backup into a store and back that store up again.
    Copy {
        /// Backup directory to read.
        from: PathBuf,
        /// Backup directory to write.
        to: PathBuf,
        /// Database references are bound to (`projects/p/databases/d` or a project id).
        #[arg(long, default_value = "local")]
        database: DatabaseId,
        /// Merge into existing documents instead of replacing them.
        #[arg(long)]
        merge: bool,
        /// Indent written documents.
        #[arg(long)]
        pretty: bool,
        /// Sort keys in written documents.
        #[arg(long)]
        stable: bool,
        /// Glob patterns of collections to leave out.
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Inspect { path, format } => {
            if path.is_dir() {
                let scan = scan_backup(&path, &Exclusions::none())?;
                for entry in scan.documents {
                    println!("== {} ({}) ==", entry.path, entry.file.display());
                    inspect_file(&entry.file, format)?;
                }
            } else {
                inspect_file(&path, format)?;
            }
        }
        Command::Verify {
            backup,
            database,
            exclude,
        } => {
            let options = RestoreOptions {
                exclusions: Exclusions::new(&exclude)?,
                ..RestoreOptions::default()
            };
            let report = verify_backup(&backup, database, &options)
                .with_context(|| format!("verify {}", backup.display()))?;
            print!("{}", report.run);
            for document in &report.mismatched {
                println!("mismatch: {document}");
            }
            if !report.is_clean() {
                anyhow::bail!("backup {} did not verify cleanly", backup.display());
            }
        }
        Command::Copy {
            from,
            to,
            database,
            merge,
            pretty,
            stable,
            exclude,
        } => {
            let exclusions = Exclusions::new(&exclude)?;
            let mut store = MemoryStore::new(database);
            let restore = RestoreOptions {
                merge,
                exclusions: exclusions.clone(),
                ..RestoreOptions::default()
            };
            let restored = restore_backup(&from, &mut store, &restore)
                .with_context(|| format!("restore {}", from.display()))?;
            println!("restore:");
            print!("{restored}");

            let backup = BackupOptions {
                format: OutputFormat { pretty, stable },
                exclusions,
                ..BackupOptions::default()
            };
            let written = backup_store(&store, &to, &backup)
                .with_context(|| format!("back up to {}", to.display()))?;
            println!("backup:");
            print!("{written}");
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn inspect_file(path: &Path, format: InspectFormat) -> Result<()> {
    let doc = load_document(path)?;
    let report = summarize(&doc);
    match format {
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
        InspectFormat::Pretty => {
            print!("{}", format_inspect_pretty(&report));
        }
    }
    Ok(())
}
