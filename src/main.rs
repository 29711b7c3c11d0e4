use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use redwood::config::DEFAULT_CONFIG_FILE;
use redwood::logging::init_logging;
use redwood::report::write_report_file;
use redwood::{
    remediate, scan_at, CliOverrides, Config, IgnoreList, PromptConfirm, RunOptions, ScanOptions,
};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Flag files that are too old (or too new) across configured directory trees, and optionally delete them",
    long_about = None
)]
struct Args {
    /// Flag only if both conditions are met. Only applies together with --empty
    #[arg(long, short)]
    and: bool,

    /// Truncate the log file before writing
    #[arg(long, short)]
    clean: bool,

    /// Extra directory to scan; repeat for several
    #[arg(long, short)]
    directory: Vec<PathBuf>,

    /// Delete flagged files
    #[arg(long)]
    delete: bool,

    /// Flag empty directories as well
    #[arg(long, short)]
    empty: bool,

    /// Do not ask for confirmation before deleting
    #[arg(long)]
    force: bool,

    /// Log file (overrides `logfile` in the config file)
    #[arg(long, short)]
    logfile: Option<PathBuf>,

    /// Config file to use
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    optionfile: PathBuf,

    /// Directory for report.txt
    #[arg(long, short, default_value = ".")]
    report: PathBuf,

    /// Flag files newer than the configured age instead of older
    #[arg(long)]
    reverse: bool,

    /// Move flagged files into this directory instead of deleting them
    #[arg(long, short)]
    trash: Option<PathBuf>,

    /// Age threshold for --directory targets (e.g. 36h, 2w, 1y)
    #[arg(long)]
    age: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            and: self.and,
            clean: self.clean,
            empty: self.empty,
            reverse: self.reverse,
            logfile: self.logfile.clone(),
            directories: self.directory.clone(),
            age: self.age.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.optionfile).context("Failed to load configuration")?;
    let options = RunOptions::resolve(&config, &args.overrides())
        .context("Failed to load configuration")?;

    init_logging(&options.logfile, options.clean)?;
    debug!("{:?}", args);
    debug!("{:?}", config);
    info!("START");

    let ignore_list = IgnoreList::load(&options.ignorefile).context("Failed to load ignore file")?;

    let result = scan_at(
        &options.targets,
        &ignore_list,
        ScanOptions {
            flag_empty: options.flag_empty,
        },
        SystemTime::now(),
    );
    let report_path = write_report_file(&args.report, &result.violations)?;

    println!(
        "{}",
        format!(
            "Flagged {} of {} entries ({} empty, {} ignored, {} errors)",
            result.violations.len(),
            result.stats.entries_checked,
            result.stats.empty_dirs,
            result.stats.ignored,
            result.stats.errors
        )
        .bold()
    );
    println!("Report written to {}", report_path.display());

    if args.delete {
        let mut confirm = PromptConfirm::stdin();
        let summary = remediate(
            &result.violations,
            args.force,
            args.trash.as_deref(),
            &mut confirm,
        );
        let verb = if args.trash.is_some() { "Moved" } else { "Deleted" };
        println!(
            "{}",
            format!("{} {} entries", verb, summary.deleted + summary.trashed).green()
        );
        if summary.parents_removed > 0 {
            println!("Removed {} empty parent directories", summary.parents_removed);
        }
        if summary.declined > 0 {
            println!("Skipped {} entries", summary.declined);
        }
        if summary.failed > 0 {
            println!(
                "{}",
                format!("Failed to remove {} entries, see log", summary.failed).red()
            );
        }
    }

    info!("END");
    Ok(())
}
