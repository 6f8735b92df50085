use anyhow::Result;
use clap::Parser;

use std::{io, path::PathBuf};

use ratings::{Report, ReportKind};

/// Ranks brands by the average rating of their products.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// CSV files containing product data (name, brand, price, rating)
    #[arg(long, required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Kind of report to produce
    #[arg(long, value_enum)]
    report: ReportKind,

    /// File of brand groups, one `GROUP_NAME | GROUP_REGEX` per line
    #[arg(long)]
    groups: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    log::debug!("{args:?}");
    let mut report = Report::new(args.report);
    if let Some(path) = &args.groups {
        report.read_groups(path)?;
    }
    report.read_files(&args.files, &mut io::stdout().lock())?;
    print!("{report}");
    Ok(())
}
