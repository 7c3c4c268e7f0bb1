//! Print displayable performance counter values from captured reads.

#![allow(clippy::print_stdout)]

use std::{
    io,
    path::{Path, PathBuf},
};

use clap::Parser;
use perfsnap::{
    capture::{self, FileSource},
    config::{self, Config},
    report,
};
use perfsnap_model::{CategorySnapshot, builder, key, read_category};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// path on disk to the configuration file
    #[clap(long)]
    config_path: Option<PathBuf>,

    /// capture of the earlier read, baseline for rate and timer counters
    #[clap(short, long)]
    previous: Option<PathBuf>,

    /// category to report on, overrides the configuration file
    #[clap(long)]
    category: Option<String>,

    /// report only this counter, overrides the configuration file
    #[clap(short, long)]
    counter: Option<String>,

    /// report only this instance
    #[clap(short, long)]
    instance: Option<String>,

    /// list the categories present in the capture and exit
    #[clap(short, long)]
    list_categories: bool,

    /// Path to line-delimited capture of the current read
    current: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Capture(#[from] capture::Error),
    #[error(transparent)]
    Read(#[from] builder::Error<capture::Error>),
    #[error("Capture holds no counters")]
    EmptyCapture,
}

fn read_capture(path: &Path, category: &str) -> Result<CategorySnapshot, Error> {
    let mut source = FileSource::from_path(path)?;
    let snapshot = read_category(&mut source, category)?;
    debug!(
        path = %path.display(),
        counters = snapshot.len(),
        "category read"
    );
    Ok(snapshot)
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    /// Print the capture's categories.
    List,
    /// Nothing to report on.
    Empty,
    /// Report on this category.
    Report(String),
}

fn select_category(requested: Option<String>, categories: &[String], list: bool) -> Selection {
    if list {
        return Selection::List;
    }
    if let Some(category) = requested {
        return Selection::Report(category);
    }
    match categories {
        [] => Selection::Empty,
        [only] => Selection::Report(only.clone()),
        _ => Selection::List,
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish()
        .init();

    let args = Args::parse();
    let mut config = match &args.config_path {
        Some(path) => config::load_config_from_path(path)?,
        None => Config::default(),
    };
    if let Some(counter) = args.counter {
        config.counters = Some(vec![counter]);
    }

    let mut current_source = FileSource::from_path(&args.current)?;
    let categories: Vec<String> = current_source
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    let requested = args.category.or_else(|| config.category.clone());
    let category = match select_category(requested, &categories, args.list_categories) {
        Selection::List => {
            for name in &categories {
                println!("{name}");
            }
            return Ok(());
        }
        Selection::Empty => return Err(Error::EmptyCapture),
        Selection::Report(category) => category,
    };
    if !current_source.has_category(&category) {
        warn!(%category, "capture holds no records for category");
    }
    info!(%category, "reporting");

    let current = read_category(&mut current_source, &category)?;
    let previous = match &args.previous {
        Some(path) => Some(read_capture(path, &category)?),
        None => None,
    };

    let wanted_instance = args.instance.as_deref().map(key::instance_key);
    let report = report::compute(previous.as_ref(), &current, &config);
    for row in report.rows {
        if wanted_instance
            .as_ref()
            .is_some_and(|wanted| key::instance_key(&row.instance) != *wanted)
        {
            continue;
        }
        match row.value {
            Ok(value) => println!(
                "{}\t{}\t{value:.precision$}",
                row.counter,
                row.instance,
                precision = config.precision
            ),
            Err(_) => println!("{}\t{}\tn/a", row.counter, row.instance),
        }
    }
    Ok(())
}
