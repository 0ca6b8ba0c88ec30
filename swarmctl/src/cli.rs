//! Module describing all possible commands and sub-commands to the `swarmctl` main driver
//!
//! Every command takes a telemetry CSV file, loads it into the engine and prints one view of it:
//!
//! - `summary`: headline counts
//! - `timeline`: per-swarm average battery over time, with chart positions
//! - `frame`: projection of one frame on the scene
//! - `heatmap`: state grid cells
//! - `stats`: signal & video statistics for one frame
//!
//! `completion` is here just to configure the various shells completion system.
//!
//! Output is a table on `stdout` by default, CSV with `-o FILE` and JSON with `-J`.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Args, Parser};
use clap_complete::shells::Shell;

use swarmviz_engine::ScaleMode;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Output file (CSV unless -J is given).
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// JSON output.
    #[clap(short = 'J', long)]
    pub json: bool,
    /// Hierarchical trace output.
    #[clap(long)]
    pub tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub log_file: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `frame (--index N | --at TIMEPOINT) [--mode frame|world] FILE`
/// `heatmap FILE`
/// `stats (--index N | --at TIMEPOINT) FILE`
/// `summary FILE`
/// `timeline FILE`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Project one frame onto the scene
    Frame(FrameOpts),
    /// State of every drone at every timepoint
    Heatmap(FileOpts),
    /// Signal and video statistics for one frame
    Stats(StatsOpts),
    /// Headline numbers
    Summary(FileOpts),
    /// Average battery per swarm over time
    Timeline(FileOpts),
    /// List all module versions
    Version,
}

// ------

/// Only a file to read.
///
#[derive(Debug, Parser)]
pub struct FileOpts {
    /// Telemetry CSV file
    pub file: PathBuf,
}

/// Which frame to look at, by rank or by name.
///
#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct FrameSelector {
    /// Frame number, starting at 0
    #[clap(short = 'i', long)]
    pub index: Option<usize>,
    /// Timepoint label
    #[clap(short = 'a', long)]
    pub at: Option<String>,
}

#[derive(Debug, Parser)]
pub struct FrameOpts {
    #[clap(flatten)]
    pub select: FrameSelector,
    /// Override the configured scaling mode
    #[clap(short = 'm', long)]
    pub mode: Option<ScaleMode>,
    /// Telemetry CSV file
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct StatsOpts {
    #[clap(flatten)]
    pub select: FrameSelector,
    /// Telemetry CSV file
    pub file: PathBuf,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}
