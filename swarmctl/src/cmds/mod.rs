//! Implementation of the different sub-commands.
//!
//! Every command builds a list of flat rows then `render()` turns them into the requested
//! output format.
//!

use std::fmt::Debug;
use std::path::Path;

use eyre::Result;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::trace;

use swarmviz_engine::{Engine, Frame};
use swarmviz_formats::prepare_csv;

pub use frame::*;
pub use heatmap::*;
pub use stats::*;
pub use summary::*;
pub use timeline::*;

use crate::{Config, FrameSelector, Opts, Status};

mod frame;
mod heatmap;
mod stats;
mod summary;
mod timeline;

/// How results are written.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Output {
    /// `tabled` table for humans
    #[default]
    Table,
    /// CSV with header
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl From<&Opts> for Output {
    fn from(opts: &Opts) -> Self {
        if opts.json {
            Output::Json
        } else if opts.output.is_some() {
            Output::Csv
        } else {
            Output::Table
        }
    }
}

/// One line of output, same columns for all formats.
///
pub trait TableRow: Serialize + Debug {
    /// Column names for tables
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Format `rows`.  An empty list still gives a table header.
///
pub fn render<R: TableRow>(rows: &[R], output: Output) -> Result<String> {
    trace!("render {} rows as {:?}", rows.len(), output);
    match output {
        Output::Table => {
            let mut builder = Builder::default();
            builder.push_record(R::HEADER.iter().copied());
            for r in rows {
                builder.push_record(r.cells());
            }
            Ok(builder.build().with(Style::modern()).to_string())
        }
        Output::Csv => prepare_csv(rows, true),
        Output::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// Load a telemetry file with the configured surfaces.
///
pub fn load_engine(file: &Path, cfg: &Config) -> Result<Engine> {
    let engine = Engine::from_path(file)?
        .with_scene(cfg.scene)
        .with_heatmap(cfg.heatmap)
        .with_chart(cfg.timeline);
    Ok(engine)
}

/// Resolve `--index` or `--at`.
///
pub(crate) fn select_frame<'a>(engine: &'a Engine, select: &FrameSelector) -> Result<Frame<'a>> {
    match (select.index, &select.at) {
        (Some(index), _) => engine.frame(index),
        (None, Some(tp)) => engine.frame_at(tp),
        (None, None) => Err(Status::NoFrameSelected.into()),
    }
}

#[inline]
pub(crate) fn fmt_f64(v: f64) -> String {
    format!("{v:.2}")
}
