use eyre::Result;
use serde::Serialize;

use swarmviz_engine::{state_palette, Engine};

use crate::{fmt_f64, render, Output, TableRow};

/// One painted cell of the state heatmap.
///
#[derive(Debug, Serialize)]
pub struct HeatmapRow {
    pub drone_id: u32,
    pub timepoint: String,
    pub state: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TableRow for HeatmapRow {
    const HEADER: &'static [&'static str] = &[
        "Drone", "Timepoint", "State", "Colour", "X", "Y", "Width", "Height",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.drone_id.to_string(),
            self.timepoint.clone(),
            self.state.clone(),
            self.color.clone(),
            fmt_f64(self.x),
            fmt_f64(self.y),
            fmt_f64(self.width),
            fmt_f64(self.height),
        ]
    }
}

#[tracing::instrument(skip(engine))]
pub fn show_heatmap(engine: &Engine, output: Output) -> Result<String> {
    let palette = state_palette();
    let rows: Vec<_> = engine
        .heatmap()
        .cells()
        .into_iter()
        .map(|(cell, r)| HeatmapRow {
            drone_id: r.drone_id,
            timepoint: r.timepoint.clone(),
            state: r.state.clone(),
            color: palette.get(r.state.as_str()).to_string(),
            x: cell.x,
            y: cell.y,
            width: cell.width,
            height: cell.height,
        })
        .collect();
    render(&rows, output)
}
