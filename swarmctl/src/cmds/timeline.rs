use eyre::Result;
use serde::Serialize;

use swarmviz_engine::{swarm_label, swarm_palette, Engine};

use crate::{fmt_f64, render, Output, TableRow};

/// One point of the battery timeline with its place on the chart.
///
#[derive(Debug, Serialize)]
pub struct TimelineRow {
    pub timepoint: String,
    pub swarm_id: i64,
    pub swarm: String,
    pub avg_battery: f64,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

impl TableRow for TimelineRow {
    const HEADER: &'static [&'static str] =
        &["Timepoint", "Swarm", "Avg battery", "X", "Y", "Colour"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.timepoint.clone(),
            self.swarm.clone(),
            fmt_f64(self.avg_battery),
            fmt_f64(self.x),
            fmt_f64(self.y),
            self.color.clone(),
        ]
    }
}

#[tracing::instrument(skip(engine))]
pub fn show_timeline(engine: &Engine, output: Output) -> Result<String> {
    let chart = engine.timeline_chart();
    let palette = swarm_palette();

    let rows: Vec<_> = engine
        .timeline()
        .iter()
        .filter_map(|p| {
            let index = engine.dataset().timepoint_index(&p.timepoint)?;
            Some(TimelineRow {
                timepoint: p.timepoint.clone(),
                swarm_id: p.swarm_id,
                swarm: swarm_label(p.swarm_id),
                avg_battery: p.avg_battery,
                x: chart.x(index),
                y: chart.y(p.avg_battery),
                color: palette.get(&p.swarm_id).to_string(),
            })
        })
        .collect();
    render(&rows, output)
}
