use eyre::Result;
use serde::Serialize;
use tracing::info;

use swarmviz_engine::{state_palette, Engine};

use crate::{render, Output, TableRow};

/// Headline numbers, with the first and last timepoints.
///
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub records: usize,
    pub timepoints: usize,
    pub drones: usize,
    pub swarms: usize,
    pub first: String,
    pub last: String,
}

impl TableRow for SummaryRow {
    const HEADER: &'static [&'static str] =
        &["Records", "Timepoints", "Drones", "Swarms", "First", "Last"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.records.to_string(),
            self.timepoints.to_string(),
            self.drones.to_string(),
            self.swarms.to_string(),
            self.first.clone(),
            self.last.clone(),
        ]
    }
}

/// State legend, in order of first appearance.
///
#[derive(Debug, Serialize)]
pub struct StateRow {
    pub state: String,
    pub color: String,
}

impl TableRow for StateRow {
    const HEADER: &'static [&'static str] = &["State", "Colour"];

    fn cells(&self) -> Vec<String> {
        vec![self.state.clone(), self.color.clone()]
    }
}

#[tracing::instrument(skip(engine))]
pub fn show_summary(engine: &Engine, output: Output) -> Result<String> {
    let s = engine.summary();
    info!("{}", s);

    let tps = engine.timepoints();
    let row = SummaryRow {
        records: s.records,
        timepoints: s.timepoints,
        drones: s.drones,
        swarms: s.swarms,
        first: tps.first().cloned().unwrap_or_default(),
        last: tps.last().cloned().unwrap_or_default(),
    };
    let res = render(&[row], output)?;

    // The legend only makes sense for humans
    //
    if output != Output::Table {
        return Ok(res);
    }
    let palette = state_palette();
    let states: Vec<_> = engine
        .dataset()
        .states()
        .iter()
        .map(|st| StateRow {
            state: st.clone(),
            color: palette.get(st.as_str()).to_string(),
        })
        .collect();
    Ok(format!("{res}\n{s}\n{}", render(&states, output)?))
}
