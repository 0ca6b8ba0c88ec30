use eyre::Result;
use serde::Serialize;

use swarmviz_engine::{CommStats, Engine};

use crate::{fmt_f64, render, select_frame, Output, StatsOpts, TableRow};

/// One line of the communication statistics.
///
#[derive(Debug, Serialize)]
pub struct StatsRow {
    /// `signal` or `video`
    pub kind: String,
    /// Signal level or video status
    pub value: String,
    pub count: usize,
    pub percent: f64,
}

impl TableRow for StatsRow {
    const HEADER: &'static [&'static str] = &["Kind", "Value", "Count", "%"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.kind.clone(),
            self.value.clone(),
            self.count.to_string(),
            fmt_f64(self.percent),
        ]
    }
}

fn stats_rows(stats: &CommStats) -> Vec<StatsRow> {
    let (on, off) = stats.video_percent();

    let mut rows: Vec<_> = stats
        .levels
        .iter()
        .map(|l| StatsRow {
            kind: "signal".into(),
            value: l.level.to_string(),
            count: l.count,
            percent: l.percent,
        })
        .collect();
    rows.push(StatsRow {
        kind: "video".into(),
        value: "On".into(),
        count: stats.video_on,
        percent: on,
    });
    rows.push(StatsRow {
        kind: "video".into(),
        value: "Off".into(),
        count: stats.video_off,
        percent: off,
    });
    rows
}

/// Signal & video statistics of the selected frame.  An empty file gives an empty table.
///
#[tracing::instrument(skip(engine))]
pub fn show_stats(engine: &Engine, sopts: &StatsOpts, output: Output) -> Result<String> {
    if engine.is_empty() {
        return render::<StatsRow>(&[], output);
    }

    let frame = select_frame(engine, &sopts.select)?;
    let stats = CommStats::from_frame(&frame.records);
    let res = render(&stats_rows(&stats), output)?;

    if output == Output::Table {
        let avg = stats
            .avg_signal
            .map(|a| format!("{a:.2} / 5"))
            .unwrap_or_else(|| "n/a".to_string());
        Ok(format!(
            "Communication status at {}\n{res}\nAverage signal: {avg}",
            frame.timepoint
        ))
    } else {
        Ok(res)
    }
}
