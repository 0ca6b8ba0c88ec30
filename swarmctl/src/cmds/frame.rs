use eyre::Result;
use serde::Serialize;
use tracing::{info, trace};

use swarmviz_engine::{swarm_palette, Engine, Projector, RANGE_OPACITY};

use crate::{fmt_f64, render, select_frame, FrameOpts, Output, TableRow};

/// A drone as placed on the scene.
///
#[derive(Debug, Serialize)]
pub struct FrameRow {
    pub drone_id: u32,
    pub swarm_id: i64,
    pub state: String,
    pub x: f64,
    pub y: f64,
    pub depth: f64,
    pub battery_radius: f64,
    pub range_radius: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: String,
}

impl TableRow for FrameRow {
    const HEADER: &'static [&'static str] = &[
        "Drone", "Swarm", "State", "X", "Y", "Depth", "Radius", "Range", "dX", "dY", "Colour",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.drone_id.to_string(),
            self.swarm_id.to_string(),
            self.state.clone(),
            fmt_f64(self.x),
            fmt_f64(self.y),
            fmt_f64(self.depth),
            fmt_f64(self.battery_radius),
            fmt_f64(self.range_radius),
            fmt_f64(self.vx),
            fmt_f64(self.vy),
            self.color.clone(),
        ]
    }
}

/// Project the selected frame.  An empty file gives an empty table.
///
#[tracing::instrument(skip(engine))]
pub fn show_frame(engine: &Engine, fopts: &FrameOpts, output: Output) -> Result<String> {
    if engine.is_empty() {
        info!("No data");
        return render::<FrameRow>(&[], output);
    }

    let mut scene = engine.scene();
    if let Some(mode) = fopts.mode {
        scene.mode = mode;
    }

    let frame = select_frame(engine, &fopts.select)?;
    let projector = Projector::new(scene, &frame.records);
    trace!("frame {} at {}, bounds {:?}", frame.index, frame.timepoint, projector.bounds());

    let palette = swarm_palette();
    let rows: Vec<_> = frame
        .records
        .iter()
        .map(|r| {
            let p = projector.project(r);
            FrameRow {
                drone_id: p.drone_id,
                swarm_id: p.swarm_id,
                state: r.state.clone(),
                x: p.x,
                y: p.y,
                depth: p.depth,
                battery_radius: p.battery_radius,
                range_radius: p.range_radius,
                vx: p.velocity.dx,
                vy: p.velocity.dy,
                color: palette.get(&p.swarm_id).to_string(),
            }
        })
        .collect();

    let res = render(&rows, output)?;
    if output == Output::Table {
        let n = engine.timepoints().len();
        Ok(format!(
            "Frame {}/{} at {} ({} mode, range opacity {})\n{res}",
            frame.index + 1,
            n,
            frame.timepoint,
            scene.mode,
            RANGE_OPACITY
        ))
    } else {
        Ok(res)
    }
}
