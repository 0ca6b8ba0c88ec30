//! Library turning a batch of drone telemetry into everything a display needs.
//!
//! The `Engine` owns an immutable `Dataset` built once from the parsed records and derives
//! views from it on demand:
//!
//! - the canonical timepoint list and the records of every frame,
//! - the per-swarm battery timeline (computed once) and its chart layout,
//! - the projection of a frame onto the scene,
//! - the state heatmap grid,
//! - communication statistics.
//!
//! Nothing here draws anything or keeps any playback state; the caller drives the current
//! frame index and can use `next_index()`/`previous_index()` to move around.
//!
//! ```rust
//! use swarmviz_engine::Engine;
//!
//! let csv = "\
//! DroneID,TimePoint,SwarmID,TaskID,State,PositionX,PositionY,PositionZ,VelocityX,VelocityY,VelocityZ,Pitch,Roll,Yaw,Battery Percentage,Detection Range(Circle)
//! 1,T1,1,7,Hovering,0,0,10,1,1,0,0,0,0,80,30
//! 2,T1,1,7,Hovering,10,5,20,0,0,0,0,0,0,60,30
//! ";
//! let engine = Engine::from_csv(csv).unwrap();
//! assert_eq!(vec!["T1"], engine.timepoints());
//! assert_eq!(70., engine.timeline()[0].avg_battery);
//! ```
//!

use std::path::Path;

use eyre::Result;
use serde::Serialize;
use tracing::{debug, trace};

use swarmviz_formats::{parse_file, parse_telemetry, TelemetryRecord};

pub use dataset::*;
pub use error::*;
pub use heatmap::*;
pub use layout::{Cell, Margins};
pub use palette::*;
pub use projection::*;
pub use stats::*;
pub use timeline::*;

mod dataset;
mod error;
mod heatmap;
mod layout;
mod palette;
mod projection;
mod stats;
mod timeline;

const NAME: &str = env!("CARGO_PKG_NAME");
const EVERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> String {
    format!("{}/{}", NAME, EVERSION)
}

/// One frame: a timepoint and the records observed at it.
///
#[derive(Clone, Debug, Serialize)]
pub struct Frame<'a> {
    pub index: usize,
    pub timepoint: &'a str,
    pub records: Vec<&'a TelemetryRecord>,
}

/// Read-only view over a loaded batch.
///
#[derive(Clone, Debug, Default)]
pub struct Engine {
    /// Records and their indices
    dataset: Dataset,
    /// Per-swarm battery, computed at load time
    timeline: Vec<AggregatePoint>,
    /// Scene parameters for `project()`
    scene: SceneConfig,
    /// Heatmap surface
    heatmap: HeatmapConfig,
    /// Timeline chart surface
    chart: ChartConfig,
}

impl Engine {
    #[tracing::instrument(skip(records))]
    pub fn new(records: Vec<TelemetryRecord>) -> Self {
        let timeline = swarm_battery_timeline(&records);
        let dataset = Dataset::new(records);
        Engine {
            dataset,
            timeline,
            ..Engine::default()
        }
    }

    /// Parse CSV text and load it.
    ///
    pub fn from_csv(input: &str) -> Result<Self> {
        Ok(Self::new(parse_telemetry(input)?))
    }

    /// Parse a CSV file and load it.
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        trace!("loading {:?}", path.as_ref());
        Ok(Self::new(parse_file(path)?))
    }

    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    pub fn with_heatmap(mut self, heatmap: HeatmapConfig) -> Self {
        self.heatmap = heatmap;
        self
    }

    pub fn with_chart(mut self, chart: ChartConfig) -> Self {
        self.chart = chart;
        self
    }

    pub fn scene(&self) -> SceneConfig {
        self.scene
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Full validated batch, in input order.
    ///
    pub fn records(&self) -> &[TelemetryRecord] {
        self.dataset.records()
    }

    /// Canonical timepoint order.
    ///
    pub fn timepoints(&self) -> &[String] {
        self.dataset.timepoints()
    }

    pub fn records_at(&self, timepoint: &str) -> Vec<&TelemetryRecord> {
        self.dataset.records_at(timepoint)
    }

    /// Frame number `index` in canonical order.
    ///
    pub fn frame(&self, index: usize) -> Result<Frame<'_>> {
        let tps = self.timepoints();
        if tps.is_empty() {
            return Err(EngineStatus::EmptyDataset.into());
        }
        let timepoint = tps
            .get(index)
            .ok_or(EngineStatus::FrameOutOfRange(index, tps.len()))?;
        Ok(Frame {
            index,
            timepoint: timepoint.as_str(),
            records: self.records_at(timepoint),
        })
    }

    /// Frame of a given timepoint.
    ///
    pub fn frame_at(&self, timepoint: &str) -> Result<Frame<'_>> {
        if self.is_empty() {
            return Err(EngineStatus::EmptyDataset.into());
        }
        let index = self
            .dataset
            .timepoint_index(timepoint)
            .ok_or_else(|| EngineStatus::UnknownTimepoint(timepoint.to_owned()))?;
        self.frame(index)
    }

    /// Index after `index`, back to 0 after the last one.  Always 0 when there is no data.
    ///
    pub fn next_index(&self, index: usize) -> usize {
        match self.timepoints().len() {
            0 => 0,
            n => (index + 1) % n,
        }
    }

    /// Index before `index`, going to the last one from 0.
    ///
    pub fn previous_index(&self, index: usize) -> usize {
        match self.timepoints().len() {
            0 => 0,
            n => (index % n + n - 1) % n,
        }
    }

    /// Per-swarm average battery for every timepoint.
    ///
    pub fn timeline(&self) -> &[AggregatePoint] {
        &self.timeline
    }

    pub fn timeline_chart(&self) -> TimelineChart {
        TimelineChart::new(self.chart, &self.timeline)
    }

    /// Projector for a frame, following the scene configuration.
    ///
    pub fn projector(&self, frame: &[&TelemetryRecord]) -> Projector {
        Projector::new(self.scene, frame)
    }

    /// Project one record, with bounds taken from its own frame (or the world).
    ///
    pub fn project(&self, record: &TelemetryRecord) -> ProjectedPoint {
        let frame = self.records_at(&record.timepoint);
        self.projector(&frame).project(record)
    }

    /// Project every record of frame `index`.
    ///
    #[tracing::instrument(skip(self))]
    pub fn project_frame(&self, index: usize) -> Result<Vec<ProjectedPoint>> {
        let frame = self.frame(index)?;
        let points = self.projector(&frame.records).project_all(&frame.records);
        debug!("{} points at {}", points.len(), frame.timepoint);
        Ok(points)
    }

    pub fn heatmap(&self) -> HeatmapLayout<'_> {
        HeatmapLayout::new(&self.dataset, self.heatmap)
    }

    /// Heatmap cell of a drone at a timepoint, `None` if it has no record there.
    ///
    pub fn grid_cell(&self, drone_id: u32, timepoint: &str) -> Option<Cell> {
        self.heatmap().cell(drone_id, timepoint)
    }

    /// Communication statistics of frame `index`.
    ///
    pub fn comm_stats(&self, index: usize) -> Result<CommStats> {
        let frame = self.frame(index)?;
        Ok(CommStats::from_frame(&frame.records))
    }

    pub fn summary(&self) -> Summary {
        self.dataset.summary()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use swarmviz_formats::Vector3;

    use super::*;

    /// Record with the fields most tests care about.
    ///
    pub(crate) fn rec(drone: u32, tp: &str, swarm: i64, battery: f64) -> TelemetryRecord {
        let mut r = TelemetryRecord::new(drone, tp);
        r.swarm_id = swarm;
        r.battery = battery;
        r
    }

    fn sample() -> Engine {
        let mut recs = vec![
            rec(1, "T2", 1, 70.),
            rec(1, "T1", 1, 80.),
            rec(2, "T1", 1, 60.),
            rec(3, "T1", 2, 50.),
            rec(3, "T3", -1, 20.),
        ];
        for (i, r) in recs.iter_mut().enumerate() {
            r.position = Vector3 {
                x: i as f64 * 10.,
                y: i as f64,
                z: i as f64 * 2.,
            };
        }
        Engine::new(recs)
    }

    #[test]
    fn test_version() {
        assert!(version().starts_with("swarmviz-engine/"));
    }

    #[test]
    fn test_engine_outputs() {
        let e = sample();

        assert_eq!(5, e.records().len());
        assert_eq!(vec!["T1", "T2", "T3"], e.timepoints());
        assert_eq!(3, e.records_at("T1").len());

        let tl = e.timeline();
        assert_eq!(4, tl.len());
        assert_eq!(("T1", 1), (tl[0].timepoint.as_str(), tl[0].swarm_id));
        assert_abs_diff_eq!(70., tl[0].avg_battery, epsilon = 1e-9);
        assert_eq!(("T1", 2), (tl[1].timepoint.as_str(), tl[1].swarm_id));
        assert_abs_diff_eq!(50., tl[1].avg_battery, epsilon = 1e-9);
    }

    #[test]
    fn test_engine_last_write_wins() {
        let e = Engine::new(vec![rec(1, "T1", 1, 80.), rec(1, "T1", 1, 60.)]);
        assert_eq!(Some(60.), e.dataset().get(1, "T1").map(|r| r.battery));
    }

    #[test]
    fn test_engine_frame() {
        let e = sample();

        let f = e.frame(0).unwrap();
        assert_eq!("T1", f.timepoint);
        assert_eq!(vec![1, 2, 3], f.records.iter().map(|r| r.drone_id).collect::<Vec<_>>());

        let f = e.frame_at("T3").unwrap();
        assert_eq!(2, f.index);
        assert_eq!(1, f.records.len());
    }

    #[test]
    fn test_engine_frame_errors() {
        let e = sample();

        let err = e.frame(3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineStatus>(),
            Some(EngineStatus::FrameOutOfRange(3, 3))
        ));

        let err = e.frame_at("T9").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineStatus>(),
            Some(EngineStatus::UnknownTimepoint(_))
        ));

        let empty = Engine::new(vec![]);
        let err = empty.frame(0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineStatus>(),
            Some(EngineStatus::EmptyDataset)
        ));
    }

    #[rstest]
    #[case(0, 1, 2)]
    #[case(1, 2, 0)]
    #[case(2, 0, 1)]
    fn test_engine_navigation(#[case] index: usize, #[case] next: usize, #[case] prev: usize) {
        let e = sample();
        assert_eq!(next, e.next_index(index));
        assert_eq!(prev, e.previous_index(index));
    }

    #[test]
    fn test_engine_navigation_empty() {
        let e = Engine::new(vec![]);
        assert_eq!(0, e.next_index(4));
        assert_eq!(0, e.previous_index(0));
    }

    #[test]
    fn test_engine_project_frame() {
        let e = sample();
        let pts = e.project_frame(0).unwrap();

        // T1 holds records 1, 2 and 3 with x = 10, 20, 30
        assert_eq!(3, pts.len());
        assert_abs_diff_eq!(50., pts[0].x, epsilon = 1e-9);
        assert_abs_diff_eq!(850., pts[2].x, epsilon = 1e-9);

        let one = e.project(&e.records()[1]);
        assert_eq!(pts[0], one);
    }

    #[test]
    fn test_engine_project_non_finite_input() {
        let csv = "\
DroneID,TimePoint,SwarmID,TaskID,State,PositionX,PositionY,PositionZ,VelocityX,VelocityY,VelocityZ,Pitch,Roll,Yaw,Battery Percentage,Detection Range(Circle)
1,T1,1,7,Hovering,inf,0,infinity,0,0,0,0,0,0,inf,30
2,T1,1,7,Hovering,10,5,20,0,0,0,0,0,0,60,30
";
        let e = Engine::from_csv(csv).unwrap();
        let pts = e.project_frame(0).unwrap();

        assert!(pts
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.battery_radius.is_finite()));
        assert_abs_diff_eq!(50., pts[0].x, epsilon = 1e-9);
        assert_abs_diff_eq!(850., pts[1].x, epsilon = 1e-9);
    }

    #[test]
    fn test_engine_world_mode() {
        let e = sample().with_scene(SceneConfig {
            mode: ScaleMode::World,
            ..SceneConfig::default()
        });
        let pts = e.project_frame(0).unwrap();

        assert_abs_diff_eq!(50. + 0.1 * 800., pts[0].x, epsilon = 1e-9);
    }

    #[test]
    fn test_engine_grid_cell() {
        let e = sample();

        assert!(e.grid_cell(1, "T1").is_some());
        assert!(e.grid_cell(2, "T2").is_none());
        assert_eq!(5, e.heatmap().cells().len());
    }

    #[test]
    fn test_engine_empty() {
        let e = Engine::new(vec![]);

        assert!(e.is_empty());
        assert!(e.timeline().is_empty());
        assert!(e.heatmap().cells().is_empty());
        assert!(e.project_frame(0).is_err());
        assert_eq!(Summary::default(), e.summary());
    }

    #[test]
    fn test_engine_from_csv() {
        let csv = "\
DroneID,TimePoint,SwarmID,TaskID,State,PositionX,PositionY,PositionZ,VelocityX,VelocityY,VelocityZ,Pitch,Roll,Yaw,Battery Percentage,Detection Range(Circle),Singal Intensity(At most 5)
1,T1,1,7,Hovering,0,0,10,1,1,0,0,0,0,80,30,4
2,T1,-1,7,Hovering,10,5,20,0,0,0,0,0,0,60,30,
";
        let e = Engine::from_csv(csv).unwrap();
        let stats = e.comm_stats(0).unwrap();

        assert_eq!(1, stats.with_signal);
        assert_eq!(Some(4.), stats.avg_signal);
        assert_eq!(vec![-1, 1], e.dataset().swarm_ids());
    }
}
