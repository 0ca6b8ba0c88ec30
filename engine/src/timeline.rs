//! Per-swarm average battery over time, and the layout of the corresponding chart.
//!

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use swarmviz_formats::TelemetryRecord;

use crate::layout::{scale, Margins};

/// Average battery of one swarm at one timepoint.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatePoint {
    pub timepoint: String,
    pub swarm_id: i64,
    pub avg_battery: f64,
}

/// Compute the average battery level for every (timepoint, swarm) pair with at least one record.
///
/// Output is ordered by timepoint (string order) then swarm id, whatever the input order is.
/// Duplicated (drone, timepoint) records all count.
///
#[tracing::instrument(skip(records))]
pub fn swarm_battery_timeline(records: &[TelemetryRecord]) -> Vec<AggregatePoint> {
    let mut buckets: BTreeMap<(&str, i64), Vec<f64>> = BTreeMap::new();

    records.iter().for_each(|r| {
        buckets
            .entry((r.timepoint.as_str(), r.swarm_id))
            .or_default()
            .push(r.battery);
    });

    let res: Vec<_> = buckets
        .into_iter()
        .map(|((timepoint, swarm_id), batteries)| {
            let total = batteries.iter().fold(0., |acc, b| acc + b);
            AggregatePoint {
                timepoint: timepoint.to_owned(),
                swarm_id,
                avg_battery: total / batteries.len() as f64,
            }
        })
        .collect();
    debug!("{} timeline points", res.len());
    res
}

/// Size of the timeline chart.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 800.,
            height: 400.,
        }
    }
}

/// Positions of the timeline points on the chart.
///
/// The x axis is the timepoint rank, the y axis goes from 5% under the lowest average up to 100%.
///
#[derive(Clone, Debug)]
pub struct TimelineChart {
    config: ChartConfig,
    margins: Margins,
    timepoints: Vec<String>,
    min_battery: f64,
}

impl TimelineChart {
    pub const MARGINS: Margins = Margins::new(40., 40., 60., 60.);
    /// Top of the battery axis
    pub const MAX_BATTERY: f64 = 100.;
    /// Room left under the lowest average
    const HEADROOM: f64 = 5.;
    /// Number of intervals between horizontal grid lines
    const TICKS: usize = 5;

    pub fn new(config: ChartConfig, points: &[AggregatePoint]) -> Self {
        let mut timepoints: Vec<String> = points.iter().map(|p| p.timepoint.clone()).collect();
        timepoints.sort();
        timepoints.dedup();

        let lowest = points
            .iter()
            .map(|p| p.avg_battery)
            .fold(f64::INFINITY, f64::min);
        let lowest = if lowest.is_finite() {
            lowest
        } else {
            Self::MAX_BATTERY
        };

        TimelineChart {
            config,
            margins: Self::MARGINS,
            timepoints,
            min_battery: lowest - Self::HEADROOM,
        }
    }

    /// Bottom of the battery axis.
    ///
    pub fn min_battery(&self) -> f64 {
        self.min_battery
    }

    /// Horizontal position of the `index`-th timepoint; a single timepoint sits in the middle.
    ///
    pub fn x(&self, index: usize) -> f64 {
        let span = self.margins.inner_width(self.config.width);
        let last = self.timepoints.len().saturating_sub(1) as f64;
        scale(index as f64, 0., last, self.margins.left, span)
    }

    /// Vertical position of a battery level, 100% at the top.
    ///
    pub fn y(&self, battery: f64) -> f64 {
        let span = self.margins.inner_height(self.config.height);
        let top = self.margins.top;
        // Flip: higher battery is higher on screen
        top + span - (scale(battery, self.min_battery, Self::MAX_BATTERY, top, span) - top)
    }

    /// Horizontal grid lines, from the top: `(y, battery value)`.
    ///
    pub fn ticks(&self) -> Vec<(f64, f64)> {
        let span = self.margins.inner_height(self.config.height);
        let step = (Self::MAX_BATTERY - self.min_battery) / Self::TICKS as f64;
        (0..=Self::TICKS)
            .map(|i| {
                let y = self.margins.top + span / Self::TICKS as f64 * i as f64;
                (y, Self::MAX_BATTERY - step * i as f64)
            })
            .collect()
    }

    /// Polyline of every swarm, in timepoint order.
    ///
    pub fn series(&self, points: &[AggregatePoint]) -> BTreeMap<i64, Vec<(f64, f64)>> {
        let mut res: BTreeMap<i64, Vec<(f64, f64)>> = BTreeMap::new();

        for p in points {
            if let Ok(index) = self.timepoints.binary_search(&p.timepoint) {
                res.entry(p.swarm_id)
                    .or_default()
                    .push((self.x(index), self.y(p.avg_battery)));
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::tests::rec;

    #[test]
    fn test_timeline_mean_per_swarm() {
        let recs = vec![rec(1, "T1", 1, 80.), rec(2, "T1", 1, 60.), rec(3, "T1", 2, 50.)];
        let tl = swarm_battery_timeline(&recs);

        assert_eq!(2, tl.len());
        assert_eq!("T1", tl[0].timepoint);
        assert_eq!(1, tl[0].swarm_id);
        assert_abs_diff_eq!(70., tl[0].avg_battery, epsilon = 1e-9);
        assert_eq!(2, tl[1].swarm_id);
        assert_abs_diff_eq!(50., tl[1].avg_battery, epsilon = 1e-9);
    }

    #[test]
    fn test_timeline_canonical_order() {
        let recs = vec![
            rec(1, "T2", 3, 10.),
            rec(2, "T1", 2, 20.),
            rec(3, "T2", -1, 30.),
            rec(4, "T1", -1, 40.),
            rec(5, "T1", 3, 50.),
        ];
        let tl = swarm_battery_timeline(&recs);
        let keys: Vec<_> = tl
            .iter()
            .map(|p| (p.timepoint.as_str(), p.swarm_id))
            .collect();

        assert_eq!(
            vec![("T1", -1), ("T1", 2), ("T1", 3), ("T2", -1), ("T2", 3)],
            keys
        );
    }

    #[test]
    fn test_timeline_unassigned_is_separate() {
        let recs = vec![rec(1, "T1", -1, 10.), rec(2, "T1", 0, 90.), rec(3, "T1", 1, 50.)];
        let tl = swarm_battery_timeline(&recs);

        assert_eq!(3, tl.len());
        assert_eq!(-1, tl[0].swarm_id);
        assert_eq!(10., tl[0].avg_battery);
        assert_eq!(0, tl[1].swarm_id);
        assert_eq!(90., tl[1].avg_battery);
    }

    #[test]
    fn test_timeline_deterministic() {
        let mut recs = vec![
            rec(1, "T2", 1, 33.3),
            rec(2, "T1", 2, 12.7),
            rec(3, "T1", 2, 99.1),
            rec(4, "T2", 1, 0.1),
        ];
        let a = swarm_battery_timeline(&recs);
        assert_eq!(a, swarm_battery_timeline(&recs));

        recs.reverse();
        let b = swarm_battery_timeline(&recs);
        let ka: Vec<_> = a.iter().map(|p| (&p.timepoint, p.swarm_id)).collect();
        let kb: Vec<_> = b.iter().map(|p| (&p.timepoint, p.swarm_id)).collect();
        assert_eq!(ka, kb);
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(pa.avg_battery, pb.avg_battery, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_timeline_empty() {
        assert!(swarm_battery_timeline(&[]).is_empty());
    }

    #[test]
    fn test_chart_axes() {
        let points = swarm_battery_timeline(&[
            rec(1, "T1", 1, 55.),
            rec(1, "T2", 1, 75.),
            rec(1, "T3", 1, 95.),
        ]);
        let chart = TimelineChart::new(ChartConfig::default(), &points);

        assert_eq!(50., chart.min_battery());
        assert_abs_diff_eq!(60., chart.x(0), epsilon = 1e-9);
        assert_abs_diff_eq!(410., chart.x(1), epsilon = 1e-9);
        assert_abs_diff_eq!(760., chart.x(2), epsilon = 1e-9);

        // 100% on the top margin, axis minimum on the bottom one
        assert_abs_diff_eq!(40., chart.y(100.), epsilon = 1e-9);
        assert_abs_diff_eq!(340., chart.y(50.), epsilon = 1e-9);
        assert_abs_diff_eq!(190., chart.y(75.), epsilon = 1e-9);
    }

    #[test]
    fn test_chart_single_timepoint_is_centered() {
        let points = swarm_battery_timeline(&[rec(1, "T1", 1, 55.)]);
        let chart = TimelineChart::new(ChartConfig::default(), &points);

        assert_abs_diff_eq!(60. + 700. / 2., chart.x(0), epsilon = 1e-9);
    }

    #[test]
    fn test_chart_ticks() {
        let points = swarm_battery_timeline(&[rec(1, "T1", 1, 55.)]);
        let chart = TimelineChart::new(ChartConfig::default(), &points);
        let ticks = chart.ticks();

        assert_eq!(6, ticks.len());
        assert_eq!((40., 100.), ticks[0]);
        assert_abs_diff_eq!(340., ticks[5].0, epsilon = 1e-9);
        assert_abs_diff_eq!(50., ticks[5].1, epsilon = 1e-9);
    }

    #[test]
    fn test_chart_series() {
        let points = swarm_battery_timeline(&[
            rec(1, "T1", 1, 55.),
            rec(2, "T1", 2, 65.),
            rec(1, "T2", 1, 75.),
        ]);
        let chart = TimelineChart::new(ChartConfig::default(), &points);
        let series = chart.series(&points);

        assert_eq!(vec![&1, &2], series.keys().collect::<Vec<_>>());
        assert_eq!(2, series[&1].len());
        assert_eq!(1, series[&2].len());
        assert_abs_diff_eq!(chart.x(1), series[&1][1].0, epsilon = 1e-9);
    }
}
