//! Projection of a frame onto the 2D scene, with a fake 3D effect.
//!
//! x and y are mapped linearly onto the surface (inside fixed margins) then the altitude is
//! shown by lifting the point by up to `DEPTH_SCALE` pixels, proportionally to `z / zMax`.
//!
//! Two ways to get the x/y bounds:
//!
//! - `ScaleMode::Frame`: min/max of the frame being displayed, the scene always uses the whole
//!   surface but moves from one frame to the next,
//! - `ScaleMode::World`: fixed declared world range (`0..100` by default), needed when some
//!   background picture has to stay aligned across frames.
//!
//! `zMax` always comes from the frame.
//!

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::trace;

use swarmviz_formats::TelemetryRecord;

use crate::layout::{scale, unscale, Margins};

/// Margins of the scene, the bottom one has room for the depth offset.
pub const SCENE_MARGINS: Margins = Margins::new(50., 50., 100., 50.);
/// Maximum vertical lift for the highest drone
pub const DEPTH_SCALE: f64 = 50.;
/// Pixels per velocity unit
pub const VELOCITY_SCALE: f64 = 20.;
/// Length of the arrow head
pub const ARROW_HEAD: f64 = 6.;
/// Opacity of the detection circle
pub const RANGE_OPACITY: f64 = 0.1;

/// Where x/y bounds come from.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    strum::Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScaleMode {
    /// min/max of the current frame
    #[default]
    Frame,
    /// Declared world range
    World,
}

/// Scene parameters.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f64,
    pub height: f64,
    pub mode: ScaleMode,
    /// World range, used in `ScaleMode::World`
    pub world_min: f64,
    pub world_max: f64,
    /// Added on each side of the frame bounds in `ScaleMode::Frame`
    pub padding: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            width: 900.,
            height: 600.,
            mode: ScaleMode::Frame,
            world_min: 0.,
            world_max: 100.,
            padding: 0.,
        }
    }
}

/// Physical bounds used for the mapping.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_max: f64,
}

impl Bounds {
    /// Bounds of a set of records, widened by `padding`.  Empty sets give zero bounds.
    ///
    pub fn of_frame<'a, I>(records: I, padding: f64) -> Self
    where
        I: IntoIterator<Item = &'a TelemetryRecord>,
    {
        let mut it = records.into_iter().peekable();
        if it.peek().is_none() {
            return Bounds::default();
        }

        let b = it.fold(
            Bounds {
                x_min: f64::INFINITY,
                x_max: f64::NEG_INFINITY,
                y_min: f64::INFINITY,
                y_max: f64::NEG_INFINITY,
                z_max: f64::NEG_INFINITY,
            },
            |b, r| Bounds {
                x_min: b.x_min.min(r.position.x),
                x_max: b.x_max.max(r.position.x),
                y_min: b.y_min.min(r.position.y),
                y_max: b.y_max.max(r.position.y),
                z_max: b.z_max.max(r.position.z),
            },
        );
        Bounds {
            x_min: b.x_min - padding,
            x_max: b.x_max + padding,
            y_min: b.y_min - padding,
            y_max: b.y_max + padding,
            z_max: b.z_max + padding,
        }
    }
}

/// Velocity arrow, relative to the drone position, in drawing space.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Arrow {
    pub dx: f64,
    pub dy: f64,
}

impl Arrow {
    /// The two segments of the arrow head for an arrow starting at `(x, y)`.
    ///
    pub fn head(&self, x: f64, y: f64) -> [(f64, f64); 2] {
        let (tx, ty) = (x + self.dx, y + self.dy);
        let angle = self.dy.atan2(self.dx);
        [angle - PI / 6., angle + PI / 6.].map(|a| (tx - ARROW_HEAD * a.cos(), ty - ARROW_HEAD * a.sin()))
    }
}

/// A record placed on the scene.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub drone_id: u32,
    pub swarm_id: i64,
    pub x: f64,
    pub y: f64,
    /// Vertical lift already applied to `y`
    pub depth: f64,
    /// Drone circle, grows with battery
    pub battery_radius: f64,
    /// Detection circle, drawn with `RANGE_OPACITY`
    pub range_radius: f64,
    pub velocity: Arrow,
}

/// Radius of the drone circle, 5px at 0% (or below), 20px at 100%.
///
#[inline]
pub fn battery_radius(battery: f64) -> f64 {
    5. + 15. * battery.max(0.) / 100.
}

/// Radius of the detection circle, 20px for a null range, 60px for 100.
///
#[inline]
pub fn range_radius(range: f64) -> f64 {
    20. + 40. * range.max(0.) / 100.
}

/// Maps records of one frame onto the scene.
///
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    config: SceneConfig,
    bounds: Bounds,
}

impl Projector {
    /// Prepare the projection for `frame`, following the configured `ScaleMode`.
    ///
    pub fn new(config: SceneConfig, frame: &[&TelemetryRecord]) -> Self {
        let mut bounds = Bounds::of_frame(frame.iter().copied(), config.padding);
        if config.mode == ScaleMode::World {
            bounds.x_min = config.world_min;
            bounds.x_max = config.world_max;
            bounds.y_min = config.world_min;
            bounds.y_max = config.world_max;
        }
        trace!("bounds = {bounds:?}");
        Projector { config, bounds }
    }

    /// Use explicit bounds.
    ///
    pub fn with_bounds(config: SceneConfig, bounds: Bounds) -> Self {
        Projector { config, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    fn x_span(&self) -> f64 {
        SCENE_MARGINS.inner_width(self.config.width)
    }

    #[inline]
    fn y_span(&self) -> f64 {
        SCENE_MARGINS.inner_height(self.config.height)
    }

    /// Lift in pixels for altitude `z`; nothing if the frame has no positive altitude.
    ///
    pub fn depth(&self, z: f64) -> f64 {
        if self.bounds.z_max > 0. {
            z / self.bounds.z_max * DEPTH_SCALE
        } else {
            0.
        }
    }

    /// Drawing coordinates of a physical position.
    ///
    pub fn to_screen(&self, x: f64, y: f64, z: f64) -> (f64, f64) {
        let b = &self.bounds;
        let sx = scale(x, b.x_min, b.x_max, SCENE_MARGINS.left, self.x_span());
        let sy = scale(y, b.y_min, b.y_max, SCENE_MARGINS.top, self.y_span()) - self.depth(z);
        (sx, sy)
    }

    /// Physical x/y of a drawing position, knowing the altitude.
    ///
    pub fn unproject(&self, sx: f64, sy: f64, z: f64) -> (f64, f64) {
        let b = &self.bounds;
        let x = unscale(sx, b.x_min, b.x_max, SCENE_MARGINS.left, self.x_span());
        let y = unscale(
            sy + self.depth(z),
            b.y_min,
            b.y_max,
            SCENE_MARGINS.top,
            self.y_span(),
        );
        (x, y)
    }

    /// Place one record.
    ///
    pub fn project(&self, rec: &TelemetryRecord) -> ProjectedPoint {
        let (x, y) = self.to_screen(rec.position.x, rec.position.y, rec.position.z);
        ProjectedPoint {
            drone_id: rec.drone_id,
            swarm_id: rec.swarm_id,
            x,
            y,
            depth: self.depth(rec.position.z),
            battery_radius: battery_radius(rec.battery),
            range_radius: range_radius(rec.detection_range),
            // Screen y goes down
            velocity: Arrow {
                dx: rec.velocity.x * VELOCITY_SCALE,
                dy: -rec.velocity.y * VELOCITY_SCALE,
            },
        }
    }

    /// Place a whole frame, same order.
    ///
    pub fn project_all(&self, frame: &[&TelemetryRecord]) -> Vec<ProjectedPoint> {
        frame.iter().map(|r| self.project(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use swarmviz_formats::Vector3;

    use super::*;
    use crate::tests::rec;

    fn at(drone: u32, x: f64, y: f64, z: f64) -> TelemetryRecord {
        let mut r = rec(drone, "T1", 1, 50.);
        r.position = Vector3 { x, y, z };
        r
    }

    #[test]
    fn test_frame_extremes_on_margins() {
        let recs = [at(1, -20., 5., 0.), at(2, 80., 15., 0.), at(3, 30., 10., 0.)];
        let frame: Vec<_> = recs.iter().collect();
        let p = Projector::new(SceneConfig::default(), &frame);

        let pts = p.project_all(&frame);
        assert_abs_diff_eq!(50., pts[0].x, epsilon = 1e-9);
        assert_abs_diff_eq!(850., pts[1].x, epsilon = 1e-9);
        assert_abs_diff_eq!(450., pts[2].x, epsilon = 1e-9);

        // y: 50 at the top, 50 + 450 at the bottom
        assert_abs_diff_eq!(50., pts[0].y, epsilon = 1e-9);
        assert_abs_diff_eq!(500., pts[1].y, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_padding() {
        let recs = [at(1, 0., 0., 0.), at(2, 80., 80., 0.)];
        let frame: Vec<_> = recs.iter().collect();
        let cfg = SceneConfig {
            padding: 10.,
            ..SceneConfig::default()
        };
        let p = Projector::new(cfg, &frame);

        assert_abs_diff_eq!(50. + 10. / 100. * 800., p.project(&recs[0]).x, epsilon = 1e-9);
        assert_eq!(90., p.bounds().x_max);
    }

    #[test]
    fn test_single_x_is_centered() {
        let recs = [at(1, 7., 1., 0.), at(2, 7., 9., 0.)];
        let frame: Vec<_> = recs.iter().collect();
        let p = Projector::new(SceneConfig::default(), &frame);

        assert_abs_diff_eq!(450., p.project(&recs[0]).x, epsilon = 1e-9);
        assert_abs_diff_eq!(450., p.project(&recs[1]).x, epsilon = 1e-9);
    }

    #[test]
    fn test_depth_offset() {
        let recs = [at(1, 0., 0., 0.), at(2, 10., 10., 40.), at(3, 10., 10., 20.)];
        let frame: Vec<_> = recs.iter().collect();
        let p = Projector::new(SceneConfig::default(), &frame);

        let low = p.project(&recs[0]);
        let high = p.project(&recs[1]);
        let mid = p.project(&recs[2]);
        assert_eq!(0., low.depth);
        assert_abs_diff_eq!(DEPTH_SCALE, high.depth, epsilon = 1e-9);
        assert_abs_diff_eq!(DEPTH_SCALE / 2., mid.depth, epsilon = 1e-9);
        // same x/y, higher is drawn higher
        assert!(high.y < mid.y);
        assert_abs_diff_eq!(500. - DEPTH_SCALE, high.y, epsilon = 1e-9);
    }

    #[test]
    fn test_depth_flat_frame() {
        let recs = [at(1, 0., 0., 0.), at(2, 10., 10., 0.)];
        let frame: Vec<_> = recs.iter().collect();
        let p = Projector::new(SceneConfig::default(), &frame);

        assert_eq!(0., p.depth(0.));
        assert_eq!(0., p.project(&recs[1]).depth);
    }

    #[test]
    fn test_world_mode_ignores_frame_bounds() {
        let recs = [at(1, 25., 50., 0.), at(2, 30., 60., 10.)];
        let frame: Vec<_> = recs.iter().collect();
        let cfg = SceneConfig {
            mode: ScaleMode::World,
            ..SceneConfig::default()
        };
        let p = Projector::new(cfg, &frame);

        let pt = p.project(&recs[0]);
        assert_abs_diff_eq!(50. + 0.25 * 800., pt.x, epsilon = 1e-9);
        assert_abs_diff_eq!(50. + 0.5 * 450., pt.y, epsilon = 1e-9);

        // same point, different frame, same place
        let other = [at(3, 0., 0., 0.), at(4, 25., 50., 0.)];
        let frame2: Vec<_> = other.iter().collect();
        let p2 = Projector::new(cfg, &frame2);
        assert_abs_diff_eq!(pt.x, p2.project(&other[1]).x, epsilon = 1e-9);
    }

    #[test]
    fn test_unproject() {
        let recs = [at(1, -3., 4., 2.), at(2, 12., 40., 8.), at(3, 5.5, 17.25, 6.)];
        let frame: Vec<_> = recs.iter().collect();
        let p = Projector::new(SceneConfig::default(), &frame);

        let pt = p.project(&recs[2]);
        let (x, y) = p.unproject(pt.x, pt.y, 6.);
        assert_abs_diff_eq!(5.5, x, epsilon = 1e-9);
        assert_abs_diff_eq!(17.25, y, epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_arrow() {
        let mut r = at(1, 0., 0., 0.);
        r.velocity = Vector3 {
            x: 1.5,
            y: 2.,
            z: 9.,
        };
        let p = Projector::new(SceneConfig::default(), &[&r]);
        let pt = p.project(&r);

        assert_eq!(Arrow { dx: 30., dy: -40. }, pt.velocity);
    }

    #[test]
    fn test_arrow_head() {
        let a = Arrow { dx: 10., dy: 0. };
        let [l, r] = a.head(0., 0.);

        let c = ARROW_HEAD * (PI / 6.).cos();
        let s = ARROW_HEAD * (PI / 6.).sin();
        assert_abs_diff_eq!(10. - c, l.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s, l.1, epsilon = 1e-9);
        assert_abs_diff_eq!(10. - c, r.0, epsilon = 1e-9);
        assert_abs_diff_eq!(-s, r.1, epsilon = 1e-9);
    }

    #[rstest]
    #[case(0., 5.)]
    #[case(-10., 5.)]
    #[case(50., 12.5)]
    #[case(100., 20.)]
    fn test_battery_radius(#[case] battery: f64, #[case] radius: f64) {
        assert_abs_diff_eq!(radius, battery_radius(battery), epsilon = 1e-9);
    }

    #[rstest]
    #[case(0., 20.)]
    #[case(50., 40.)]
    #[case(100., 60.)]
    fn test_range_radius(#[case] range: f64, #[case] radius: f64) {
        assert_abs_diff_eq!(radius, range_radius(range), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_frame() {
        let p = Projector::new(SceneConfig::default(), &[]);
        assert_eq!(Bounds::default(), p.bounds());
        assert!(p.project_all(&[]).is_empty());
    }

    #[test]
    fn test_scale_mode_from_str() {
        assert_eq!(ScaleMode::World, "world".parse::<ScaleMode>().unwrap());
        assert_eq!(ScaleMode::Frame, "FRAME".parse::<ScaleMode>().unwrap());
        assert_eq!("frame", ScaleMode::Frame.to_string());
    }
}
