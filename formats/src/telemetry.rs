//! The `TelemetryRecord` type: one observation of one drone at one timepoint.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Swarm id used by the source for drones not belonging to any swarm.
///
pub const UNASSIGNED_SWARM: i64 = -1;

/// Task identifiers are either numeric or some free-form label.
///
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Label(String),
}

impl Default for TaskId {
    fn default() -> Self {
        TaskId::Label(String::new())
    }
}

impl From<&str> for TaskId {
    /// Numeric if it parses as an integer, otherwise keep the string untouched.
    ///
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(n) => TaskId::Number(n),
            Err(_) => TaskId::Label(value.to_owned()),
        }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Label(s) => write!(f, "{}", s),
        }
    }
}

/// Status of the video feed.  Absence of the value is `None` in the record, which is
/// different from `Off`.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    EnumString,
)]
pub enum VideoFeedback {
    #[strum(serialize = "Yes")]
    On,
    #[strum(serialize = "No")]
    Off,
}

impl VideoFeedback {
    /// Token the source uses for an active feed, compared case-insensitively.
    ///
    pub const AFFIRMATIVE: &'static str = "yes";

    /// Anything not affirmative is `Off`.
    ///
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case(Self::AFFIRMATIVE) {
            VideoFeedback::On
        } else {
            VideoFeedback::Off
        }
    }
}

/// Generic x/y/z triplet, used for both position (ground units) and velocity.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Attitude angles, in degrees.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// One validated line of the telemetry feed.
///
/// `drone_id` and `timepoint` are always present.  Every numeric field has a concrete value
/// (unparseable input becomes `0.`) except `signal_intensity` and `video_feedback` which keep
/// track of absence.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// Identifier for the drone
    pub drone_id: u32,
    /// Opaque label, sorted as a string
    pub timepoint: String,
    /// Swarm membership, `UNASSIGNED_SWARM` if none
    pub swarm_id: i64,
    /// Current task
    pub task_id: TaskId,
    /// Free-form state label ("Hovering", "Attacking", …)
    pub state: String,
    /// Position in ground units
    pub position: Vector3,
    /// Velocity
    pub velocity: Vector3,
    /// Pitch, roll & yaw
    pub attitude: Attitude,
    /// Battery level in percent, not clamped
    pub battery: f64,
    /// Radius of the detection circle
    pub detection_range: f64,
    /// Signal level, nominally 1 to 5
    pub signal_intensity: Option<f64>,
    /// Is the video feed on?
    pub video_feedback: Option<VideoFeedback>,
}

impl TelemetryRecord {
    /// Minimal record, everything else zeroed.  Mostly useful to build test data.
    ///
    pub fn new(drone_id: u32, timepoint: &str) -> Self {
        TelemetryRecord {
            drone_id,
            timepoint: timepoint.to_owned(),
            swarm_id: UNASSIGNED_SWARM,
            task_id: TaskId::default(),
            state: String::from("Unknown"),
            position: Vector3::default(),
            velocity: Vector3::default(),
            attitude: Attitude::default(),
            battery: 0.,
            detection_range: 0.,
            signal_intensity: None,
            video_feedback: None,
        }
    }

    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.swarm_id == UNASSIGNED_SWARM
    }
}
