//! Module to load the swarm telemetry CSV and generate a list of `TelemetryRecord`.
//!
//! The feed is produced by a simulation tool and is not very strict: rows can be short,
//! some are placeholders and numeric fields may contain anything.  The rules are:
//!
//! - bad rows are skipped, never reported as errors,
//! - a numeric field which does not parse is `0.`, except `SwarmID` which becomes `-1`,
//! - signal intensity and video feedback keep track of absence.
//!
//! Only an input without a header line is an error.
//!

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use eyre::Result;
use tracing::{debug, trace, warn};

use crate::error::Skip;
use crate::{
    Attitude, FormatError, TaskId, TelemetryRecord, Vector3, VideoFeedback, UNASSIGNED_SWARM,
};

/// Rows with fewer columns are dropped.
///
pub const MIN_COLUMNS: usize = 16;

/// Withheld records start with this.
///
const PLACEHOLDER: &str = "\"-1";

/// State label when the column is empty.
///
const UNKNOWN_STATE: &str = "Unknown";

/// Column labels, exactly as emitted by the source (including typos).
///
pub mod label {
    pub const DRONE_ID: &str = "DroneID";
    pub const TIMEPOINT: &str = "TimePoint";
    pub const SWARM_ID: &str = "SwarmID";
    pub const TASK_ID: &str = "TaskID";
    pub const STATE: &str = "State";
    pub const POSITION_X: &str = "PositionX";
    pub const POSITION_Y: &str = "PositionY";
    pub const POSITION_Z: &str = "PositionZ";
    pub const VELOCITY_X: &str = "VelocityX";
    pub const VELOCITY_Y: &str = "VelocityY";
    pub const VELOCITY_Z: &str = "VelocityZ";
    pub const PITCH: &str = "Pitch";
    pub const ROLL: &str = "Roll";
    pub const YAW: &str = "Yaw";
    pub const BATTERY: &str = "Battery Percentage";
    pub const DETECTION_RANGE: &str = "Detection Range(Circle)";
    pub const SIGNAL_INTENSITY: &str = "Singal Intensity(At most 5)";
    pub const VIDEO_FEEDBACK: &str = "Video FeedbackOn";
}

/// Position of every known label in the header, `None` if the label is not there.
///
#[derive(Debug, Default)]
struct Columns {
    drone_id: Option<usize>,
    timepoint: Option<usize>,
    swarm_id: Option<usize>,
    task_id: Option<usize>,
    state: Option<usize>,
    position: [Option<usize>; 3],
    velocity: [Option<usize>; 3],
    attitude: [Option<usize>; 3],
    battery: Option<usize>,
    detection_range: Option<usize>,
    signal_intensity: Option<usize>,
    video_feedback: Option<usize>,
}

impl Columns {
    /// Map labels to indices.  When a label is repeated, the last one wins.
    ///
    fn from_header(header: &StringRecord) -> Self {
        let mut cols = Columns::default();

        for (i, name) in header.iter().enumerate() {
            let slot = match name {
                label::DRONE_ID => &mut cols.drone_id,
                label::TIMEPOINT => &mut cols.timepoint,
                label::SWARM_ID => &mut cols.swarm_id,
                label::TASK_ID => &mut cols.task_id,
                label::STATE => &mut cols.state,
                label::POSITION_X => &mut cols.position[0],
                label::POSITION_Y => &mut cols.position[1],
                label::POSITION_Z => &mut cols.position[2],
                label::VELOCITY_X => &mut cols.velocity[0],
                label::VELOCITY_Y => &mut cols.velocity[1],
                label::VELOCITY_Z => &mut cols.velocity[2],
                label::PITCH => &mut cols.attitude[0],
                label::ROLL => &mut cols.attitude[1],
                label::YAW => &mut cols.attitude[2],
                label::BATTERY => &mut cols.battery,
                label::DETECTION_RANGE => &mut cols.detection_range,
                label::SIGNAL_INTENSITY => &mut cols.signal_intensity,
                label::VIDEO_FEEDBACK => &mut cols.video_feedback,
                _ => {
                    trace!("ignoring column {name:?}");
                    continue;
                }
            };
            *slot = Some(i);
        }
        cols
    }

    /// Decode one data row into a record.
    ///
    fn decode(&self, rec: &StringRecord) -> Result<TelemetryRecord, Skip> {
        if rec.len() < MIN_COLUMNS {
            return Err(Skip::TooShort(rec.len()));
        }

        let drone = non_empty(cell(rec, self.drone_id)).ok_or(Skip::NoDroneId)?;
        let timepoint = non_empty(cell(rec, self.timepoint)).ok_or(Skip::NoTimepoint)?;
        let drone_id = drone
            .parse::<u32>()
            .map_err(|_| Skip::BadDroneId(drone.to_owned()))?;

        let swarm_id = cell(rec, self.swarm_id)
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(UNASSIGNED_SWARM);
        let task_id = cell(rec, self.task_id)
            .map(TaskId::from)
            .unwrap_or_default();
        let state = non_empty(cell(rec, self.state)).unwrap_or(UNKNOWN_STATE);

        let float = |idx: Option<usize>| float_or_zero(cell(rec, idx));
        let [px, py, pz] = self.position;
        let [vx, vy, vz] = self.velocity;
        let [pitch, roll, yaw] = self.attitude;

        Ok(TelemetryRecord {
            drone_id,
            timepoint: timepoint.to_owned(),
            swarm_id,
            task_id,
            state: state.to_owned(),
            position: Vector3 {
                x: float(px),
                y: float(py),
                z: float(pz),
            },
            velocity: Vector3 {
                x: float(vx),
                y: float(vy),
                z: float(vz),
            },
            attitude: Attitude {
                pitch: float(pitch),
                roll: float(roll),
                yaw: float(yaw),
            },
            battery: float(self.battery),
            detection_range: float(self.detection_range),
            signal_intensity: non_empty(cell(rec, self.signal_intensity)).and_then(parse_float),
            video_feedback: non_empty(cell(rec, self.video_feedback)).map(VideoFeedback::from_token),
        })
    }
}

#[inline]
fn cell(rec: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| rec.get(i))
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[inline]
fn parse_float(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[inline]
fn float_or_zero(value: Option<&str>) -> f64 {
    value.and_then(parse_float).unwrap_or(0.)
}

/// Is the row starting at `offset` a withheld record?
///
#[inline]
fn is_placeholder(input: &str, offset: usize) -> bool {
    input
        .get(offset..)
        .map(|line| line.trim_start().starts_with(PLACEHOLDER))
        .unwrap_or(false)
}

/// Parse the whole CSV text, with its header line, into validated records.
///
/// Output order is input order.  Rows which can not be used are skipped silently (they are only
/// logged at `trace` level).
///
/// Example:
/// ```
/// use swarmviz_formats::{parse_telemetry, TaskId};
///
/// let csv = "\
/// DroneID,TimePoint,SwarmID,TaskID,State,PositionX,PositionY,PositionZ,VelocityX,VelocityY,VelocityZ,Pitch,Roll,Yaw,Battery Percentage,Detection Range(Circle)
/// 1,T1,2,alpha,Hovering,10,20,30,1,0,0,0,0,0,80,50
/// ";
/// let recs = parse_telemetry(csv)?;
/// assert_eq!(1, recs.len());
/// assert_eq!(TaskId::Label("alpha".into()), recs[0].task_id);
/// assert_eq!(None, recs[0].signal_intensity);
/// # Ok::<(), eyre::Report>(())
/// ```
///
#[tracing::instrument(skip(input))]
pub fn parse_telemetry(input: &str) -> Result<Vec<TelemetryRecord>> {
    // Leading blank lines are not the header
    //
    let input = input.trim_start();
    if input.is_empty() {
        return Err(FormatError::EmptyInput.into());
    }

    // No quoting: an unbalanced `"` must not swallow the following lines
    //
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let header = rdr
        .headers()
        .map_err(|e| FormatError::BadHeader(e.to_string()))?
        .clone();
    debug!("header={:?}", header);

    let cols = Columns::from_header(&header);
    if cols.drone_id.is_none() || cols.timepoint.is_none() {
        warn!(
            "header has no {} or {} column, no row will be valid",
            label::DRONE_ID,
            label::TIMEPOINT
        );
    }

    let mut data = Vec::new();
    let mut skipped = 0usize;

    for rec in rdr.records() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(e) => {
                trace!("unreadable row: {e}");
                skipped += 1;
                continue;
            }
        };
        let (line, offset) = rec
            .position()
            .map(|p| (p.line(), p.byte() as usize))
            .unwrap_or_default();

        let res = if is_placeholder(input, offset) {
            Err(Skip::Placeholder)
        } else {
            cols.decode(&rec)
        };

        match res {
            Ok(r) => data.push(r),
            Err(why) => {
                trace!("line {line} skipped: {why}");
                skipped += 1;
            }
        }
    }
    debug!("{} records, {} rows skipped", data.len(), skipped);
    Ok(data)
}

/// Read and parse a file.
///
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<TelemetryRecord>> {
    let data = fs::read_to_string(path.as_ref())?;
    parse_telemetry(&data)
}
