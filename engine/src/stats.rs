//! All about `CommStats`.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use swarmviz_formats::{TelemetryRecord, VideoFeedback};

/// Signal levels reported, strongest first.
pub const SIGNAL_LEVELS: [u8; 5] = [5, 4, 3, 2, 1];

/// Number of drones reporting one signal level.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LevelCount {
    pub level: u8,
    pub count: usize,
    /// Over all records having a signal value
    pub percent: f64,
}

/// `CommStats` summarises the communication status of one frame.
///
/// # Fields
///
/// - `levels`: histogram of signal levels 5 down to 1,
/// - `with_signal`: number of records having a signal value, the denominator for `levels`,
/// - `avg_signal`: mean of all present signal values, `None` if there are none,
/// - `video_on`/`video_off`: video feedback status counts.
///
/// Records with no value for a field are left out of that field's numbers.  Signal values
/// outside `1..=5` count in `with_signal` and `avg_signal` but in none of the levels.
///
/// # Example
///
/// ```rust
/// use swarmviz_engine::CommStats;
/// use swarmviz_formats::{TelemetryRecord, VideoFeedback};
///
/// let mut a = TelemetryRecord::new(1, "T1");
/// a.signal_intensity = Some(5.);
/// a.video_feedback = Some(VideoFeedback::On);
/// let mut b = TelemetryRecord::new(2, "T1");
/// b.signal_intensity = Some(3.);
///
/// let stats = CommStats::from_frame(&[&a, &b]);
/// assert_eq!(Some(4.), stats.avg_signal);
/// assert_eq!(1, stats.video_on);
/// println!("{}", stats);
/// ```
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CommStats {
    pub levels: Vec<LevelCount>,
    pub with_signal: usize,
    pub avg_signal: Option<f64>,
    pub video_on: usize,
    pub video_off: usize,
}

impl CommStats {
    #[tracing::instrument(skip(frame), fields(records = frame.len()))]
    pub fn from_frame(frame: &[&TelemetryRecord]) -> Self {
        let signals: Vec<f64> = frame.iter().filter_map(|r| r.signal_intensity).collect();
        let with_signal = signals.len();

        let levels = SIGNAL_LEVELS
            .iter()
            .map(|&level| {
                let count = signals.iter().filter(|&&s| s == f64::from(level)).count();
                LevelCount {
                    level,
                    count,
                    percent: percent(count, with_signal),
                }
            })
            .collect();

        let avg_signal = if with_signal == 0 {
            None
        } else {
            Some(signals.iter().sum::<f64>() / with_signal as f64)
        };

        let (video_on, video_off) =
            frame
                .iter()
                .fold((0, 0), |(on, off), r| match r.video_feedback {
                    Some(VideoFeedback::On) => (on + 1, off),
                    Some(VideoFeedback::Off) => (on, off + 1),
                    None => (on, off),
                });

        CommStats {
            levels,
            with_signal,
            avg_signal,
            video_on,
            video_off,
        }
    }

    /// Share of `On` and `Off` among records with a video status.
    ///
    pub fn video_percent(&self) -> (f64, f64) {
        let total = self.video_on + self.video_off;
        (percent(self.video_on, total), percent(self.video_off, total))
    }
}

impl Display for CommStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let levels: Vec<_> = self
            .levels
            .iter()
            .map(|l| format!("L{}={}", l.level, l.count))
            .collect();
        let avg = match self.avg_signal {
            Some(avg) => format!("{avg:.2}/5"),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "signal={} [{}] avg={} video on={} off={}",
            self.with_signal,
            levels.join(" "),
            avg,
            self.video_on,
            self.video_off
        )
    }
}

#[inline]
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.
    } else {
        count as f64 / total as f64 * 100.
    }
}
