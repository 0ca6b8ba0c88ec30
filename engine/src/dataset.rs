//! The `Dataset` is the immutable snapshot of all records we loaded, with every index we need
//! to look them up.
//!
//! It is built once and never modified, all the views are derived from it.
//!

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{debug, trace};

use swarmviz_formats::TelemetryRecord;

/// Sorted universe of keys plus lookup tables over the owned records.
///
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    /// All records, in input order
    records: Vec<TelemetryRecord>,
    /// Distinct timepoints, sorted as strings
    timepoints: Vec<String>,
    /// Distinct drone ids, ascending
    drone_ids: Vec<u32>,
    /// Distinct swarm ids, ascending (unassigned first)
    swarm_ids: Vec<i64>,
    /// Distinct states, in order of first appearance
    states: Vec<String>,
    /// timepoint -> indices of its records, input order
    by_timepoint: HashMap<String, Vec<usize>>,
    /// drone -> timepoint -> index of the last record seen
    by_drone: HashMap<u32, HashMap<String, usize>>,
}

/// Headline numbers about a dataset.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub timepoints: usize,
    pub drones: usize,
    pub swarms: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} data points across {} timepoints, {} drones in {} swarms",
            self.records, self.timepoints, self.drones, self.swarms
        )
    }
}

impl Dataset {
    /// Build all indices.  An empty list gives an empty but usable dataset.
    ///
    #[tracing::instrument(skip(records), fields(records = records.len()))]
    pub fn new(records: Vec<TelemetryRecord>) -> Self {
        let mut timepoints = BTreeSet::new();
        let mut drone_ids = BTreeSet::new();
        let mut swarm_ids = BTreeSet::new();
        let mut seen = HashSet::new();
        let mut states = vec![];
        let mut by_timepoint: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_drone: HashMap<u32, HashMap<String, usize>> = HashMap::new();

        for (i, r) in records.iter().enumerate() {
            timepoints.insert(r.timepoint.clone());
            drone_ids.insert(r.drone_id);
            swarm_ids.insert(r.swarm_id);
            if seen.insert(r.state.as_str()) {
                states.push(r.state.clone());
            }

            by_timepoint
                .entry(r.timepoint.clone())
                .or_default()
                .push(i);

            // Duplicates: last one wins
            //
            if let Some(prev) = by_drone
                .entry(r.drone_id)
                .or_default()
                .insert(r.timepoint.clone(), i)
            {
                trace!(
                    "duplicate for drone {} at {}: record {} replaces {}",
                    r.drone_id,
                    r.timepoint,
                    i,
                    prev
                );
            }
        }

        let ds = Dataset {
            timepoints: timepoints.into_iter().collect(),
            drone_ids: drone_ids.into_iter().collect(),
            swarm_ids: swarm_ids.into_iter().collect(),
            states,
            by_timepoint,
            by_drone,
            records,
        };
        debug!("{}", ds.summary());
        ds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Full record list, in input order.
    ///
    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn timepoints(&self) -> &[String] {
        &self.timepoints
    }

    pub fn drone_ids(&self) -> &[u32] {
        &self.drone_ids
    }

    pub fn swarm_ids(&self) -> &[i64] {
        &self.swarm_ids
    }

    /// State labels in order of first appearance.
    ///
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Position of `timepoint` in the sorted list.
    ///
    pub fn timepoint_index(&self, timepoint: &str) -> Option<usize> {
        self.timepoints
            .binary_search_by(|tp| tp.as_str().cmp(timepoint))
            .ok()
    }

    /// Position of `drone_id` in the sorted list.
    ///
    pub fn drone_index(&self, drone_id: u32) -> Option<usize> {
        self.drone_ids.binary_search(&drone_id).ok()
    }

    /// All records of one frame, in input order.  Unknown timepoints give an empty list.
    ///
    pub fn records_at(&self, timepoint: &str) -> Vec<&TelemetryRecord> {
        self.by_timepoint
            .get(timepoint)
            .map(|idx| idx.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Record for a given drone at a given timepoint, the last one read if there are several.
    ///
    pub fn get(&self, drone_id: u32, timepoint: &str) -> Option<&TelemetryRecord> {
        self.by_drone
            .get(&drone_id)
            .and_then(|m| m.get(timepoint))
            .map(|&i| &self.records[i])
    }

    pub fn summary(&self) -> Summary {
        Summary {
            records: self.records.len(),
            timepoints: self.timepoints.len(),
            drones: self.drone_ids.len(),
            swarms: self.swarm_ids.len(),
        }
    }
}
