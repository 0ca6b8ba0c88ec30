//! Grid of drone states: one row per drone, one column per timepoint.
//!

use serde::{Deserialize, Serialize};

use swarmviz_formats::TelemetryRecord;

use crate::layout::{Cell, Margins};
use crate::Dataset;

/// Size of the heatmap surface.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            width: 900.,
            height: 500.,
        }
    }
}

/// Where cells land for a given dataset.
///
#[derive(Clone, Debug)]
pub struct HeatmapLayout<'a> {
    dataset: &'a Dataset,
    margins: Margins,
    cell_width: f64,
    cell_height: f64,
}

impl<'a> HeatmapLayout<'a> {
    /// Room on the right is for the legend.
    pub const MARGINS: Margins = Margins::new(60., 150., 40., 60.);
    /// Gap between labels and the grid
    const LABEL_GAP: f64 = 10.;

    pub fn new(dataset: &'a Dataset, config: HeatmapConfig) -> Self {
        let margins = Self::MARGINS;
        let cols = dataset.timepoints().len();
        let rows = dataset.drone_ids().len();

        // Empty dataset, nothing will ever be drawn
        let (cell_width, cell_height) = if cols == 0 || rows == 0 {
            (0., 0.)
        } else {
            (
                margins.inner_width(config.width) / cols as f64,
                margins.inner_height(config.height) / rows as f64,
            )
        };
        HeatmapLayout {
            dataset,
            margins,
            cell_width,
            cell_height,
        }
    }

    /// `(width, height)` shared by all cells.
    ///
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_width, self.cell_height)
    }

    /// Rectangle of a (row, column) slot, whether it has data or not.
    ///
    pub fn slot(&self, row: usize, col: usize) -> Cell {
        Cell {
            x: self.margins.left + col as f64 * self.cell_width,
            y: self.margins.top + row as f64 * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Cell of a drone at a timepoint, only if there is a record for it.
    ///
    pub fn cell(&self, drone_id: u32, timepoint: &str) -> Option<Cell> {
        self.dataset.get(drone_id, timepoint)?;

        let row = self.dataset.drone_index(drone_id)?;
        let col = self.dataset.timepoint_index(timepoint)?;
        Some(self.slot(row, col))
    }

    /// All populated cells, row by row, with the record giving their colour.
    ///
    pub fn cells(&self) -> Vec<(Cell, &'a TelemetryRecord)> {
        let ds = self.dataset;
        ds.drone_ids()
            .iter()
            .enumerate()
            .flat_map(|(row, &id)| {
                ds.timepoints()
                    .iter()
                    .enumerate()
                    .filter_map(move |(col, tp)| ds.get(id, tp).map(|r| (self.slot(row, col), r)))
            })
            .collect()
    }

    /// Anchor of the label of column `col`, centred above the grid.
    ///
    pub fn column_label(&self, col: usize) -> (f64, f64) {
        (
            self.margins.left + (col as f64 + 0.5) * self.cell_width,
            self.margins.top - Self::LABEL_GAP,
        )
    }

    /// Anchor of the label of row `row`, right-aligned left of the grid.
    ///
    pub fn row_label(&self, row: usize) -> (f64, f64) {
        (
            self.margins.left - Self::LABEL_GAP,
            self.margins.top + (row as f64 + 0.5) * self.cell_height,
        )
    }
}
