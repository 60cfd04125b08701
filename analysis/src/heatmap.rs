use crate::filter::FilteredViews;

/// Upper bound on the cells along one image axis.
pub const MAX_CELLS_PER_AXIS: f64 = 4096.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeatmapError {
    #[error("heatmap cell size must be a positive number, got {0}")]
    CellSize(f64),
    #[error("heatmap image size must be positive, got {width}x{height}")]
    ImageSize { width: f64, height: f64 },
    #[error("cell size {cell_size} splits the image into more than 4096 cells per axis")]
    TooManyCells { cell_size: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Edge length of a cell in image pixels.
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_size: 15.0,
            width: 1024.0,
            height: 1024.0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), HeatmapError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(HeatmapError::CellSize(self.cell_size));
        }
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(HeatmapError::ImageSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.max(self.height) / self.cell_size > MAX_CELLS_PER_AXIS {
            return Err(HeatmapError::TooManyCells {
                cell_size: self.cell_size,
            });
        }

        Ok(())
    }
}

/// Counts of points per image cell, rows indexed by y.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HeatMap {
    max_x: usize,
    max_y: usize,
    max_value: usize,
    rows: Vec<Vec<usize>>,
}

impl HeatMap {
    fn new() -> Self {
        Self {
            max_x: 0,
            max_y: 0,
            max_value: 0,
            rows: Vec::new(),
        }
    }

    fn increment(&mut self, x: usize, y: usize) {
        if self.rows.len() <= y {
            self.rows.resize(y + 1, Vec::new());
        }
        self.max_y = self.max_y.max(y);

        let row = &mut self.rows[y];
        if row.len() <= x {
            row.resize(x + 1, 0);
        }
        self.max_x = self.max_x.max(x);

        let cell = &mut row[x];
        *cell += 1;

        self.max_value = self.max_value.max(*cell);
    }

    /// Bins image coordinates; points outside the image are skipped.
    pub fn from_points<I>(config: &Config, points: I) -> Result<Self, HeatmapError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        config.validate()?;

        let mut heatmap = Self::new();

        for (x, y) in points {
            if !(0.0..config.width).contains(&x) || !(0.0..config.height).contains(&y) {
                tracing::trace!("Point outside of image: {:?}", (x, y));
                continue;
            }

            let x_cell = (x / config.cell_size) as usize;
            let y_cell = (y / config.cell_size) as usize;
            heatmap.increment(x_cell, y_cell);
        }

        Ok(heatmap)
    }

    pub fn get(&self, x: usize, y: usize) -> usize {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }

    pub fn max_value(&self) -> usize {
        self.max_value
    }

    pub fn total(&self) -> usize {
        self.rows.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.max_value == 0
    }

    /// Drops empty leading rows and columns.
    pub fn shrink(&mut self) {
        let min_x = self
            .rows
            .iter()
            .filter_map(|row| row.iter().position(|v| *v != 0))
            .min()
            .unwrap_or(0);
        let min_y = self
            .rows
            .iter()
            .position(|row| row.iter().any(|v| *v != 0))
            .unwrap_or(0);

        tracing::trace!("Truncate to Min-X: {} - Min-Y: {}", min_x, min_y);

        let _ = self.rows.drain(0..min_y);
        for row in self.rows.iter_mut() {
            let drain_to = min_x.min(row.len());
            let _ = row.drain(0..drain_to);
        }

        self.max_y = self.rows.len().saturating_sub(1);
        self.max_x = self
            .rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .saturating_sub(1);
    }
}

/// Density of deaths, at the victim positions of the victim view.
pub fn deaths(config: &Config, views: &FilteredViews) -> Result<HeatMap, HeatmapError> {
    HeatMap::from_points(
        config,
        views
            .victims
            .iter()
            .map(|row| (row.event().victim_x, row.event().victim_y)),
    )
}

/// Density of kills, at the attacker positions of the attacker view.
pub fn kills(config: &Config, views: &FilteredViews) -> Result<HeatMap, HeatmapError> {
    HeatMap::from_points(
        config,
        views
            .attackers
            .iter()
            .map(|row| (row.event().attacker_x, row.event().attacker_y)),
    )
}

impl core::fmt::Display for HeatMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.max_value.checked_ilog10().unwrap_or(0) as usize + 1;

        for row in self.rows.iter() {
            for cell in row.iter().copied() {
                write!(f, "{: ^width$} ", cell, width = size)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
