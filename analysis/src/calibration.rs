//! Fitting world coordinates onto a radar image.
//!
//! A map is calibrated by picking points whose world coordinates and image
//! coordinates are both known. The fit produces one uniform scale factor and a
//! shift per axis so that `image = (world - shift) * scale`.

/// Result of a calibration fit.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scale {
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
}

impl Scale {
    pub fn project_x(&self, x: f64) -> f64 {
        (x - self.x_shift) * self.scale
    }

    pub fn project_y(&self, y: f64) -> f64 {
        (y - self.y_shift) * self.scale
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    #[error("calibration points {first} and {second} share the world x coordinate {value}")]
    SharedWorldX { first: usize, second: usize, value: f64 },
    #[error("calibration needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("calibration point lists differ in length")]
    LengthMismatch,
    #[error("calibration produced a degenerate scale of {0}")]
    DegenerateScale(f64),
}

/// Three calibration point pairs of one map, plus the height splitting the
/// upper and lower level on maps that have two.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CalibrationFrame {
    pub game_x: [f64; 3],
    pub game_y: [f64; 3],
    pub map_x: [f64; 3],
    pub map_y: [f64; 3],
    pub z_division: Option<f64>,
}

impl CalibrationFrame {
    pub fn scale(&self) -> Result<Scale, CalibrationError> {
        find_scale(&self.game_x, &self.game_y, &self.map_x, &self.map_y)
    }
}

/// Averages a scale candidate over every pair of points, then averages the
/// per point shifts under that scale.
///
/// The stored calibration points are tuned to this averaging, so a least
/// squares fit would shift every map.
pub fn find_scale(
    game_x: &[f64],
    game_y: &[f64],
    map_x: &[f64],
    map_y: &[f64],
) -> Result<Scale, CalibrationError> {
    let n = game_x.len();
    if game_y.len() != n || map_x.len() != n || map_y.len() != n {
        return Err(CalibrationError::LengthMismatch);
    }
    if n < 2 {
        return Err(CalibrationError::TooFewPoints(n));
    }

    let mut candidates = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = game_x[i] - game_x[j];
            if dx == 0.0 {
                return Err(CalibrationError::SharedWorldX {
                    first: i,
                    second: j,
                    value: game_x[i],
                });
            }

            candidates.push((map_x[i] - map_x[j]) / dx);
        }
    }

    let s = mean(&candidates);
    if s == 0.0 || !s.is_finite() {
        return Err(CalibrationError::DegenerateScale(s));
    }

    let x_shifts: Vec<f64> = (0..n).map(|i| (game_x[i] * s - map_x[i]) / s).collect();
    let y_shifts: Vec<f64> = (0..n).map(|i| (game_y[i] * s - map_y[i]) / s).collect();

    Ok(Scale {
        x_shift: mean(&x_shifts),
        y_shift: mean(&y_shifts),
        scale: s,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
