use common::FilteredKill;

use crate::calibration::{CalibrationError, CalibrationFrame, Scale};
use crate::filter::FilteredViews;

/// Which radar image a layer is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// The only level of a single level map.
    Single,
    Upper,
    Lower,
}

/// Projected views for one radar image.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MapLayer {
    pub level: Level,
    pub views: FilteredViews,
}

fn project_row(row: &mut FilteredKill, scale: &Scale) {
    let event = &mut row.kill.event;
    event.victim_x = scale.project_x(event.victim_x);
    event.victim_y = scale.project_y(event.victim_y);
    event.attacker_x = scale.project_x(event.attacker_x);
    event.attacker_y = scale.project_y(event.attacker_y);
}

/// Moves victim and attacker positions of both views into image coordinates.
pub fn project(views: &mut FilteredViews, scale: &Scale) {
    for row in views.victims.iter_mut().chain(views.attackers.iter_mut()) {
        project_row(row, scale);
    }
}

/// Splits views of a two level map at `z_division`.
///
/// Deaths are split on the victim height and kills on the attacker height;
/// rows at exactly `z_division` belong to the lower level.
pub fn split_levels(views: FilteredViews, z_division: f64) -> (FilteredViews, FilteredViews) {
    let (upper_victims, lower_victims): (Vec<_>, Vec<_>) = views
        .victims
        .into_iter()
        .partition(|row| row.event().victim_z > z_division);
    let (upper_attackers, lower_attackers): (Vec<_>, Vec<_>) = views
        .attackers
        .into_iter()
        .partition(|row| row.event().attacker_z > z_division);

    (
        FilteredViews {
            victims: upper_victims,
            attackers: upper_attackers,
        },
        FilteredViews {
            victims: lower_victims,
            attackers: lower_attackers,
        },
    )
}

/// Splits by level if the map has two, then projects every layer.
#[tracing::instrument(skip_all, fields(victims = views.victims.len(), attackers = views.attackers.len()))]
pub fn project_map(
    views: FilteredViews,
    frame: &CalibrationFrame,
) -> Result<Vec<MapLayer>, CalibrationError> {
    let scale = frame.scale()?;

    Ok(project_layers(views, &scale, frame.z_division))
}

/// [`project_map`] with an already fitted scale.
pub fn project_layers(views: FilteredViews, scale: &Scale, z_division: Option<f64>) -> Vec<MapLayer> {
    tracing::debug!(?scale, ?z_division, "Projecting onto radar");

    let mut layers = match z_division {
        Some(z_division) => {
            let (upper, lower) = split_levels(views, z_division);
            vec![
                MapLayer {
                    level: Level::Upper,
                    views: upper,
                },
                MapLayer {
                    level: Level::Lower,
                    views: lower,
                },
            ]
        }
        None => vec![MapLayer {
            level: Level::Single,
            views,
        }],
    };

    for layer in layers.iter_mut() {
        project(&mut layer.views, scale);
    }

    layers
}
