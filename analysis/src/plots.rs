//! Generic feature plots over the filtered kills.

use std::collections::HashSet;

use common::{FilteredKill, RowId};

use crate::filter::FilteredViews;

/// Columns that can go on an axis.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "attacker_x",
    "attacker_y",
    "attacker_z",
    "damage_done_before_death",
    "damage_taken",
    "net_dmg",
    "round_num",
    "tick",
    "true_round_time",
    "victim_x",
    "victim_y",
    "victim_z",
];

/// Columns that can be used to color or group points.
pub const COLOR_COLUMNS: &[&str] = &[
    "attacker_area_name",
    "attacker_name",
    "attacker_side",
    "attacker_team",
    "ct_round_type",
    "is_first_kill",
    "is_teamkill",
    "is_trade",
    "match_id",
    "series",
    "t_round_type",
    "victim_area_name",
    "victim_name",
    "victim_side",
    "victim_team",
    "weapon",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotError {
    #[error("{0:?} is not a numeric column")]
    NotNumeric(String),
    #[error("{0:?} is not a color column")]
    NotCategorical(String),
}

pub fn numeric(row: &FilteredKill, column: &str) -> Option<f64> {
    let kill = &row.kill;
    let event = &kill.event;

    let value = match column {
        "attacker_x" => event.attacker_x,
        "attacker_y" => event.attacker_y,
        "attacker_z" => event.attacker_z,
        "victim_x" => event.victim_x,
        "victim_y" => event.victim_y,
        "victim_z" => event.victim_z,
        "round_num" => event.round_num as f64,
        "tick" => event.tick as f64,
        "damage_done_before_death" => kill.damage_done_before_death as f64,
        "damage_taken" => kill.damage_taken as f64,
        "net_dmg" => kill.net_dmg as f64,
        "true_round_time" => kill.true_round_time,
        _ => return None,
    };

    Some(value)
}

/// Value of a color column; `None` if the column is unknown or the row has no
/// value for it.
pub fn category(row: &FilteredKill, column: &str) -> Option<String> {
    let event = row.event();

    let value = match column {
        "attacker_area_name" => return event.attacker_area_name.clone(),
        "victim_area_name" => return event.victim_area_name.clone(),
        "t_round_type" => return row.t_round_type.clone(),
        "ct_round_type" => return row.ct_round_type.clone(),
        "attacker_name" => event.attacker_name.clone(),
        "attacker_team" => event.attacker_team.clone(),
        "victim_name" => event.victim_name.clone(),
        "victim_team" => event.victim_team.clone(),
        "match_id" => event.match_id.clone(),
        "series" => event.series.clone(),
        "weapon" => event.weapon.clone(),
        "attacker_side" => event.attacker_side.to_string(),
        "victim_side" => row.victim_side.to_string(),
        "is_first_kill" => event.is_first_kill.to_string(),
        "is_teamkill" => event.is_teamkill.to_string(),
        "is_trade" => event.is_trade.to_string(),
        _ => return None,
    };

    Some(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlotKind {
    #[default]
    Scatter,
    Box,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct PlotRequest {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub kind: PlotKind,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScatterSeries {
    pub name: Option<String>,
    pub ids: Vec<RowId>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistogramSeries {
    pub name: Option<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoxGroup {
    pub name: String,
    pub median: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Plot {
    /// Nothing to draw for the current selection.
    Empty,
    Scatter {
        x: String,
        y: String,
        series: Vec<ScatterSeries>,
    },
    Histogram {
        column: String,
        series: Vec<HistogramSeries>,
    },
    Box {
        column: String,
        groups: Vec<BoxGroup>,
    },
}

/// Rows of both views, each kill once, victim view first.
pub fn combined(views: &FilteredViews) -> Vec<&FilteredKill> {
    let mut seen = HashSet::new();
    views
        .victims
        .iter()
        .chain(views.attackers.iter())
        .filter(|row| seen.insert(row.id()))
        .collect()
}

/// Groups rows by their color value, keeping first appearance order. Rows
/// without a value are left out.
fn group_by<'r>(rows: &[&'r FilteredKill], color: &str) -> Vec<(String, Vec<&'r FilteredKill>)> {
    let mut groups: Vec<(String, Vec<&FilteredKill>)> = Vec::new();
    for &row in rows {
        let Some(value) = category(row, color) else {
            continue;
        };

        match groups.iter_mut().find(|(name, _)| *name == value) {
            Some((_, members)) => members.push(row),
            None => groups.push((value, vec![row])),
        }
    }
    groups
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => f64::NAN,
        n if n % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        _ => sorted[mid],
    }
}

fn check_numeric(column: &str) -> Result<(), PlotError> {
    if NUMERIC_COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(PlotError::NotNumeric(column.to_owned()))
    }
}

fn column_values(rows: &[&FilteredKill], column: &str) -> Vec<f64> {
    rows.iter().filter_map(|row| numeric(row, column)).collect()
}

#[tracing::instrument(skip(views))]
pub fn build(views: &FilteredViews, request: &PlotRequest) -> Result<Plot, PlotError> {
    for column in [&request.x, &request.y].into_iter().flatten() {
        check_numeric(column)?;
    }
    if let Some(color) = request.color.as_deref() {
        if !COLOR_COLUMNS.contains(&color) {
            return Err(PlotError::NotCategorical(color.to_owned()));
        }
    }

    let rows = combined(views);
    if rows.is_empty() {
        return Ok(Plot::Empty);
    }

    let single = request.x.as_ref().xor(request.y.as_ref());

    match (request.kind, &request.x, &request.y, single) {
        (PlotKind::Scatter, Some(x), Some(y), _) => {
            let series_for = |name: Option<String>, members: &[&FilteredKill]| ScatterSeries {
                name,
                ids: members.iter().map(|r| r.id()).collect(),
                x: column_values(members, x),
                y: column_values(members, y),
            };

            let series = match request.color.as_deref() {
                Some(color) => group_by(&rows, color)
                    .into_iter()
                    .map(|(name, members)| series_for(Some(name), &members))
                    .collect(),
                None => vec![series_for(None, &rows)],
            };

            Ok(Plot::Scatter {
                x: x.clone(),
                y: y.clone(),
                series,
            })
        }
        (PlotKind::Scatter, _, _, Some(column)) => {
            let series = match request.color.as_deref() {
                Some(color) => group_by(&rows, color)
                    .into_iter()
                    .map(|(name, members)| HistogramSeries {
                        name: Some(name),
                        values: column_values(&members, column),
                    })
                    .collect(),
                None => vec![HistogramSeries {
                    name: None,
                    values: column_values(&rows, column),
                }],
            };

            Ok(Plot::Histogram {
                column: column.clone(),
                series,
            })
        }
        (PlotKind::Box, x, y, _) => {
            let (Some(column), Some(color)) = (x.as_ref().or(y.as_ref()), request.color.as_deref())
            else {
                return Ok(Plot::Empty);
            };

            let mut groups: Vec<BoxGroup> = group_by(&rows, color)
                .into_iter()
                .map(|(name, members)| {
                    let values = column_values(&members, column);
                    BoxGroup {
                        name,
                        median: median(&values),
                        values,
                    }
                })
                .collect();
            groups.sort_by(|a, b| b.median.total_cmp(&a.median));

            Ok(Plot::Box {
                column: column.clone(),
                groups,
            })
        }
        _ => Ok(Plot::Empty),
    }
}
