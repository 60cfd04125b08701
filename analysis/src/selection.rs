use std::collections::BTreeSet;

use common::{FilteredKill, RowId};

use crate::filter::FilteredViews;

/// Rows to highlight for a clicked kill.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Highlight {
    /// Deaths of the clicked victim in the same match.
    pub victims: Vec<RowId>,
    /// Kills of the clicked attacker in the same match.
    pub attackers: Vec<RowId>,
}

/// Finds every death of the victim and every kill of the attacker of the
/// clicked row, limited to the clicked row's match.
pub fn highlight_player(views: &FilteredViews, clicked: RowId) -> Highlight {
    let row = match views
        .victims
        .iter()
        .chain(views.attackers.iter())
        .find(|row| row.id() == clicked)
    {
        Some(row) => row.event(),
        None => {
            tracing::debug!(?clicked, "Clicked row is not in either view");
            return Highlight::default();
        }
    };

    Highlight {
        victims: views
            .victims
            .iter()
            .filter(|r| r.event().match_id == row.match_id && r.event().victim_name == row.victim_name)
            .map(FilteredKill::id)
            .collect(),
        attackers: views
            .attackers
            .iter()
            .filter(|r| {
                r.event().match_id == row.match_id && r.event().attacker_name == row.attacker_name
            })
            .map(FilteredKill::id)
            .collect(),
    }
}

/// A line from where the attacker stood to where the victim died.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Connection {
    pub id: RowId,
    pub attacker: (f64, f64),
    pub victim: (f64, f64),
}

/// Victim/killer connections of the selected rows of one view.
pub fn connections(rows: &[FilteredKill], selected: &BTreeSet<RowId>) -> Vec<Connection> {
    rows.iter()
        .filter(|row| selected.contains(&row.id()))
        .map(|row| {
            let event = row.event();
            Connection {
                id: row.id(),
                attacker: (event.attacker_x, event.attacker_y),
                victim: (event.victim_x, event.victim_y),
            }
        })
        .collect()
}
