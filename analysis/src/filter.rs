//! The kill/death filter pipeline.
//!
//! Every stage narrows the set of kills shared by both views. Only the final
//! side toggle stage differs between the victim view (where players died) and
//! the attacker view (where players got their kills).

use std::collections::{BTreeMap, BTreeSet};

use common::{DerivedKill, FilterConfig, FilteredKill, RoundRecord, Side, SideToggle};

use crate::rounds::{self, BuyFilter, RoundIndex};
use crate::selector;

/// The two outputs of [`filter_events`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FilteredViews {
    /// Kills keyed by the victim, drawn at the victim position.
    pub victims: Vec<FilteredKill>,
    /// Kills keyed by the attacker, drawn at the attacker position.
    pub attackers: Vec<FilteredKill>,
}

impl FilteredViews {
    pub fn is_empty(&self) -> bool {
        self.victims.is_empty() && self.attackers.is_empty()
    }
}

/// Side of the victim: the attacker's own side for teamkills, otherwise the
/// opposite one.
pub fn victim_side(kill: &DerivedKill) -> Side {
    if kill.event.is_teamkill {
        kill.event.attacker_side
    } else {
        kill.event.attacker_side.opposite()
    }
}

/// Runs the whole filter configuration over the derived kills.
#[tracing::instrument(skip_all, fields(kills = kills.len()))]
pub fn filter_events(
    kills: &[DerivedKill],
    rounds: &[RoundRecord],
    config: &FilterConfig,
) -> FilteredViews {
    let mut active: Vec<&DerivedKill> = kills.iter().collect();

    if let Some((lo, hi)) = config.time {
        active.retain(|k| lo < k.true_round_time && k.true_round_time < hi);
        tracing::debug!(remaining = active.len(), "Applied time filter");
    }

    if let Some((lo, hi)) = config.net_dmg {
        let on_round_time = config.net_dmg_upper_bound_on_round_time;
        active.retain(|k| {
            let upper = if on_round_time {
                k.true_round_time < hi
            } else {
                (k.net_dmg as f64) < hi
            };
            lo < k.net_dmg as f64 && upper
        });
        tracing::debug!(remaining = active.len(), "Applied net damage filter");
    }

    let selected_rounds = selector::parse_rounds(&config.rounds);
    active.retain(|k| selected_rounds.contains(&k.event.round_num));
    tracing::debug!(remaining = active.len(), "Applied round filter");

    if active.is_empty() {
        return FilteredViews::default();
    }

    let index = RoundIndex::new(rounds);
    let mut rows: Vec<FilteredKill> = active
        .into_iter()
        .map(|kill| {
            let buy = rounds::classify(&index, &kill.event.match_id, kill.event.tick);
            if buy.is_none() {
                tracing::warn!(row = ?kill.id, "No round contains kill, buy type unknown");
            }

            FilteredKill {
                kill: kill.clone(),
                victim_side: victim_side(kill),
                t_round_type: buy.map(|(t, _)| t.to_owned()),
                ct_round_type: buy.map(|(_, ct)| ct.to_owned()),
            }
        })
        .collect();

    if let Some(tags) = config.buy_types.as_ref() {
        let buy_filter = BuyFilter::from_tags(tags);
        rows.retain(|row| {
            buy_filter.matches(row.t_round_type.as_deref(), row.ct_round_type.as_deref())
        });
        tracing::debug!(remaining = rows.len(), ?buy_filter, "Applied buy type filter");
    }

    retain_allowed_weapons(&mut rows, &config.player_weapons, |row| &row.event().attacker_name);
    retain_allowed_weapons(&mut rows, &config.team_weapons, |row| &row.event().attacker_team);

    if let Some(weapons) = config.all_weapons.as_ref() {
        let weapons: BTreeSet<&str> = weapons.iter().map(|w| w.as_str()).collect();
        rows.retain(|row| weapons.contains(row.event().weapon.as_str()));
    }
    tracing::debug!(remaining = rows.len(), "Applied weapon filters");

    let mut victims = rows.clone();
    let mut attackers = rows;

    retain_toggled_sides(&mut victims, &config.sides, |row| {
        (&row.event().victim_name, row.victim_side)
    });
    retain_toggled_sides(&mut attackers, &config.sides, |row| {
        (&row.event().attacker_name, row.event().attacker_side)
    });

    tracing::debug!(
        victims = victims.len(),
        attackers = attackers.len(),
        "Filtered kills"
    );

    FilteredViews { victims, attackers }
}

/// Drops rows whose key has an allow-list that does not contain the weapon.
fn retain_allowed_weapons<F>(
    rows: &mut Vec<FilteredKill>,
    allowed: &BTreeMap<String, Vec<String>>,
    key: F,
) where
    F: Fn(&FilteredKill) -> &String,
{
    if allowed.is_empty() {
        return;
    }

    rows.retain(|row| match allowed.get(key(row)) {
        Some(weapons) => weapons.iter().any(|w| *w == row.event().weapon),
        None => true,
    });
}

fn retain_toggled_sides<F>(
    rows: &mut Vec<FilteredKill>,
    sides: &BTreeMap<String, SideToggle>,
    key: F,
) where
    F: Fn(&FilteredKill) -> (&String, Side),
{
    if sides.is_empty() {
        return;
    }

    rows.retain(|row| {
        let (player, side) = key(row);
        sides.get(player).map(|toggle| toggle.allows(side)).unwrap_or(true)
    });
}
