use std::collections::BTreeMap;

use crate::Side;

/// Which sides of a player stay visible.
///
/// Encoded as the list of allowed sides, e.g. `["T", "CT"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Side>", into = "Vec<Side>")]
pub struct SideToggle {
    pub t: bool,
    pub ct: bool,
}

impl SideToggle {
    pub const BOTH: Self = Self { t: true, ct: true };
    pub const NONE: Self = Self { t: false, ct: false };
    pub const T_ONLY: Self = Self { t: true, ct: false };
    pub const CT_ONLY: Self = Self { t: false, ct: true };

    pub fn allows(&self, side: Side) -> bool {
        match side {
            Side::T => self.t,
            Side::CT => self.ct,
        }
    }
}

impl Default for SideToggle {
    fn default() -> Self {
        Self::BOTH
    }
}

impl From<Vec<Side>> for SideToggle {
    fn from(value: Vec<Side>) -> Self {
        Self {
            t: value.contains(&Side::T),
            ct: value.contains(&Side::CT),
        }
    }
}

impl From<SideToggle> for Vec<Side> {
    fn from(value: SideToggle) -> Self {
        let mut sides = Vec::with_capacity(2);
        if value.t {
            sides.push(Side::T);
        }
        if value.ct {
            sides.push(Side::CT);
        }
        sides
    }
}

/// The complete state of the kill/death filters.
///
/// Every field is optional in its encoding. Apart from `rounds`, a missing
/// field disables the corresponding stage.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Exclusive bounds on the seconds into the round.
    pub time: Option<(f64, f64)>,
    /// Exclusive bounds on the net damage around the death.
    pub net_dmg: Option<(f64, f64)>,
    /// Compare the upper net damage bound against the round time instead of
    /// the net damage, as older dashboards did.
    pub net_dmg_upper_bound_on_round_time: bool,
    /// Round selector text, e.g. `"1-5, 6 23"`. Empty selects rounds 1 to 31.
    pub rounds: String,
    /// Buy tags such as `"T full"` or `"CT eco"`.
    pub buy_types: Option<Vec<String>>,
    pub sides: BTreeMap<String, SideToggle>,
    pub player_weapons: BTreeMap<String, Vec<String>>,
    pub team_weapons: BTreeMap<String, Vec<String>>,
    pub all_weapons: Option<Vec<String>>,
}

impl FilterConfig {
    /// The state of a freshly opened dashboard: sliders at their full range.
    pub fn dashboard_defaults() -> Self {
        Self {
            time: Some((0.0, 155.0)),
            net_dmg: Some((-200.0, 200.0)),
            ..Self::default()
        }
    }

    /// Sets every listed player to the same side toggle.
    pub fn set_sides<'p, I>(&mut self, players: I, toggle: SideToggle)
    where
        I: IntoIterator<Item = &'p str>,
    {
        for player in players {
            self.sides.insert(player.to_owned(), toggle);
        }
    }
}
