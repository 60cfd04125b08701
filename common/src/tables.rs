use crate::{RowId, Side};

/// One kill as exported by the demo parser.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KillEvent {
    pub match_id: String,
    #[serde(default)]
    pub series: String,
    /// Zero based round number.
    pub round_num: u32,
    pub tick: i64,
    pub attacker_name: String,
    pub attacker_team: String,
    pub attacker_side: Side,
    pub victim_name: String,
    pub victim_team: String,
    pub weapon: String,
    pub attacker_x: f64,
    pub attacker_y: f64,
    pub attacker_z: f64,
    pub victim_x: f64,
    pub victim_y: f64,
    pub victim_z: f64,
    #[serde(deserialize_with = "flag")]
    pub is_teamkill: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_trade: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_first_kill: bool,
    #[serde(default)]
    pub attacker_area_name: Option<String>,
    #[serde(default)]
    pub victim_area_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DamageEvent {
    pub match_id: String,
    pub tick: i64,
    pub attacker_name: String,
    pub victim_name: String,
    pub hp_damage_taken: i64,
    pub armor_damage_taken: i64,
}

impl DamageEvent {
    pub fn total(&self) -> i64 {
        self.hp_damage_taken + self.armor_damage_taken
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundRecord {
    pub match_id: String,
    pub round_num: u32,
    pub start_tick: i64,
    pub t_buy_type: String,
    pub ct_buy_type: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub map_name: Option<String>,
    #[serde(default)]
    pub winning_team: Option<String>,
    #[serde(default)]
    pub winning_side: Option<Side>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Per tick snapshot of a single player.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FramePlayer {
    pub match_id: String,
    pub round_num: u32,
    pub tick: i64,
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    pub hp: i64,
    #[serde(default)]
    pub equipment_value_freezetime_end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BombEvent {
    pub match_id: String,
    pub round_num: u32,
    pub tick: i64,
    pub bomb_action: String,
    pub bomb_site: String,
}

/// A kill row together with its stable identifier.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Kill {
    pub id: RowId,
    #[serde(flatten)]
    pub event: KillEvent,
}

/// The kill rows of the current match pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KillTable {
    rows: Vec<Kill>,
}

impl KillTable {
    /// Builds the table, numbering rows in input order.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = KillEvent>,
    {
        let rows = events
            .into_iter()
            .enumerate()
            .map(|(i, event)| Kill {
                id: RowId(i as u64),
                event,
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[Kill] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kill> {
        self.rows.iter()
    }
}

/// A kill augmented with the damage and round-time features.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DerivedKill {
    pub id: RowId,
    #[serde(flatten)]
    pub event: KillEvent,
    pub damage_done_before_death: i64,
    pub damage_taken: i64,
    pub net_dmg: i64,
    /// Seconds since the start of the round, rounded to one decimal.
    pub true_round_time: f64,
}

/// A row of the victim or attacker view.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilteredKill {
    #[serde(flatten)]
    pub kill: DerivedKill,
    pub victim_side: Side,
    pub t_round_type: Option<String>,
    pub ct_round_type: Option<String>,
}

impl FilteredKill {
    pub fn id(&self) -> RowId {
        self.kill.id
    }

    pub fn event(&self) -> &KillEvent {
        &self.kill.event
    }
}

// Exports disagree on how booleans are spelled ("True", "true", "1").
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> serde::de::Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a boolean flag")
        }

        fn visit_bool<E>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E>(self, v: f64) -> Result<bool, E> {
            Ok(v != 0.0)
        }

        fn visit_str<E>(self, v: &str) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            match v.trim() {
                "True" | "true" | "TRUE" | "1" | "1.0" => Ok(true),
                "False" | "false" | "FALSE" | "0" | "0.0" | "" => Ok(false),
                other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_table_numbers_rows_in_order() {
        let event: KillEvent = serde_json::from_str(
            r#"{
                "match_id": "m", "round_num": 0, "tick": 10,
                "attacker_name": "a", "attacker_team": "A", "attacker_side": "T",
                "victim_name": "v", "victim_team": "B", "weapon": "ak47",
                "attacker_x": 0.0, "attacker_y": 0.0, "attacker_z": 0.0,
                "victim_x": 1.0, "victim_y": 1.0, "victim_z": 1.0,
                "is_teamkill": "False"
            }"#,
        )
        .unwrap();

        let table = KillTable::from_events(vec![event.clone(), event]);
        let ids: Vec<_> = table.iter().map(|k| k.id).collect();

        assert_eq!(vec![RowId(0), RowId(1)], ids);
        assert!(!table.rows()[0].event.is_teamkill);
        assert!(!table.rows()[0].event.is_trade);
    }
}
