#![allow(dead_code)]

use common::{DamageEvent, DerivedKill, KillEvent, KillTable, RoundRecord, RowId, Side};

pub const MATCH: &str = "match-1";

/// Kill in [`MATCH`] with both players at the origin.
pub fn kill(round_num: u32, tick: i64, attacker: &str, victim: &str) -> KillEvent {
    KillEvent {
        match_id: MATCH.to_owned(),
        series: "series-1".to_owned(),
        round_num,
        tick,
        attacker_name: attacker.to_owned(),
        attacker_team: "Team A".to_owned(),
        attacker_side: Side::T,
        victim_name: victim.to_owned(),
        victim_team: "Team B".to_owned(),
        weapon: "ak47".to_owned(),
        attacker_x: 0.0,
        attacker_y: 0.0,
        attacker_z: 0.0,
        victim_x: 0.0,
        victim_y: 0.0,
        victim_z: 0.0,
        is_teamkill: false,
        is_trade: false,
        is_first_kill: false,
        attacker_area_name: None,
        victim_area_name: None,
    }
}

pub fn round(round_num: u32, start_tick: i64, t_buy: &str, ct_buy: &str) -> RoundRecord {
    RoundRecord {
        match_id: MATCH.to_owned(),
        round_num,
        start_tick,
        t_buy_type: t_buy.to_owned(),
        ct_buy_type: ct_buy.to_owned(),
        series: Some("series-1".to_owned()),
        map_name: Some("de_inferno".to_owned()),
        winning_team: None,
        winning_side: None,
        created_at: None,
    }
}

pub fn damage(tick: i64, attacker: &str, victim: &str, hp: i64, armor: i64) -> DamageEvent {
    DamageEvent {
        match_id: MATCH.to_owned(),
        tick,
        attacker_name: attacker.to_owned(),
        victim_name: victim.to_owned(),
        hp_damage_taken: hp,
        armor_damage_taken: armor,
    }
}

pub fn table(kills: Vec<KillEvent>) -> KillTable {
    KillTable::from_events(kills)
}

/// Derived kill with hand picked features, numbered in order.
pub fn derived(events: Vec<(KillEvent, i64, f64)>) -> Vec<DerivedKill> {
    events
        .into_iter()
        .enumerate()
        .map(|(i, (event, net_dmg, true_round_time))| DerivedKill {
            id: RowId(i as u64),
            event,
            damage_done_before_death: net_dmg.max(0),
            damage_taken: (-net_dmg).max(0),
            net_dmg,
            true_round_time,
        })
        .collect()
}
