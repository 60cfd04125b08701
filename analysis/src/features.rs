//! Damage and timing features of kills.

use std::collections::HashMap;

use common::{DamageEvent, DerivedKill, Kill, RoundRecord};

use crate::rounds::RoundIndex;

/// Server tick rate of the recorded matches.
pub const TICK_RATE: f64 = 128.0;

/// How far around a death damage is attributed to it, about 3 seconds.
pub const DAMAGE_WINDOW_TICKS: i64 = 384;

/// Damage of one player in one match, in tick order with running totals.
#[derive(Debug, Default)]
struct DamageSeries {
    ticks: Vec<i64>,
    totals: Vec<i64>,
}

impl DamageSeries {
    fn from_events(mut events: Vec<(i64, i64)>) -> Self {
        events.sort_unstable_by_key(|(tick, _)| *tick);

        let mut running = 0;
        let (ticks, totals) = events
            .into_iter()
            .map(|(tick, damage)| {
                running += damage;
                (tick, running)
            })
            .unzip();

        Self { ticks, totals }
    }

    /// Sum of damage with `lo <= tick <= hi`.
    fn sum_within(&self, lo: i64, hi: i64) -> i64 {
        let start = self.ticks.partition_point(|t| *t < lo);
        let end = self.ticks.partition_point(|t| *t <= hi);
        if end <= start {
            return 0;
        }

        let before = start.checked_sub(1).map(|i| self.totals[i]).unwrap_or(0);
        self.totals[end - 1] - before
    }
}

/// Damage log indexed by dealing and receiving player.
#[derive(Debug, Default)]
pub struct DamageLog<'d> {
    dealt: HashMap<(&'d str, &'d str), DamageSeries>,
    received: HashMap<(&'d str, &'d str), DamageSeries>,
}

impl<'d> DamageLog<'d> {
    pub fn new(events: &'d [DamageEvent]) -> Self {
        let mut dealt: HashMap<_, Vec<(i64, i64)>> = HashMap::new();
        let mut received: HashMap<_, Vec<(i64, i64)>> = HashMap::new();

        for event in events {
            let entry = (event.tick, event.total());
            dealt
                .entry((event.match_id.as_str(), event.attacker_name.as_str()))
                .or_default()
                .push(entry);
            received
                .entry((event.match_id.as_str(), event.victim_name.as_str()))
                .or_default()
                .push(entry);
        }

        Self {
            dealt: dealt.into_iter().map(|(k, v)| (k, DamageSeries::from_events(v))).collect(),
            received: received
                .into_iter()
                .map(|(k, v)| (k, DamageSeries::from_events(v)))
                .collect(),
        }
    }

    /// Damage `player` dealt within the window around `tick`.
    pub fn dealt_around(&self, match_id: &str, player: &str, tick: i64) -> i64 {
        self.dealt
            .get(&(match_id, player))
            .map(|s| s.sum_within(tick - DAMAGE_WINDOW_TICKS, tick + DAMAGE_WINDOW_TICKS))
            .unwrap_or(0)
    }

    /// Damage `player` received within the window around `tick`.
    pub fn received_around(&self, match_id: &str, player: &str, tick: i64) -> i64 {
        self.received
            .get(&(match_id, player))
            .map(|s| s.sum_within(tick - DAMAGE_WINDOW_TICKS, tick + DAMAGE_WINDOW_TICKS))
            .unwrap_or(0)
    }
}

/// Seconds between `start_tick` and `tick`, rounded to one decimal with ties
/// going to the even digit.
pub fn round_time(tick: i64, start_tick: i64) -> f64 {
    let secs = (tick - start_tick) as f64 / TICK_RATE;
    (secs * 10.0).round_ties_even() / 10.0
}

/// Adds damage and round time features to every kill.
///
/// Kills for which no round of their match started before the kill tick have
/// no round time; they are reported and left out.
#[tracing::instrument(skip_all, fields(kills = kills.len(), damage = damage.len(), rounds = rounds.len()))]
pub fn derive_features(
    kills: &[Kill],
    damage: &[DamageEvent],
    rounds: &[RoundRecord],
) -> Vec<DerivedKill> {
    let log = DamageLog::new(damage);
    let index = RoundIndex::new(rounds);

    let derived: Vec<DerivedKill> = kills
        .iter()
        .filter_map(|kill| {
            let event = &kill.event;

            let start_tick = match index.start_before(&event.match_id, event.tick) {
                Some(s) => s,
                None => {
                    tracing::warn!(
                        row = ?kill.id,
                        match_id = %event.match_id,
                        tick = event.tick,
                        "No round started before kill, dropping it"
                    );
                    return None;
                }
            };

            let dealt = log.dealt_around(&event.match_id, &event.victim_name, event.tick);
            let taken = log.received_around(&event.match_id, &event.victim_name, event.tick);

            tracing::trace!(row = ?kill.id, dealt, taken, "Derived damage");

            Some(DerivedKill {
                id: kill.id,
                event: event.clone(),
                damage_done_before_death: dealt,
                damage_taken: taken,
                net_dmg: dealt - taken,
                true_round_time: round_time(event.tick, start_tick),
            })
        })
        .collect();

    tracing::debug!(derived = derived.len(), "Derived kill features");

    derived
}
