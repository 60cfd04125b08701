//! Optional kill features that need player frames and bomb events.

use std::collections::HashMap;

use common::{BombEvent, FramePlayer, Kill, RowId};

/// Victims above this HP count as high health kills.
pub const HIGH_HEALTH: i64 = 75;

/// Equal consecutive HP readings needed before a value is trusted.
pub const HP_PLATEAU: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ScoutingFeatures {
    pub victim_equipment_value: Option<i64>,
    pub victim_hp: Option<i64>,
    pub high_health_kill: bool,
    /// The kill happened after the plant and away from the planted site.
    pub kill_does_not_matter: bool,
}

/// Frames of one player in one match, sorted by tick.
type PlayerFrames<'f> = HashMap<(&'f str, &'f str), Vec<&'f FramePlayer>>;

struct Plant<'b> {
    tick: i64,
    site: &'b str,
}

/// First non-zero value seen in `threshold` equal adjacent pairs in a row,
/// that is `threshold + 1` equal readings.
///
/// `hp` is scanned from the front, so pass the most recent reading first.
pub fn find_plateau(hp: &[i64], threshold: usize) -> Option<i64> {
    let mut run = 0;
    for pair in hp.windows(2) {
        if pair[0] == pair[1] && pair[0] != 0 {
            run += 1;
            if run >= threshold {
                return Some(pair[1]);
            }
        } else {
            run = 0;
        }
    }

    None
}

#[tracing::instrument(skip_all, fields(kills = kills.len(), frames = frames.len(), bombs = bombs.len()))]
pub fn scouting_features(
    kills: &[Kill],
    frames: &[FramePlayer],
    bombs: &[BombEvent],
) -> HashMap<RowId, ScoutingFeatures> {
    let mut player_frames: PlayerFrames = HashMap::new();
    let mut round_end: HashMap<(&str, u32), i64> = HashMap::new();
    for frame in frames {
        player_frames
            .entry((frame.match_id.as_str(), frame.name.as_str()))
            .or_default()
            .push(frame);

        let last = round_end
            .entry((frame.match_id.as_str(), frame.round_num))
            .or_insert(frame.tick);
        *last = (*last).max(frame.tick);
    }
    for frames in player_frames.values_mut() {
        frames.sort_by_key(|f| f.tick);
    }

    let plants: HashMap<(&str, u32), Plant> = bombs
        .iter()
        .filter(|b| b.bomb_action == "plant")
        .map(|b| {
            (
                (b.match_id.as_str(), b.round_num),
                Plant {
                    tick: b.tick,
                    site: b.bomb_site.as_str(),
                },
            )
        })
        .collect();

    kills
        .iter()
        .map(|kill| {
            let event = &kill.event;
            let victim_frames = player_frames
                .get(&(event.match_id.as_str(), event.victim_name.as_str()))
                .map(|f| f.as_slice())
                .unwrap_or(&[]);

            let at_or_before = victim_frames.partition_point(|f| f.tick <= event.tick);
            let victim_equipment_value = at_or_before
                .checked_sub(1)
                .and_then(|i| victim_frames[i].equipment_value_freezetime_end);

            let before = victim_frames.partition_point(|f| f.tick < event.tick);
            let recent_hp: Vec<i64> = victim_frames[..before].iter().rev().map(|f| f.hp).collect();
            let victim_hp = find_plateau(&recent_hp, HP_PLATEAU);

            let kill_does_not_matter = plants
                .get(&(event.match_id.as_str(), event.round_num))
                .map(|plant| {
                    let bombsite = format!("Bombsite{}", plant.site);
                    let last_frame = round_end
                        .get(&(event.match_id.as_str(), event.round_num))
                        .copied()
                        .unwrap_or(i64::MIN);

                    plant.tick <= event.tick
                        && event.tick <= last_frame
                        && event.attacker_area_name.as_deref() != Some(bombsite.as_str())
                        && event.victim_area_name.as_deref() != Some(bombsite.as_str())
                })
                .unwrap_or(false);

            (
                kill.id,
                ScoutingFeatures {
                    victim_equipment_value,
                    victim_hp,
                    high_health_kill: victim_hp.map(|hp| hp > HIGH_HEALTH).unwrap_or(false),
                    kill_does_not_matter,
                },
            )
        })
        .collect()
}
