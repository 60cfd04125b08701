//! Per match summaries and picking matches for the pool.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use common::{KillEvent, RoundRecord, Side};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub series: Option<String>,
    pub map_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub winning_team: String,
    pub losing_team: String,
    /// `"<winner rounds>-<loser rounds>"`
    pub score: String,
    pub winning_t_wins: usize,
    pub winning_ct_wins: usize,
    pub losing_t_wins: usize,
    pub losing_ct_wins: usize,
    pub winning_players: Vec<String>,
    pub losing_players: Vec<String>,
}

impl MatchSummary {
    pub fn has_team(&self, team: &str) -> bool {
        self.winning_team == team || self.losing_team == team
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.winning_players.iter().chain(self.losing_players.iter()).any(|p| p == player)
    }
}

#[derive(Debug, Default)]
struct TeamRecord {
    t_wins: usize,
    ct_wins: usize,
}

impl TeamRecord {
    fn total(&self) -> usize {
        self.t_wins + self.ct_wins
    }
}

/// Summarizes every match found in the round table.
///
/// Teams are ranked by rounds won; the players of a team are everyone seen on
/// it in the kill table. Matches with fewer than two known teams are skipped.
#[tracing::instrument(skip_all, fields(rounds = rounds.len(), kills = kills.len()))]
pub fn summarize(rounds: &[RoundRecord], kills: &[KillEvent]) -> Vec<MatchSummary> {
    let mut match_order: Vec<&str> = Vec::new();
    let mut by_match: HashMap<&str, Vec<&RoundRecord>> = HashMap::new();
    for round in rounds {
        by_match
            .entry(round.match_id.as_str())
            .or_insert_with(|| {
                match_order.push(round.match_id.as_str());
                Vec::new()
            })
            .push(round);
    }

    let mut rosters: HashMap<(&str, &str), BTreeSet<&str>> = HashMap::new();
    for kill in kills {
        rosters
            .entry((kill.match_id.as_str(), kill.attacker_team.as_str()))
            .or_default()
            .insert(kill.attacker_name.as_str());
        rosters
            .entry((kill.match_id.as_str(), kill.victim_team.as_str()))
            .or_default()
            .insert(kill.victim_name.as_str());
    }

    match_order
        .into_iter()
        .filter_map(|match_id| {
            let rounds = &by_match[match_id];

            let mut records: HashMap<&str, TeamRecord> = rosters
                .keys()
                .filter(|(m, _)| *m == match_id)
                .map(|(_, team)| (*team, TeamRecord::default()))
                .collect();
            for round in rounds.iter() {
                if let Some(team) = round.winning_team.as_deref() {
                    let record = records.entry(team).or_default();
                    match round.winning_side {
                        Some(Side::T) => record.t_wins += 1,
                        Some(Side::CT) => record.ct_wins += 1,
                        None => {}
                    }
                }
            }

            let mut ranked: Vec<(&str, TeamRecord)> = records.into_iter().collect();
            ranked.sort_by(|(a_name, a), (b_name, b)| {
                b.total().cmp(&a.total()).then_with(|| a_name.cmp(b_name))
            });

            let mut ranked = ranked.into_iter();
            let (winner, winner_record) = ranked.next()?;
            let (loser, loser_record) = match ranked.next() {
                Some(l) => l,
                None => {
                    tracing::warn!(match_id, "Match has only one known team, skipping");
                    return None;
                }
            };

            let roster = |team: &str| -> Vec<String> {
                rosters
                    .get(&(match_id, team))
                    .map(|players| players.iter().map(|p| (*p).to_owned()).collect())
                    .unwrap_or_default()
            };

            let first = rounds.first()?;
            Some(MatchSummary {
                match_id: match_id.to_owned(),
                series: first.series.clone(),
                map_name: first.map_name.clone(),
                date: first.created_at.as_deref().and_then(parse_date),
                winning_team: winner.to_owned(),
                losing_team: loser.to_owned(),
                score: format!("{}-{}", winner_record.total(), loser_record.total()),
                winning_t_wins: winner_record.t_wins,
                winning_ct_wins: winner_record.ct_wins,
                losing_t_wins: loser_record.t_wins,
                losing_ct_wins: loser_record.ct_wins,
                winning_players: roster(winner),
                losing_players: roster(loser),
            })
        })
        .collect()
}

/// Reads the leading `YYYY-MM-DD` of a timestamp.
pub fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    let date = timestamp.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Criteria for the match finder. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct MatchQuery {
    pub map: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// At most two teams are used; a match must include all of them.
    pub teams: Vec<String>,
    /// A match must include every listed player.
    pub players: Vec<String>,
}

pub fn find<'s>(summaries: &'s [MatchSummary], query: &MatchQuery) -> Vec<&'s MatchSummary> {
    let teams: &[String] = if query.teams.len() > 2 {
        tracing::warn!(
            selected = query.teams.len(),
            "Only two teams can be selected, using the first two"
        );
        &query.teams[..2]
    } else {
        &query.teams
    };

    summaries
        .iter()
        .filter(|s| match (&query.map, &s.map_name) {
            (Some(wanted), Some(map)) => crate::maps::same_map(map, wanted),
            (Some(_), None) => false,
            (None, _) => true,
        })
        .filter(|s| match (query.start_date, s.date) {
            (Some(start), Some(date)) => date >= start,
            _ => true,
        })
        .filter(|s| match (query.end_date, s.date) {
            (Some(end), Some(date)) => date <= end,
            _ => true,
        })
        .filter(|s| teams.iter().all(|t| s.has_team(t)))
        .filter(|s| query.players.iter().all(|p| s.has_player(p)))
        .collect()
}

/// Every team of the summaries, sorted.
pub fn teams(summaries: &[MatchSummary]) -> Vec<String> {
    summaries
        .iter()
        .flat_map(|s| [s.winning_team.as_str(), s.losing_team.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Every player of the summaries, sorted.
pub fn players(summaries: &[MatchSummary]) -> Vec<String> {
    summaries
        .iter()
        .flat_map(|s| s.winning_players.iter().chain(s.losing_players.iter()))
        .map(|p| p.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
