//! Looking up the round a tick belongs to and the economy of that round.

use std::collections::HashMap;

use common::RoundRecord;

/// Buy category of one team in a round, as labelled in the round table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BuyType {
    #[serde(rename = "Full Buy")]
    FullBuy,
    #[serde(rename = "Half Buy")]
    HalfBuy,
    #[serde(rename = "Full Eco")]
    FullEco,
    #[serde(rename = "Eco")]
    Eco,
}

impl BuyType {
    /// Normalizes a filter tag like `"CT half"`. Unknown tags are `Eco`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "T full" | "CT full" => Self::FullBuy,
            "T half" | "CT half" => Self::HalfBuy,
            "T full eco" | "CT full eco" => Self::FullEco,
            _ => Self::Eco,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullBuy => "Full Buy",
            Self::HalfBuy => "Half Buy",
            Self::FullEco => "Full Eco",
            Self::Eco => "Eco",
        }
    }
}

/// Round records of every match, sorted by start tick.
#[derive(Debug, Default)]
pub struct RoundIndex<'r> {
    matches: HashMap<&'r str, Vec<&'r RoundRecord>>,
}

impl<'r> RoundIndex<'r> {
    pub fn new(rounds: &'r [RoundRecord]) -> Self {
        let mut matches: HashMap<&str, Vec<&RoundRecord>> = HashMap::new();
        for round in rounds {
            matches.entry(round.match_id.as_str()).or_default().push(round);
        }

        for (match_id, rounds) in matches.iter_mut() {
            rounds.sort_by_key(|r| r.start_tick);

            if rounds.windows(2).any(|w| w[0].start_tick == w[1].start_tick) {
                tracing::warn!(match_id, "Rounds share a start tick");
            }
        }

        Self { matches }
    }

    /// The round with the latest start tick at or before `tick`.
    pub fn containing(&self, match_id: &str, tick: i64) -> Option<&'r RoundRecord> {
        let rounds = self.matches.get(match_id)?;
        let idx = rounds.partition_point(|r| r.start_tick <= tick);
        idx.checked_sub(1).map(|i| rounds[i])
    }

    /// Start tick of the latest round that started strictly before `tick`.
    pub fn start_before(&self, match_id: &str, tick: i64) -> Option<i64> {
        let rounds = self.matches.get(match_id)?;
        let idx = rounds.partition_point(|r| r.start_tick < tick);
        idx.checked_sub(1).map(|i| rounds[i].start_tick)
    }
}

/// The raw `(T, CT)` buy labels for the round containing the tick.
pub fn classify<'r>(
    index: &RoundIndex<'r>,
    match_id: &str,
    tick: i64,
) -> Option<(&'r str, &'r str)> {
    index
        .containing(match_id, tick)
        .map(|r| (r.t_buy_type.as_str(), r.ct_buy_type.as_str()))
}

/// Buy type filter split by side.
///
/// A kill passes when its T buy type is one of `t` (unless `t` is empty) and
/// its CT buy type is one of `ct` (unless `ct` is empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuyFilter {
    pub t: Vec<BuyType>,
    pub ct: Vec<BuyType>,
}

impl BuyFilter {
    pub fn from_tags<S>(tags: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let (ct, t): (Vec<&str>, Vec<&str>) =
            tags.iter().map(|t| t.as_ref()).partition(|t| t.contains("CT"));

        Self {
            t: t.into_iter().map(BuyType::from_tag).collect(),
            ct: ct.into_iter().map(BuyType::from_tag).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty() && self.ct.is_empty()
    }

    pub fn matches(&self, t_type: Option<&str>, ct_type: Option<&str>) -> bool {
        fn side_matches(allowed: &[BuyType], actual: Option<&str>) -> bool {
            allowed.is_empty()
                || actual
                    .map(|actual| allowed.iter().any(|b| b.label() == actual))
                    .unwrap_or(false)
        }

        side_matches(&self.t, t_type) && side_matches(&self.ct, ct_type)
    }
}
