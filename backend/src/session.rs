//! A scouting session: the loaded tables, the current match pool and the
//! pipeline run over that pool.

use std::collections::{BTreeMap, BTreeSet};

use analysis::calibration::Scale;
use analysis::heatmap::{self, HeatMap};
use analysis::matches::{self, MatchQuery, MatchSummary};
use analysis::plots::{self, Plot, PlotRequest};
use analysis::projection::{self, Level};
use analysis::scouting::{self, ScoutingFeatures};
use analysis::FilteredViews;
use common::{FilterConfig, KillTable, RowId};

use crate::loader::Tables;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("the match pool is empty")]
    EmptyPool,
    #[error("no match of the pool was played on {0}")]
    NoMatchOnMap(String),
    #[error(transparent)]
    Map(#[from] analysis::maps::MapError),
    #[error(transparent)]
    Plot(#[from] plots::PlotError),
    #[error(transparent)]
    Heatmap(#[from] heatmap::HeatmapError),
}

/// One radar image worth of output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LayerReport {
    pub level: Level,
    pub views: FilteredViews,
    pub deaths: HeatMap,
    pub kills: HeatMap,
}

/// Everything a rendering layer needs to draw one filter run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Report {
    pub map: String,
    pub matches: Vec<String>,
    pub scale: Scale,
    pub layers: Vec<LayerReport>,
    /// Empty unless frame and bomb tables were loaded.
    pub scouting: BTreeMap<RowId, ScoutingFeatures>,
}

pub struct Session {
    tables: Tables,
    summaries: Vec<MatchSummary>,
    pool: BTreeSet<String>,
    heatmap: heatmap::Config,
}

impl Session {
    pub fn new(tables: Tables) -> Self {
        let summaries = matches::summarize(&tables.rounds, &tables.kills);
        tracing::debug!(matches = summaries.len(), "Summarized matches");

        Self {
            tables,
            summaries,
            pool: BTreeSet::new(),
            heatmap: heatmap::Config::default(),
        }
    }

    pub fn with_heatmap(mut self, config: heatmap::Config) -> Self {
        self.heatmap = config;
        self
    }

    pub fn summaries(&self) -> &[MatchSummary] {
        &self.summaries
    }

    pub fn pool(&self) -> &BTreeSet<String> {
        &self.pool
    }

    /// Adds every match found by the query to the pool.
    pub fn add_matching(&mut self, query: &MatchQuery) -> usize {
        let found = matches::find(&self.summaries, query);
        let before = self.pool.len();
        self.pool.extend(found.into_iter().map(|s| s.match_id.clone()));

        self.pool.len() - before
    }

    /// Adds known match ids to the pool, skipping unknown ones.
    pub fn add<'m, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'m str>,
    {
        let before = self.pool.len();
        for id in ids {
            if self.summaries.iter().any(|s| s.match_id == id) {
                self.pool.insert(id.to_owned());
            } else {
                tracing::warn!(match_id = id, "Unknown match, not added to pool");
            }
        }

        self.pool.len() - before
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.pool.remove(id)
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Adds the whitespace separated match ids of an exported pool.
    pub fn import_pool(&mut self, text: &str) -> usize {
        self.add(text.split_whitespace())
    }

    pub fn export_pool(&self) -> String {
        self.pool.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }

    /// Pool matches recorded on `map`. Matches of other maps are left out;
    /// matches without a recorded map are kept.
    fn on_map(&self, map: &str) -> Result<Vec<&str>, SessionError> {
        if self.pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let mut kept = Vec::with_capacity(self.pool.len());
        for id in self.pool.iter() {
            let recorded = self
                .summaries
                .iter()
                .find(|s| s.match_id == *id)
                .and_then(|s| s.map_name.as_deref());

            match recorded {
                Some(recorded) if !analysis::maps::same_map(recorded, map) => {
                    tracing::warn!(
                        match_id = %id,
                        recorded,
                        map,
                        "Match was played on another map, leaving it out"
                    );
                }
                _ => kept.push(id.as_str()),
            }
        }

        if kept.is_empty() {
            return Err(SessionError::NoMatchOnMap(map.to_owned()));
        }

        Ok(kept)
    }

    /// Kill table and derived features of the given matches.
    fn derive(&self, matches: &[&str]) -> (Tables, KillTable, Vec<common::DerivedKill>) {
        let tables = self.tables.restrict(matches.iter().copied());
        let kills = KillTable::from_events(tables.kills.iter().cloned());
        let derived =
            analysis::features::derive_features(kills.rows(), &tables.damages, &tables.rounds);

        (tables, kills, derived)
    }

    /// Filters the kills of the pool matches played on `map` and projects
    /// them onto its radar.
    #[tracing::instrument(skip(self, config), fields(pool = self.pool.len()))]
    pub fn run(&self, config: &FilterConfig, map: &str) -> Result<Report, SessionError> {
        let (frame, scale) = analysis::maps::fitted(map)?;
        self.heatmap.validate()?;

        let matches = self.on_map(map)?;
        let (tables, kills, derived) = self.derive(&matches);

        let views = analysis::filter_events(&derived, &tables.rounds, config);
        let layers = projection::project_layers(views, &scale, frame.z_division)
            .into_iter()
            .map(|layer| {
                Ok(LayerReport {
                    level: layer.level,
                    deaths: heatmap::deaths(&self.heatmap, &layer.views)?,
                    kills: heatmap::kills(&self.heatmap, &layer.views)?,
                    views: layer.views,
                })
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        let scouting = if tables.frames.is_empty() {
            BTreeMap::new()
        } else {
            scouting::scouting_features(kills.rows(), &tables.frames, &tables.bombs)
                .into_iter()
                .collect()
        };

        Ok(Report {
            map: map.to_owned(),
            matches: matches.into_iter().map(str::to_owned).collect(),
            scale,
            layers,
            scouting,
        })
    }

    /// Builds a feature plot over the unprojected filtered kills of the pool.
    pub fn plot(&self, config: &FilterConfig, request: &PlotRequest) -> Result<Plot, SessionError> {
        if self.pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let matches: Vec<&str> = self.pool.iter().map(String::as_str).collect();
        let (tables, _, derived) = self.derive(&matches);
        let views = analysis::filter_events(&derived, &tables.rounds, config);

        Ok(plots::build(&views, request)?)
    }
}
