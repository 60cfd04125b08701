//! Reading the exported csv tables.

use std::io::Read;

use common::{BombEvent, DamageEvent, FramePlayer, KillEvent, RoundRecord};

use crate::storage::{StorageError, Table, TableStorage};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("parsing row {row} of {table:?}")]
    Parse {
        table: Table,
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Deserializes every row of a csv table with a header line.
pub fn read_rows<T, R>(table: Table, reader: R) -> Result<Vec<T>, LoadError>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    reader
        .deserialize()
        .enumerate()
        .map(|(row, result)| result.map_err(|source| LoadError::Parse { table, row, source }))
        .collect()
}

/// Every table of a match pool.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub kills: Vec<KillEvent>,
    pub rounds: Vec<RoundRecord>,
    pub damages: Vec<DamageEvent>,
    /// Only needed for scouting features.
    pub frames: Vec<FramePlayer>,
    /// Only needed for scouting features.
    pub bombs: Vec<BombEvent>,
}

impl Tables {
    /// Loads the required tables and, if present, the optional ones.
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: &dyn TableStorage) -> Result<Self, LoadError> {
        let tables = Self {
            kills: read_rows(Table::Kills, storage.open(Table::Kills)?)?,
            rounds: read_rows(Table::Rounds, storage.open(Table::Rounds)?)?,
            damages: read_rows(Table::Damages, storage.open(Table::Damages)?)?,
            frames: optional(storage, Table::Frames)?,
            bombs: optional(storage, Table::Bombs)?,
        };

        tracing::info!(
            kills = tables.kills.len(),
            rounds = tables.rounds.len(),
            damages = tables.damages.len(),
            frames = tables.frames.len(),
            bombs = tables.bombs.len(),
            "Loaded tables"
        );

        Ok(tables)
    }

    /// Only the rows of the given matches.
    pub fn restrict<'m, I>(&self, matches: I) -> Self
    where
        I: IntoIterator<Item = &'m str>,
    {
        let matches: std::collections::HashSet<&str> = matches.into_iter().collect();

        Self {
            kills: self.kills.iter().filter(|r| matches.contains(r.match_id.as_str())).cloned().collect(),
            rounds: self.rounds.iter().filter(|r| matches.contains(r.match_id.as_str())).cloned().collect(),
            damages: self.damages.iter().filter(|r| matches.contains(r.match_id.as_str())).cloned().collect(),
            frames: self.frames.iter().filter(|r| matches.contains(r.match_id.as_str())).cloned().collect(),
            bombs: self.bombs.iter().filter(|r| matches.contains(r.match_id.as_str())).cloned().collect(),
        }
    }
}

fn optional<T>(storage: &dyn TableStorage, table: Table) -> Result<Vec<T>, LoadError>
where
    T: serde::de::DeserializeOwned,
{
    if !storage.exists(table) {
        tracing::debug!(?table, "Optional table not present");
        return Ok(Vec::new());
    }

    read_rows(table, storage.open(table)?)
}
