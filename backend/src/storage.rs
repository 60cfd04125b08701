use std::collections::HashMap;
use std::io::Read;

/// The exported tables of a match pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Kills,
    Rounds,
    Damages,
    Frames,
    Bombs,
}

impl Table {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Kills => "kills.csv",
            Self::Rounds => "game_round.csv",
            Self::Damages => "damage.csv",
            Self::Frames => "frame_player.csv",
            Self::Bombs => "bomb_event.csv",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("table {0:?} does not exist")]
    Missing(Table),
    #[error("opening table {table:?}")]
    Io {
        table: Table,
        #[source]
        source: std::io::Error,
    },
}

/// Where the tables of a match pool come from.
pub trait TableStorage {
    fn open(&self, table: Table) -> Result<Box<dyn Read + '_>, StorageError>;

    fn exists(&self, table: Table) -> bool;
}

/// Tables stored as csv files in a single folder.
pub struct FileStorage {
    folder: std::path::PathBuf,
}

impl FileStorage {
    pub fn new<P>(folder: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            folder: folder.into(),
        }
    }

    fn path(&self, table: Table) -> std::path::PathBuf {
        self.folder.join(table.file_name())
    }
}

impl TableStorage for FileStorage {
    fn open(&self, table: Table) -> Result<Box<dyn Read + '_>, StorageError> {
        let path = self.path(table);
        tracing::debug!(?path, "Opening table");

        match std::fs::File::open(&path) {
            Ok(file) => Ok(Box::new(std::io::BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::Missing(table)),
            Err(source) => Err(StorageError::Io { table, source }),
        }
    }

    fn exists(&self, table: Table) -> bool {
        self.path(table).is_file()
    }
}

/// Tables held in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: HashMap<Table, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, table: Table, content: impl Into<String>) -> Self {
        self.tables.insert(table, content.into());
        self
    }
}

impl TableStorage for MemoryStorage {
    fn open(&self, table: Table) -> Result<Box<dyn Read + '_>, StorageError> {
        self.tables
            .get(&table)
            .map(|content| Box::new(content.as_bytes()) as Box<dyn Read + '_>)
            .ok_or(StorageError::Missing(table))
    }

    fn exists(&self, table: Table) -> bool {
        self.tables.contains_key(&table)
    }
}
