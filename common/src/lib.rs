pub mod config;
pub mod tables;

pub use config::{FilterConfig, SideToggle};
pub use tables::{
    BombEvent, DamageEvent, DerivedKill, FilteredKill, FramePlayer, Kill, KillEvent, KillTable,
    RoundRecord,
};

/// The side a player is playing on during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Side {
    T,
    CT,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::T => Self::CT,
            Self::CT => Self::T,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T => "T",
            Self::CT => "CT",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a kill row.
///
/// Assigned once when a [`KillTable`] is built and carried unchanged through
/// feature derivation, filtering and projection, so a row picked in one view
/// can be found again in any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);
