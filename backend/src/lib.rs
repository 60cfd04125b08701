//! Session driver around the kill/death analysis: loads the exported tables,
//! keeps the match pool and turns filter runs into JSON reports.

pub mod loader;
pub mod session;
pub mod storage;

pub use loader::Tables;
pub use session::{Report, Session};
