//! Kill/death scouting analysis.
//!
//! Turns the kill, round and damage tables of a match pool into the victim and
//! attacker views drawn on radar images:
//!
//! 1. [`features::derive_features`] adds damage and round time features
//! 2. [`filter::filter_events`] applies a [`common::FilterConfig`]
//! 3. [`projection::project_map`] moves positions into image coordinates
//!
//! Every function here is pure over its inputs.

pub mod calibration;
pub mod features;
pub mod filter;
pub mod heatmap;
pub mod maps;
pub mod matches;
pub mod plots;
pub mod projection;
pub mod rounds;
pub mod scouting;
pub mod selection;
pub mod selector;

pub use filter::{filter_events, FilteredViews};
