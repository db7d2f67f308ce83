#![allow(clippy::collapsible_if)]
#![allow(clippy::large_enum_variant)]

pub mod config;
pub mod engine;
pub mod events;
pub mod history;
pub mod logging;
pub mod rotation;
pub mod roster;
pub mod score;
pub mod stats;
pub mod sync;
