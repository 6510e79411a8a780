//! Core game module containing shared components, resources, events, and constants.

mod components;
mod config;
mod constants;
mod deferred;
mod events;
mod grid;
mod prefs;
mod rage;
mod resources;

pub use components::*;
pub use config::*;
pub use constants::*;
pub use deferred::*;
pub use events::*;
pub use grid::*;
pub use prefs::*;
pub use rage::*;
pub use resources::*;
