//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background catalog load and its completion event
//! - `render` - Frame layout and state panels (loading, error, empty)
//! - `search` - Search line widget
//! - `tags` - Tag button row widget
//! - `cards` - Game card grid widget
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod cards;
mod events;
mod help;
mod input;
mod loop_runner;
mod render;
mod search;
mod status;
mod tags;

// Re-export the public API
pub use events::spawn_catalog_load;
pub use loop_runner::{run, Action};
