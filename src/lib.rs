//! gamedeck: a terminal browser for static game catalogs.
//!
//! The catalog is a JSON array of games fetched once from a URL or read from
//! disk. [`engine`] turns it plus the user's filters into the visible list,
//! [`ui`] draws that list and routes key presses, and [`preferences`] keeps
//! the chosen theme between sessions.

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod keybindings;
pub mod preferences;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
