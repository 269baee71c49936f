//! Filtering and sorting of the catalog into the visible view.
//!
//! Everything here is pure: the view is a function of the catalog and a
//! [`FilterState`], and state transitions consume one state to produce the next.
//!
//! - [`state`] - `FilterState`, `SortOrder` and `toggle_tag`
//! - [`view`] - `compute_view` and the filter predicates
//! - [`collate`] - locale-independent title ordering for the A-Z sort

pub mod collate;
mod state;
mod view;

pub use state::{toggle_tag, FilterState, ParseSortError, SortOrder};
pub use view::{compute_view, matches_query, matches_tags, sort_items, view_indices};
