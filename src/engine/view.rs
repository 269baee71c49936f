use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::{Catalog, Item};

use super::collate::CollationKey;
use super::state::{FilterState, SortOrder};

/// True if `item` passes the text filter for an already-normalized query.
///
/// Empty query matches everything; otherwise the query must appear in the
/// title or the description, ignoring case.
pub fn matches_query(item: &Item, query: &str) -> bool {
    query.is_empty()
        || item.title.to_lowercase().contains(query)
        || item.description.to_lowercase().contains(query)
}

/// True if `item` shares at least one tag with `active`, or `active` is empty.
pub fn matches_tags(item: &Item, active: &BTreeSet<String>) -> bool {
    active.is_empty() || item.tags.iter().any(|t| active.contains(t))
}

/// Positions (into `catalog.items()`) of the items visible under `state`,
/// in display order.
pub fn view_indices(catalog: &Catalog, state: &FilterState) -> Vec<usize> {
    let items = catalog.items();
    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            matches_query(item, state.query()) && matches_tags(item, state.active_tags())
        })
        .map(|(i, _)| i)
        .collect();

    sort_by_order(&mut indices, state.sort(), |&i| &items[i]);
    indices
}

/// The filtered, sorted view of `catalog` under `state`.
///
/// A pure function of its inputs: same catalog and state, same sequence.
pub fn compute_view<'a>(catalog: &'a Catalog, state: &FilterState) -> Vec<&'a Item> {
    view_indices(catalog, state)
        .into_iter()
        .map(|i| &catalog.items()[i])
        .collect()
}

/// Stable-sort a list of items by `sort`.
pub fn sort_items(items: &mut [&Item], sort: SortOrder) {
    sort_by_order(items, sort, |item| *item);
}

/// The one place the three orderings are defined. Every sort is stable, so
/// ties keep their incoming (catalog) order.
fn sort_by_order<'a, T, F>(entries: &mut [T], sort: SortOrder, item: F)
where
    F: Fn(&T) -> &'a Item,
{
    match sort {
        SortOrder::Popular => {
            entries.sort_by(|a, b| descending(item(a).popularity, item(b).popularity))
        }
        SortOrder::New => entries.sort_by(|a, b| descending(item(a).added, item(b).added)),
        SortOrder::Az => entries.sort_by_cached_key(|e| CollationKey::new(&item(e).title)),
    }
}

/// Numeric key with NaN and -0.0 folded to 0, giving a total order.
fn numeric_key(value: f64) -> f64 {
    if value.is_nan() || value == 0.0 {
        0.0
    } else {
        value
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    numeric_key(b).total_cmp(&numeric_key(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::toggle_tag;
    use pretty_assertions::assert_eq;

    fn game(title: &str, tags: &[&str], popularity: f64) -> Item {
        Item {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            popularity,
            ..Item::new(title, format!("/games/{}", title.to_lowercase()))
        }
    }

    fn chess_and_snake() -> Catalog {
        Catalog::new(vec![
            game("Chess", &["strategy"], 5.0),
            game("Snake", &["arcade"], 9.0),
        ])
    }

    fn titles(view: &[&Item]) -> Vec<String> {
        view.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_popular_sort_scenario() {
        let catalog = chess_and_snake();
        let view = compute_view(&catalog, &FilterState::default());
        assert_eq!(titles(&view), vec!["Snake", "Chess"]);
    }

    #[test]
    fn test_query_scenario() {
        let catalog = chess_and_snake();
        let state = FilterState::default().with_query("chess");
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Chess"]);
    }

    #[test]
    fn test_tag_scenario() {
        let catalog = chess_and_snake();
        let state = toggle_tag(FilterState::default(), "arcade");
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Snake"]);
    }

    #[test]
    fn test_az_scenario() {
        let catalog = chess_and_snake();
        let state = FilterState::new(SortOrder::Az);
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Chess", "Snake"]);
    }

    #[test]
    fn test_query_matches_description() {
        let catalog = Catalog::new(vec![
            Item {
                description: "Guide the SNAKE to the apple".into(),
                ..Item::new("Serpent", "/serpent")
            },
            Item::new("Tetris", "/tetris"),
        ]);
        let state = FilterState::default().with_query("snake");
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Serpent"]);
    }

    #[test]
    fn test_query_and_tags_are_conjunctive() {
        let catalog = Catalog::new(vec![
            game("Snake", &["arcade"], 1.0),
            game("Snake Puzzle", &["puzzle"], 2.0),
            game("Pong", &["arcade"], 3.0),
        ]);
        let state = toggle_tag(FilterState::default().with_query("snake"), "arcade");
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Snake"]);
    }

    #[test]
    fn test_multiple_tags_are_disjunctive() {
        let catalog = Catalog::new(vec![
            game("Chess", &["strategy"], 1.0),
            game("Snake", &["arcade"], 2.0),
            game("Sudoku", &["puzzle"], 3.0),
        ]);
        let state = toggle_tag(toggle_tag(FilterState::default(), "arcade"), "strategy");
        assert_eq!(titles(&compute_view(&catalog, &state)), vec!["Snake", "Chess"]);
    }

    #[test]
    fn test_untagged_item_excluded_by_any_tag_filter() {
        let catalog = Catalog::new(vec![game("Loose", &[], 1.0)]);
        let state = toggle_tag(FilterState::default(), "arcade");
        assert!(compute_view(&catalog, &state).is_empty());
    }

    #[test]
    fn test_popular_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            game("B", &[], 1.0),
            game("A", &[], 1.0),
            game("C", &[], 2.0),
            game("D", &[], 1.0),
        ]);
        let view = compute_view(&catalog, &FilterState::default());
        assert_eq!(titles(&view), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn test_new_sort_descending_with_missing_as_zero() {
        let catalog = Catalog::new(vec![
            Item::new("Unknown", "/u"),
            Item {
                added: 200.0,
                ..Item::new("Recent", "/r")
            },
            Item {
                added: 100.0,
                ..Item::new("Older", "/o")
            },
            Item::new("Also unknown", "/a"),
        ]);
        let state = FilterState::new(SortOrder::New);
        assert_eq!(
            titles(&compute_view(&catalog, &state)),
            vec!["Recent", "Older", "Unknown", "Also unknown"]
        );
    }

    #[test]
    fn test_missing_popularity_sorts_as_zero() {
        let catalog = Catalog::new(vec![
            Item::new("Default", "/d"),
            game("Negative", &[], -1.0),
            game("Positive", &[], 1.0),
        ]);
        let view = compute_view(&catalog, &FilterState::default());
        assert_eq!(titles(&view), vec!["Positive", "Default", "Negative"]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let catalog = Catalog::new(vec![game("First", &[], -0.0), game("Second", &[], 0.0)]);
        let view = compute_view(&catalog, &FilterState::default());
        assert_eq!(titles(&view), vec!["First", "Second"]);
    }

    #[test]
    fn test_az_is_case_and_accent_insensitive() {
        let catalog = Catalog::new(vec![
            Item::new("zork", "/z"),
            Item::new("Élite", "/e"),
            Item::new("asteroids", "/a"),
            Item::new("Breakout", "/b"),
        ]);
        let state = FilterState::new(SortOrder::Az);
        assert_eq!(
            titles(&compute_view(&catalog, &state)),
            vec!["asteroids", "Breakout", "Élite", "zork"]
        );
    }

    #[test]
    fn test_empty_catalog_gives_empty_view() {
        let catalog = Catalog::default();
        for sort in SortOrder::ALL {
            assert!(compute_view(&catalog, &FilterState::new(sort)).is_empty());
        }
    }

    #[test]
    fn test_view_indices_point_into_catalog() {
        let catalog = chess_and_snake();
        assert_eq!(view_indices(&catalog, &FilterState::default()), vec![1, 0]);
    }

    #[test]
    fn test_sort_items_is_idempotent() {
        let catalog = chess_and_snake();
        for sort in SortOrder::ALL {
            let view = compute_view(&catalog, &FilterState::new(sort));
            let mut resorted = view.clone();
            sort_items(&mut resorted, sort);
            assert_eq!(titles(&resorted), titles(&view));
        }
    }

    #[test]
    fn test_sort_items_agrees_with_view_order() {
        let catalog = Catalog::new(vec![
            Item {
                added: 3.0,
                ..game("Pong", &[], 2.0)
            },
            Item {
                added: 1.0,
                ..game("chess", &[], 7.0)
            },
            Item {
                added: 2.0,
                ..game("Éclair Dash", &[], 4.0)
            },
        ]);

        for sort in SortOrder::ALL {
            let view = compute_view(&catalog, &FilterState::new(sort));
            let mut from_reversed: Vec<&Item> = catalog.items().iter().rev().collect();
            sort_items(&mut from_reversed, sort);
            assert_eq!(titles(&from_reversed), titles(&view), "{:?}", sort);
        }
    }
}
