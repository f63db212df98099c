//! Catalog search
//!
//! Derives the visible subset of the catalog from a free-text query and a genre
//! selector. The result is always recomputed from the store and never cached.

use crate::catalog::{CatalogItem, GenreFilter};

/// Active search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title. Matched as typed, not trimmed.
    pub query: String,
    pub genre: GenreFilter,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, genre: impl Into<GenreFilter>) -> Self {
        Self {
            query: query.into(),
            genre: genre.into(),
        }
    }

    /// Criteria that let every item through
    pub fn all() -> Self {
        Self::default()
    }

    /// Does `item` pass both the title and the genre test?
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.genre.accepts(item.genre) && title_contains(&item.title, &self.query)
    }
}

fn title_contains(title: &str, query: &str) -> bool {
    query.is_empty() || title.to_lowercase().contains(&query.to_lowercase())
}

/// Items matching `criteria`, in store order
pub fn visible_items<'a>(
    items: &'a [CatalogItem],
    criteria: &FilterCriteria,
) -> Vec<&'a CatalogItem> {
    let visible: Vec<&CatalogItem> = items.iter().filter(|item| criteria.matches(item)).collect();

    log::debug!(
        "Filter {:?} / {}: {} of {} items visible",
        criteria.query,
        criteria.genre.display_name(),
        visible.len(),
        items.len()
    );

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogStore, Genre, ItemId, NewItem};
    use crate::ingest::ImageSource;

    fn item(id: u32, title: &str, genre: Genre) -> CatalogItem {
        CatalogItem {
            id: ItemId(id),
            title: title.to_string(),
            genre,
            image: ImageSource::Remote(format!("https://example.com/{}.jpg", id)),
        }
    }

    fn sample() -> Vec<CatalogItem> {
        vec![item(1, "Elden Ring", Genre::Rpg), item(2, "GTA V", Genre::Action)]
    }

    fn titles(visible: &[&CatalogItem]) -> Vec<String> {
        visible.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let items = sample();
        let visible = visible_items(&items, &FilterCriteria::new("ring", GenreFilter::All));
        assert_eq!(titles(&visible), vec!["Elden Ring"]);

        let visible = visible_items(&items, &FilterCriteria::new("ELDEN", GenreFilter::All));
        assert_eq!(titles(&visible), vec!["Elden Ring"]);
    }

    #[test]
    fn test_genre_filter() {
        let items = sample();
        let visible = visible_items(&items, &FilterCriteria::new("", Genre::Action));
        assert_eq!(titles(&visible), vec!["GTA V"]);
    }

    #[test]
    fn test_no_match() {
        let items = sample();
        assert!(visible_items(&items, &FilterCriteria::new("zz", GenreFilter::All)).is_empty());
    }

    #[test]
    fn test_both_predicates_required() {
        let items = sample();
        let visible = visible_items(&items, &FilterCriteria::new("ring", Genre::Action));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(visible_items(&[], &FilterCriteria::all()).is_empty());
    }

    #[test]
    fn test_whitespace_query_is_not_trimmed() {
        let items = vec![item(1, "GTA V", Genre::Action), item(2, "Doom", Genre::Shooter)];

        let visible = visible_items(&items, &FilterCriteria::new(" ", GenreFilter::All));
        assert_eq!(titles(&visible), vec!["GTA V"]);

        let visible = visible_items(&items, &FilterCriteria::new("  ", GenreFilter::All));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_preserves_store_order_and_is_idempotent() {
        let mut store = CatalogStore::with_starter_items();
        store.insert(NewItem {
            title: "Ring Fit Adventure".to_string(),
            genre: Genre::Action,
            image: ImageSource::Remote("https://example.com/ring.jpg".to_string()),
        });

        let criteria = FilterCriteria::new("r", GenreFilter::All);
        let first = visible_items(store.items(), &criteria);
        let second = visible_items(store.items(), &criteria);
        assert_eq!(first, second);

        // Visible items form a subsequence of the store, and every match is present
        let expected: Vec<&CatalogItem> = store
            .items()
            .iter()
            .filter(|i| i.title.to_lowercase().contains('r'))
            .collect();
        assert_eq!(first, expected);
        assert_eq!(first[0].title, "Ring Fit Adventure");
    }
}
