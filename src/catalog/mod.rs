//! Catalog of game icons
//!
//! Holds the ordered collection of catalog items. Newest items come first.

pub mod seed;

use std::fmt;

use crate::ingest::ImageSource;

/// Closed set of genres shared with the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    /// Default genre for new uploads
    #[default]
    Rpg,
    Action,
    Shooter,
    Horror,
    Strategy,
    Racing,
}

impl Genre {
    /// Every genre, in display order
    pub const ALL: [Genre; 6] = [
        Genre::Rpg,
        Genre::Action,
        Genre::Shooter,
        Genre::Horror,
        Genre::Strategy,
        Genre::Racing,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rpg => "RPG",
            Self::Action => "Action",
            Self::Shooter => "Shooter",
            Self::Horror => "Horror",
            Self::Strategy => "Strategy",
            Self::Racing => "Racing",
        }
    }

    /// Look up a genre by its exact display label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.display_name() == label)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Genre selector used when filtering: either every genre or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Only(Genre),
}

impl GenreFilter {
    /// The sentinel followed by every genre, in the order the genre bar shows them
    pub fn choices() -> impl Iterator<Item = GenreFilter> {
        std::iter::once(GenreFilter::All).chain(Genre::ALL.into_iter().map(GenreFilter::Only))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(genre) => genre.display_name(),
        }
    }

    /// Whether an item of `genre` passes this selector
    pub fn accepts(&self, genre: Genre) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == genre,
        }
    }
}

impl From<Genre> for GenreFilter {
    fn from(genre: Genre) -> Self {
        Self::Only(genre)
    }
}

/// Identifier of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored game icon. Never mutated once inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: ItemId,
    /// Display title (non-empty)
    pub title: String,
    pub genre: Genre,
    /// Display and export source
    pub image: ImageSource,
}

/// An item waiting for an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub genre: Genre,
    pub image: ImageSource,
}

/// Ordered, insert-only collection of catalog items
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: Vec<CatalogItem>,
}

impl CatalogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in starter icons
    pub fn with_starter_items() -> Self {
        Self {
            items: seed::starter_items(),
        }
    }

    /// Insert an item at the front and return it.
    ///
    /// The id is `len() + 1`. This only stays unique because the store has no removal.
    /// Callers must pass a non-empty title and image; outside this crate items only
    /// arrive through a validated draft.
    pub(crate) fn insert(&mut self, item: NewItem) -> &CatalogItem {
        debug_assert!(!item.title.is_empty() && !item.image.is_empty());

        let id = ItemId(self.items.len() as u32 + 1);
        log::info!("Adding \"{}\" ({}) as item {}", item.title, item.genre, id);

        self.items.insert(
            0,
            CatalogItem {
                id,
                title: item.title,
                genre: item.genre,
                image: item.image,
            },
        );
        &self.items[0]
    }

    /// All items, newest first
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str, genre: Genre) -> NewItem {
        NewItem {
            title: title.to_string(),
            genre,
            image: ImageSource::Remote(format!("https://example.com/{}.jpg", title)),
        }
    }

    #[test]
    fn test_insert_prepends_and_assigns_count_plus_one() {
        let mut store = CatalogStore::new();
        assert!(store.is_empty());

        let first = store.insert(new_item("Elden Ring", Genre::Rpg)).id;
        assert_eq!(first, ItemId(1));

        let second = store.insert(new_item("GTA V", Genre::Action)).id;
        assert_eq!(second, ItemId(2));

        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].title, "GTA V");
        assert_eq!(store.items()[1].title, "Elden Ring");
    }

    #[test]
    fn test_insert_after_starter_items() {
        let mut store = CatalogStore::with_starter_items();
        let before = store.len();

        let id = store.insert(new_item("Hades", Genre::Action)).id;

        assert_eq!(id, ItemId(before as u32 + 1));
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.items()[0].id, id);
    }

    #[test]
    fn test_get_by_id() {
        let mut store = CatalogStore::new();
        store.insert(new_item("Doom", Genre::Shooter));
        store.insert(new_item("Dead Space", Genre::Horror));

        assert_eq!(store.get(ItemId(1)).map(|i| i.title.as_str()), Some("Doom"));
        assert!(store.get(ItemId(3)).is_none());
    }

    #[test]
    fn test_genre_labels() {
        assert_eq!(Genre::Rpg.display_name(), "RPG");
        assert_eq!(Genre::from_label("Racing"), Some(Genre::Racing));
        assert_eq!(Genre::from_label("racing"), None);
        assert_eq!(Genre::default(), Genre::Rpg);
    }

    #[test]
    fn test_genre_filter_choices_start_with_all() {
        let choices: Vec<GenreFilter> = GenreFilter::choices().collect();
        assert_eq!(choices.len(), Genre::ALL.len() + 1);
        assert_eq!(choices[0], GenreFilter::All);
        assert_eq!(choices[1], GenreFilter::Only(Genre::Rpg));
        assert!(GenreFilter::All.accepts(Genre::Horror));
        assert!(!GenreFilter::Only(Genre::Rpg).accepts(Genre::Horror));
    }
}
