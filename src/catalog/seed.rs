//! Built-in starter icons shown before anything is uploaded

use super::{CatalogItem, Genre, ItemId};
use crate::ingest::ImageSource;

const STARTER_ICONS: &[(&str, Genre, &str)] = &[
    (
        "Cyberpunk 2077",
        Genre::Rpg,
        "https://images.unsplash.com/photo-1538481199705-c710c4e965fc?w=400&h=600&fit=crop",
    ),
    (
        "The Witcher 3",
        Genre::Rpg,
        "https://images.unsplash.com/photo-1511512578047-dfb367046420?w=400&h=600&fit=crop",
    ),
    (
        "Red Dead Redemption 2",
        Genre::Action,
        "https://images.unsplash.com/photo-1509198397868-475647b2a1e5?w=400&h=600&fit=crop",
    ),
    (
        "God of War",
        Genre::Action,
        "https://images.unsplash.com/photo-1552820728-8b83bb6b773f?w=400&h=600&fit=crop",
    ),
    (
        "Elden Ring",
        Genre::Rpg,
        "https://images.unsplash.com/photo-1542751371-adc38448a05e?w=400&h=600&fit=crop",
    ),
    (
        "Horizon Forbidden West",
        Genre::Action,
        "https://images.unsplash.com/photo-1493711662062-fa541adb3fc8?w=400&h=600&fit=crop",
    ),
    (
        "Spider-Man",
        Genre::Action,
        "https://images.unsplash.com/photo-1534423861386-85a16f5d13fd?w=400&h=600&fit=crop",
    ),
    (
        "Assassins Creed Valhalla",
        Genre::Action,
        "https://images.unsplash.com/photo-1556438064-2d7646166914?w=400&h=600&fit=crop",
    ),
    (
        "Call of Duty",
        Genre::Shooter,
        "https://images.unsplash.com/photo-1552820728-8b83bb6b773f?w=400&h=600&fit=crop",
    ),
    (
        "Fallout 4",
        Genre::Rpg,
        "https://images.unsplash.com/photo-1579373903781-fd5c0c30c4cd?w=400&h=600&fit=crop",
    ),
    (
        "GTA V",
        Genre::Action,
        "https://images.unsplash.com/photo-1547082661-e6d9b0493e98?w=400&h=600&fit=crop",
    ),
    (
        "Starfield",
        Genre::Rpg,
        "https://images.unsplash.com/photo-1614732414444-096e5f1122d5?w=400&h=600&fit=crop",
    ),
];

/// The starter icons, ids 1 through 12 in order
pub fn starter_items() -> Vec<CatalogItem> {
    STARTER_ICONS
        .iter()
        .enumerate()
        .map(|(i, (title, genre, url))| CatalogItem {
            id: ItemId(i as u32 + 1),
            title: title.to_string(),
            genre: *genre,
            image: ImageSource::Remote(url.to_string()),
        })
        .collect()
}
