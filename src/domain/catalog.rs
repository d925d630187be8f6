use serde::Deserialize;

pub(crate) const DEFAULT_IMAGE: &str = "assets/images/default.jpeg";

/// One bundled song used to seed an empty store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub artist: String,
    pub src: String,
    #[serde(default = "default_img")]
    pub img: String,
}

impl CatalogEntry {
    pub fn new(title: &str, artist: &str, src: &str, img: &str) -> Self {
        CatalogEntry {
            title: title.to_string(),
            artist: artist.to_string(),
            src: src.to_string(),
            img: img.to_string(),
        }
    }
}

pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(
            "Supernova",
            "AESPA",
            "assets/audio/aespa - Supernova (1).mp3",
            DEFAULT_IMAGE,
        ),
        CatalogEntry::new(
            "Hot Mess",
            "AESPA",
            "assets/audio/aespa - Hot Mess.mp3",
            DEFAULT_IMAGE,
        ),
    ]
}

fn default_img() -> String {
    DEFAULT_IMAGE.to_string()
}
