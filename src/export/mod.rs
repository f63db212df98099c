//! Icon download
//!
//! Writes a catalog item's stored image to disk as `<title>.jpg`.
//! The bytes are written exactly as stored; nothing is re-encoded.

use regex::Regex;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{CatalogItem, ItemId};
use crate::ingest::ImageSource;

/// Extension given to every downloaded icon
pub const ICON_EXTENSION: &str = "jpg";

/// File stem used when a title has no usable characters
const FALLBACK_STEM: &str = "icon";

/// Numbered names tried after `<title>.jpg` before giving up
const MAX_NUMBERED_NAMES: u32 = 999;

/// Timeout for fetching remote images
pub const FETCH_TIMEOUT_SECS: u64 = 60;

static INVALID_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).unwrap());

/// Errors that can occur while downloading an icon
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No catalog item with id {0}")]
    UnknownItem(ItemId),

    #[error("Stored image payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a download
#[derive(Debug)]
pub struct ExportResult {
    /// Where the icon was written
    pub output_path: PathBuf,
    /// Number of bytes written
    pub bytes_written: usize,
}

/// Export settings
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Timeout for fetching remote starter images
    pub fetch_timeout: Duration,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
        }
    }
}

fn file_stem(title: &str) -> String {
    let cleaned = INVALID_FILENAME_CHARS.replace_all(title, "_");
    if cleaned.trim().is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned.into_owned()
    }
}

/// File name a downloaded icon gets, e.g. `Elden Ring.jpg`
pub fn download_file_name(title: &str) -> String {
    format!("{}.{}", file_stem(title), ICON_EXTENSION)
}

/// Preferred path for a downloaded icon inside `dir`. The file actually written may be
/// numbered when this one already exists.
pub fn download_path<P: AsRef<Path>>(dir: P, title: &str) -> PathBuf {
    dir.as_ref().join(download_file_name(title))
}

/// Create a new icon file in `dir` without touching existing files.
///
/// Tries `Title.jpg`, then `Title (1).jpg`, `Title (2).jpg` and so on.
fn create_icon_file(dir: &Path, title: &str) -> io::Result<(PathBuf, File)> {
    let stem = file_stem(title);

    for n in 0..=MAX_NUMBERED_NAMES {
        let name = match n {
            0 => format!("{}.{}", stem, ICON_EXTENSION),
            n => format!("{} ({}).{}", stem, n, ICON_EXTENSION),
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("No free file name for \"{}\" in {}", stem, dir.display()),
    ))
}

/// Write `item`'s image into `dir` under a name no other file has
pub fn export_item<P: AsRef<Path>>(
    item: &CatalogItem,
    dir: P,
    settings: &ExportSettings,
) -> Result<ExportResult, ExportError> {
    let bytes = match &item.image {
        ImageSource::Encoded(data) => data.to_bytes()?,
        ImageSource::Remote(url) => fetch_image(url, settings.fetch_timeout)?,
    };

    let (output_path, mut file) = create_icon_file(dir.as_ref(), &item.title)?;
    file.write_all(&bytes)?;

    log::info!("Saved \"{}\" to {}", item.title, output_path.display());

    Ok(ExportResult {
        output_path,
        bytes_written: bytes.len(),
    })
}

/// Fetch image data from a URL
pub fn fetch_image(url: &str, timeout: Duration) -> Result<Vec<u8>, ExportError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gameicons/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ExportError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| ExportError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ExportError::Fetch(format!("HTTP error: {}", response.status())));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| ExportError::Fetch(format!("Failed to read response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Genre;
    use crate::ingest::{encode_bytes, DataUrl};

    fn encoded_item(title: &str, bytes: &[u8]) -> CatalogItem {
        CatalogItem {
            id: ItemId(13),
            title: title.to_string(),
            genre: Genre::Horror,
            image: encode_bytes(bytes, "image/png").into(),
        }
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Elden Ring"), "Elden Ring.jpg");
        assert_eq!(download_file_name("Spider-Man"), "Spider-Man.jpg");
    }

    #[test]
    fn test_download_file_name_replaces_invalid_chars() {
        assert_eq!(download_file_name("Half-Life 2: Episode One"), "Half-Life 2_ Episode One.jpg");
        assert_eq!(download_file_name("AC/DC?"), "AC_DC_.jpg");
    }

    #[test]
    fn test_download_file_name_blank_title() {
        assert_eq!(download_file_name("   "), "icon.jpg");
        assert_eq!(download_file_name(""), "icon.jpg");
    }

    #[test]
    fn test_download_path() {
        assert_eq!(
            download_path("/tmp/icons", "Doom"),
            PathBuf::from("/tmp/icons/Doom.jpg")
        );
    }

    #[test]
    fn test_export_writes_payload_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let payload = [0x89, b'P', b'N', b'G', 1, 2, 3];
        let item = encoded_item("Dead Space", &payload);

        let result = export_item(&item, dir.path(), &ExportSettings::default()).unwrap();

        assert_eq!(result.output_path, dir.path().join("Dead Space.jpg"));
        assert_eq!(result.bytes_written, payload.len());
        assert_eq!(std::fs::read(&result.output_path).unwrap(), payload);
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let item = encoded_item("Doom", b"x");

        let err =
            export_item(&item, dir.path().join("nope"), &ExportSettings::default()).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn test_parsed_payload_exports() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataUrl::parse("data:image/jpeg;base64,aGVsbG8=").unwrap();
        let item = CatalogItem {
            id: ItemId(1),
            title: "Hello".to_string(),
            genre: Genre::Racing,
            image: data.into(),
        };

        export_item(&item, dir.path(), &ExportSettings::default()).unwrap();
        assert_eq!(std::fs::read(dir.path().join("Hello.jpg")).unwrap(), b"hello");
    }

    #[test]
    fn test_export_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Doom.jpg");
        std::fs::write(&existing, b"holiday photo").unwrap();

        let item = encoded_item("Doom", b"icon");
        let result = export_item(&item, dir.path(), &ExportSettings::default()).unwrap();

        assert_eq!(std::fs::read(&existing).unwrap(), b"holiday photo");
        assert_eq!(result.output_path, dir.path().join("Doom (1).jpg"));
        assert_eq!(std::fs::read(&result.output_path).unwrap(), b"icon");
    }

    #[test]
    fn test_repeated_export_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let item = encoded_item("AC/DC", b"icon");
        let settings = ExportSettings::default();

        let paths: Vec<PathBuf> = (0..3)
            .map(|_| export_item(&item, dir.path(), &settings).unwrap().output_path)
            .collect();

        assert_eq!(
            paths,
            vec![
                dir.path().join("AC_DC.jpg"),
                dir.path().join("AC_DC (1).jpg"),
                dir.path().join("AC_DC (2).jpg"),
            ]
        );
    }

    #[test]
    #[ignore] // Requires network access
    fn test_export_remote_item() {
        let dir = tempfile::tempdir().unwrap();
        let item = crate::catalog::seed::starter_items().remove(0);

        let result = export_item(&item, dir.path(), &ExportSettings::default()).unwrap();
        assert!(result.bytes_written > 0);
    }
}
