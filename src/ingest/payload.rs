//! Self-describing image payloads
//!
//! Uploaded images are kept as `data:` URLs so the bytes carry their own MIME type.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// MIME type used when neither the content nor the extension identifies the file
pub const FALLBACK_MIME: &str = "application/octet-stream";

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A `data:<mime>;base64,<payload>` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    /// Validate an existing data URL string
    pub fn parse(url: &str) -> Option<Self> {
        let rest = url.strip_prefix(DATA_PREFIX)?;
        let (mime, payload) = rest.split_once(BASE64_MARKER)?;
        if mime.is_empty() || BASE64.decode(payload).is_err() {
            return None;
        }
        Some(Self(url.to_string()))
    }

    /// The embedded MIME type
    pub fn mime(&self) -> &str {
        self.0[DATA_PREFIX.len()..]
            .split_once(BASE64_MARKER)
            .map(|(mime, _)| mime)
            .unwrap_or(FALLBACK_MIME)
    }

    /// Decode the embedded bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self.0.split_once(BASE64_MARKER).map(|(_, p)| p).unwrap_or("");
        BASE64.decode(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a catalog image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline payload produced by ingestion
    Encoded(DataUrl),
    /// Remote image (starter icons)
    Remote(String),
}

impl ImageSource {
    /// The string a display layer would use as image source
    pub fn as_uri(&self) -> &str {
        match self {
            Self::Encoded(data) => data.as_str(),
            Self::Remote(url) => url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_uri().is_empty()
    }
}

impl From<DataUrl> for ImageSource {
    fn from(data: DataUrl) -> Self {
        Self::Encoded(data)
    }
}

/// Wrap raw bytes into a data URL with the given MIME type
pub fn encode_bytes(bytes: &[u8], mime: &str) -> DataUrl {
    DataUrl(format!("{}{}{}{}", DATA_PREFIX, mime, BASE64_MARKER, BASE64.encode(bytes)))
}

/// Work out a MIME type for a file.
///
/// Content sniffing wins over the extension; unknown files get [`FALLBACK_MIME`].
pub fn detect_mime(path: &Path, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }

    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_encode_bytes_embeds_mime() {
        let url = encode_bytes(b"hello", "image/png");
        assert_eq!(url.as_str(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(url.mime(), "image/png");
        assert_eq!(url.to_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_encode_empty_file() {
        let url = encode_bytes(&[], FALLBACK_MIME);
        assert_eq!(url.as_str(), "data:application/octet-stream;base64,");
        assert!(url.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn test_parse() {
        assert!(DataUrl::parse("data:image/jpeg;base64,aGVsbG8=").is_some());
        assert!(DataUrl::parse("https://example.com/a.jpg").is_none());
        assert!(DataUrl::parse("data:image/jpeg,plain").is_none());
        assert!(DataUrl::parse("data:image/jpeg;base64,***").is_none());
        assert!(DataUrl::parse("data:;base64,aGVsbG8=").is_none());
    }

    #[test]
    fn test_detect_mime_prefers_content() {
        assert_eq!(detect_mime(Path::new("cover.jpg"), PNG_MAGIC), "image/png");
    }

    #[test]
    fn test_detect_mime_from_extension() {
        assert_eq!(detect_mime(Path::new("cover.jpeg"), b"not an image"), "image/jpeg");
        assert_eq!(detect_mime(Path::new("cover.webp"), b"not an image"), "image/webp");
    }

    #[test]
    fn test_detect_mime_fallback() {
        assert_eq!(detect_mime(Path::new("notes.txt"), b"plain text"), FALLBACK_MIME);
        assert_eq!(detect_mime(Path::new("noext"), b""), FALLBACK_MIME);
    }

    #[test]
    fn test_image_source_uri() {
        let remote = ImageSource::Remote("https://example.com/a.jpg".to_string());
        assert_eq!(remote.as_uri(), "https://example.com/a.jpg");

        let encoded: ImageSource = encode_bytes(b"x", "image/gif").into();
        assert!(encoded.as_uri().starts_with("data:image/gif;base64,"));
        assert!(!encoded.is_empty());
    }
}
