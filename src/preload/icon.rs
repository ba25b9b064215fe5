//! Decoded icon images

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use super::PreloadError;

/// An icon decoded to RGBA8, ready for GPU upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    /// File stem, e.g. `core_07`
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl IconImage {
    /// Decode an icon from encoded image bytes (PNG, JPEG or BMP)
    pub fn from_bytes(bytes: &[u8], name: impl Into<String>) -> Result<Self, PreloadError> {
        let name = name.into();
        let img = image::load_from_memory(bytes)
            .map_err(|e| PreloadError::Decode(format!("{}: {}", name, e)))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            name,
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Read and decode an icon from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &Path) -> Result<Self, PreloadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| PreloadError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes, file_stem(path))
    }

    /// Size of the decoded pixel data in bytes
    pub fn byte_len(&self) -> usize {
        self.rgba.len()
    }
}

/// File name without extension, as used for icon names
pub(crate) fn file_stem(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Write a solid-colour PNG for tests
#[cfg(test)]
pub(crate) fn write_test_png(path: &std::path::Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]))
        .save(path)
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core_03.png");
        write_test_png(&path, 4, 2);

        let icon = IconImage::from_file(&path).unwrap();
        assert_eq!(icon.name, "core_03");
        assert_eq!((icon.width, icon.height), (4, 2));
        assert_eq!(icon.byte_len(), 4 * 2 * 4);
        assert_eq!(&icon.rgba[..4], &[200, 40, 40, 255]);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = IconImage::from_bytes(b"not an image", "bad").unwrap_err();
        assert!(matches!(err, PreloadError::Decode(msg) if msg.starts_with("bad:")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = IconImage::from_file(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, PreloadError::Io(_)));
    }
}
