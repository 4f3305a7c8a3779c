//! Image loading backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the one operation the renderer needs from an
//! image library: turn a file into enhanced, flattened pixel planes ready to
//! embed in the PDF.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a mock that fails on demand.

use crate::config::EnhanceConfig;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Image has no pixels: {0}")]
    Empty(String),
}

/// Decoded pixels split into the planes a PDF image XObject wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved 8-bit RGB, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
    /// 8-bit alpha, present only when some pixel is not fully opaque.
    pub alpha: Option<Vec<u8>>,
}

impl PreparedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image loading backends.
pub trait ImageBackend {
    /// Decode `path` and apply the configured enhancement.
    fn load(&self, path: &Path, enhance: &EnhanceConfig) -> Result<PreparedImage, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Mock backend that returns solid images and fails for chosen file names.
    #[derive(Default)]
    pub struct MockBackend {
        pub failing: Vec<String>,
        pub size: Option<(u32, u32)>,
        pub loaded: RefCell<Vec<String>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(names: &[&str]) -> Self {
            Self {
                failing: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn get_loaded(&self) -> Vec<String> {
            self.loaded.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn load(
            &self,
            path: &Path,
            _enhance: &EnhanceConfig,
        ) -> Result<PreparedImage, BackendError> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.loaded.borrow_mut().push(name.clone());

            if self.failing.contains(&name) {
                return Err(BackendError::Decode {
                    path: path.display().to_string(),
                    reason: "mock failure".to_string(),
                });
            }
            let (width, height) = self.size.unwrap_or((4, 6));
            Ok(PreparedImage {
                width,
                height,
                rgb: vec![90; (width * height * 3) as usize],
                alpha: None,
            })
        }
    }

    #[test]
    fn mock_records_loads() {
        let backend = MockBackend::new();
        let img = backend
            .load(Path::new("/cards/anna.png"), &EnhanceConfig::default())
            .unwrap();
        assert_eq!(img.dimensions(), (4, 6));
        assert_eq!(img.rgb.len(), 72);
        assert_eq!(backend.get_loaded(), vec!["anna.png"]);
    }

    #[test]
    fn mock_fails_on_request() {
        let backend = MockBackend::failing_on(&["bad.jpg"]);
        let result = backend.load(Path::new("/cards/bad.jpg"), &EnhanceConfig::default());
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }
}
