//! Image directory scanning.
//!
//! Collects the card images from a single directory (no recursion), sorted by
//! file name, and pairs each with a display name from [`crate::naming`].
//!
//! ## Validation
//!
//! - The path must be an existing directory.
//! - At least one file must match the extension allow-list.
//!
//! Both failures are fatal and happen before any rendering starts.

use crate::naming::display_name;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{0}' is not a valid directory")]
    NotADirectory(PathBuf),
    #[error("No image files found in '{dir}'. Supported formats: {}", .extensions.join(", "))]
    NoImages {
        dir: PathBuf,
        extensions: Vec<String>,
    },
}

/// One card: the image to draw and the label under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub path: PathBuf,
    pub name: String,
}

impl CardItem {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// File name for display, falling back to the full path.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Whether `path` has one of the (normalized, dotless, lowercase) extensions.
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Collect card items from `dir`, sorted by file name.
pub fn collect_images(dir: &Path, extensions: &[String]) -> Result<Vec<CardItem>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_image_extension(p, extensions))
        .collect();

    files.sort();

    if files.is_empty() {
        return Err(ScanError::NoImages {
            dir: dir.to_path_buf(),
            extensions: extensions.iter().map(|e| format!(".{e}")).collect(),
        });
    }

    Ok(files
        .into_iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let name = display_name(&stem);
            CardItem { path, name }
        })
        .collect())
}

/// How the number of found images compares to the configured set size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCount {
    /// Exactly `max_cards`, or no cap configured.
    Matches(usize),
    /// More images than the cap; only the first `used` are kept.
    Truncated { found: usize, used: usize },
    /// Fewer images than the cap; all are used.
    Short { found: usize, expected: usize },
}

/// Apply the `game.max_cards` cap (0 = unlimited).
pub fn limit_cards(mut items: Vec<CardItem>, max_cards: usize) -> (Vec<CardItem>, CardCount) {
    let found = items.len();
    let count = if max_cards == 0 || found == max_cards {
        CardCount::Matches(found)
    } else if found > max_cards {
        items.truncate(max_cards);
        CardCount::Truncated {
            found,
            used: max_cards,
        }
    } else {
        CardCount::Short {
            found,
            expected: max_cards,
        }
    };
    (items, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{default_extensions, touch};
    use tempfile::TempDir;

    #[test]
    fn collects_sorted_images_with_names() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "uncle-bob.jpg");
        touch(tmp.path(), "anna_smith.png");
        touch(tmp.path(), "notes.txt");

        let items = collect_images(tmp.path(), &default_extensions()).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Anna Smith", "Uncle Bob"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "LOUD.PNG");
        touch(tmp.path(), "quiet.Jpeg");

        let items = collect_images(tmp.path(), &default_extensions()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn subdirectories_are_ignored() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();
        touch(tmp.path(), "real.png");

        let items = collect_images(tmp.path(), &default_extensions()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].filename(), "real.png");
    }

    #[test]
    fn number_prefix_sorts_and_stays_in_label() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "002-zed.png");
        touch(tmp.path(), "001-yan.png");

        let items = collect_images(tmp.path(), &default_extensions()).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["001 Yan", "002 Zed"]);
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_images(&tmp.path().join("missing"), &default_extensions());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn file_instead_of_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        let result = collect_images(&tmp.path().join("a.png"), &default_extensions());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn no_matching_images_lists_extensions() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "readme.md");

        let err = collect_images(tmp.path(), &["png".to_string()]).unwrap_err();
        assert!(matches!(err, ScanError::NoImages { .. }));
        assert!(err.to_string().contains(".png"));
    }

    #[test]
    fn limit_cards_truncates() {
        let items: Vec<CardItem> = (0..5)
            .map(|i| CardItem::new(format!("{i}.png"), format!("{i}")))
            .collect();
        let (kept, count) = limit_cards(items, 3);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[2].name, "2");
        assert_eq!(count, CardCount::Truncated { found: 5, used: 3 });
    }

    #[test]
    fn limit_cards_short() {
        let items = vec![CardItem::new("a.png", "A")];
        let (kept, count) = limit_cards(items, 24);
        assert_eq!(kept.len(), 1);
        assert_eq!(
            count,
            CardCount::Short {
                found: 1,
                expected: 24
            }
        );
    }

    #[test]
    fn limit_cards_zero_means_unlimited() {
        let items: Vec<CardItem> = (0..30)
            .map(|i| CardItem::new(format!("{i}.png"), format!("{i}")))
            .collect();
        let (kept, count) = limit_cards(items, 0);
        assert_eq!(kept.len(), 30);
        assert_eq!(count, CardCount::Matches(30));
    }
}
