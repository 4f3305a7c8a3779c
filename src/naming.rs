//! Display names from image filenames.
//!
//! A card's label comes from its file stem:
//!
//! - underscores and dashes become spaces, one for one;
//! - every word is title-cased.
//!
//! Leading numbers stay part of the name. They still decide the sort order,
//! since files are sorted by name.
//!
//! | File | Label |
//! |---|---|
//! | `anna_smith.png` | Anna Smith |
//! | `uncle-bob.jpg` | Uncle Bob |
//! | `7-of-nine.png` | 7 Of Nine |
//! | `007.png` | 007 |

/// Title-case each alphabetic run: first letter upper, the rest lower.
///
/// A letter directly after a non-letter starts a new word, so `o'neil`
/// becomes `O'Neil` and `r2d2` becomes `R2D2`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Derive the card label for a file stem.
pub fn display_name(stem: &str) -> String {
    title_case(&stem.replace(['_', '-'], " "))
}
