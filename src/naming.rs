//! Part filename convention and candidate ordering.
//!
//! Part files are named `<parttype><delimiter><variant>.<ext>`:
//!
//! - `body_3.png` → part type `body`
//! - `arms_S8.png` → part type `arms`
//! - `body-0.svg` → part type `body`
//! - `fade3.png` → part type `fade` (no delimiter: leading letters)
//!
//! Candidates are ordered with [`natural_cmp`] so the same seed indexes the
//! same file no matter how the filesystem enumerates the directory.

use std::cmp::Ordering;

/// Delimiters separating the part type from the variant.
const DELIMITERS: &[char] = &['_', '-'];

/// Extract the part type from a file name (with or without extension).
///
/// Returns `None` when no part type can be derived (e.g. `_1.png`, `42.png`).
pub fn part_type(file_name: &str) -> Option<&str> {
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    let prefix = match stem.find(DELIMITERS) {
        Some(pos) => &stem[..pos],
        None => {
            let end = stem
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(stem.len());
            &stem[..end]
        }
    };
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

/// Natural ordering: digit runs compare by numeric value, everything else
/// byte-wise. Ties between equal numbers with different zero padding fall
/// back to plain string order so the ordering stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            let na = trim_zeros(&ab[si..i]);
            let nb = trim_zeros(&bb[sj..j]);
            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (ab.len() - i).cmp(&(bb.len() - j)).then_with(|| a.cmp(b))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let start = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    &digits[start..]
}

/// Sort candidate names in natural order.
pub fn sort_natural(names: &mut [String]) {
    names.sort_by(|a, b| natural_cmp(a, b));
}
