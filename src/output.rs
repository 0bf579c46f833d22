//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Inventory
//!
//! ```text
//! monster (parts/monster-id)
//!     legs: 14
//!     hair: 9
//!     arms: 0 (missing)
//! 23 parts, 2 of 3 types
//! ```
//!
//! ## Generate
//!
//! ```text
//! monster 80px → avatar.png (4213 bytes, image/png)
//! ```
//!
//! ## Dimensions
//!
//! ```text
//! arms_S8.png: 12,40 → 107,93
//! body_1.png: 5,7 → 114,118
//! Bounds for 2 parts → monster-bounds.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generator::Avatar;
use crate::inventory::Parts;
use crate::raster::PartsDimensions;
use crate::styles::Style;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Inventory
// ============================================================================

/// Format part counts per type, in the style's compositing order.
pub fn format_inventory(style: Style, dir: &Path, parts: &Parts) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", style, dir.display())];
    let mut total = 0;
    let mut present = 0;
    for part_type in style.part_types() {
        let count = parts.get(*part_type).map_or(0, Vec::len);
        total += count;
        if count > 0 {
            present += 1;
            lines.push(format!("{}{}: {}", indent(1), part_type, count));
        } else {
            lines.push(format!("{}{}: 0 (missing)", indent(1), part_type));
        }
    }
    lines.push(format!(
        "{} parts, {} of {} types",
        total,
        present,
        style.part_types().len()
    ));
    lines
}

pub fn print_inventory(style: Style, dir: &Path, parts: &Parts) {
    for line in format_inventory(style, dir, parts) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the result of a `generate` run.
pub fn format_generate(style: Style, size: u32, avatar: &Avatar, dest: &Path) -> Vec<String> {
    vec![format!(
        "{} {}px → {} ({} bytes, {})",
        style,
        size,
        dest.display(),
        avatar.as_bytes().len(),
        avatar.mime_type()
    )]
}

pub fn print_generate(style: Style, size: u32, avatar: &Avatar, dest: &Path) {
    for line in format_generate(style, size, avatar, dest) {
        println!("{}", line);
    }
}

// ============================================================================
// Dimensions
// ============================================================================

/// Format a bounds table and where it was written.
pub fn format_dimensions(dimensions: &PartsDimensions, dest: &Path) -> Vec<String> {
    let mut lines: Vec<String> = dimensions
        .iter()
        .map(|(file, b)| {
            format!(
                "{}: {},{} → {},{}",
                file, b.left, b.top, b.right, b.bottom
            )
        })
        .collect();
    lines.push(format!(
        "Bounds for {} parts → {}",
        dimensions.len(),
        dest.display()
    ));
    lines
}

pub fn print_dimensions(dimensions: &PartsDimensions, dest: &Path) {
    for line in format_dimensions(dimensions, dest) {
        println!("{}", line);
    }
}
