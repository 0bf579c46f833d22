//! Retro style: a mirrored 5 × 5 pixel identicon read from the seed's hex
//! digits. No parts and no random draws.
//!
//! ```text
//! digits  0  2  4        column 0 1 2 1 0
//!         6  8 10               ┌─────────┐
//!        12 14 16   ──►   row 0 │ ■ · ■ · ■ │
//!        18 20 22          ...  │    ...    │
//!        24 26 28         row 4 │ · ■ · ■ · │
//!                               └─────────┘
//! ```
//!
//! The first hex digit of each of the first fifteen byte pairs decides one
//! cell of the left three columns (digit ≥ 5 is on); columns 0 and 1 are
//! mirrored onto 4 and 3. The fill color comes from the first digits of
//! pairs 13, 14 and 15, each times 16.
//!
//! Seeds that are not already at least 32 hex digits are hashed with
//! SHA-256 first.

use crate::generator::{Avatar, Generator};
use crate::raster;
use maud::html;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use tracing::warn;

const ROWS: usize = 5;
const HALF_COLUMNS: usize = 3;
const COLUMNS: usize = 5;

/// The 32 hex digits the bitmap and color are read from.
pub fn seed_digits(seed: &str) -> Vec<u8> {
    let direct = seed
        .get(..32)
        .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_hexdigit()))
        .map(str::to_string);
    let hex = direct.unwrap_or_else(|| format!("{:x}", Sha256::digest(seed.as_bytes())));
    hex.chars()
        .take(32)
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect()
}

/// On/off cells, `[row][column]`, already mirrored.
pub fn bitmap(digits: &[u8]) -> [[bool; COLUMNS]; ROWS] {
    let mut cells = [[false; COLUMNS]; ROWS];
    for i in 0..ROWS * HALF_COLUMNS {
        let on = digits.get(i * 2).is_some_and(|d| *d >= 5);
        let (row, column) = (i / HALF_COLUMNS, i % HALF_COLUMNS);
        cells[row][column] = on;
        cells[row][COLUMNS - 1 - column] = on;
    }
    cells
}

/// Fill color from pairs 13, 14 and 15.
pub fn fill_color(digits: &[u8]) -> [u8; 3] {
    let channel = |pair: usize| digits.get(pair * 2).copied().unwrap_or(0) * 16;
    [channel(13), channel(14), channel(15)]
}

/// One path of unit squares, one subpath per lit cell.
fn squares_path(cells: &[[bool; COLUMNS]; ROWS]) -> String {
    let mut path = String::new();
    for (y, row) in cells.iter().enumerate() {
        for (x, on) in row.iter().enumerate() {
            if *on {
                let _ = write!(path, "M{x},{y}h1v1h-1z");
            }
        }
    }
    path
}

/// Render the identicon for `seed` as an SVG document.
pub fn render(seed: &str, size: u32) -> String {
    let digits = seed_digits(seed);
    let path = squares_path(&bitmap(&digits));
    let color = crate::color::to_hex(fill_color(&digits));

    html! {
        svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 5 5"
            width=(size) height=(size) shape-rendering="crispEdges" {
            path fill=(color) d=(path) {}
        }
    }
    .into_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Retro;

impl Generator for Retro {
    fn build(&mut self, seed: &str, size: u32) -> Option<Avatar> {
        if seed.is_empty() || size == 0 {
            warn!(style = "retro", size, "refusing to build avatar for empty seed or zero size");
            return None;
        }
        if size > raster::MAX_SIZE {
            warn!(
                style = "retro",
                size,
                max = raster::MAX_SIZE,
                "requested avatar size too large"
            );
            return None;
        }
        Some(Avatar::Svg(render(seed, size)))
    }
}
