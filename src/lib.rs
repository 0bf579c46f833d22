//! # Avatar Forge
//!
//! Deterministic, privacy-preserving avatars. A seed (usually a salted hash
//! of an e-mail address) goes in; a PNG or SVG avatar comes out, and the same
//! seed always gives byte-identical output.
//!
//! # Architecture: Parts Pipeline
//!
//! Most styles are assembled from a directory of part images (legs, eyes,
//! mouths, ...). Every build runs the same skeleton:
//!
//! ```text
//! 1. Seed       seed string    →  random source    (SHA-256 keyed ChaCha8)
//! 2. Inventory  parts dir      →  type → files     (scanned once, cached)
//! 3. Select     inventory      →  one file per type
//! 4. Render     selected parts →  native canvas    (recolor, composite)
//! 5. Encode     canvas         →  PNG bytes        (Lanczos3 resize)
//! ```
//!
//! Styles plug into steps 3 and 4 through [`generator::PartsStyle`]; the
//! driver ([`generator::PartsGenerator`]) owns seeding, failure containment
//! and resetting the random source afterwards. Styles without parts
//! implement [`generator::Generator`] directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`random`] | Seedable random source with explicit seed/reset |
//! | [`color`] | HSL ↔ RGB, hue normalization, the recoloring gate |
//! | [`naming`] | `<parttype>_<variant>` filename convention and natural sort |
//! | [`cache`] | Key/value cache with TTL (file-backed and in-memory) |
//! | [`inventory`] | Part inventory: scan, bucket, sort, cache |
//! | [`generator`] | The build pipeline, `Generator` trait, `Avatar` output |
//! | [`raster`] | Canvas creation, compositing, recoloring, flood fill, encoding |
//! | [`styles`] | Monster, Wavatar, Cat, Bird, Robohash, Retro, Rings |
//! | [`identity`] | Seeds from e-mail addresses |
//! | [`store`] | On-disk store of rendered avatars |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Build Never Fails Loudly
//!
//! An avatar is decoration. [`generator::Generator::build`] returns
//! `Option<Avatar>`: every internal error (missing parts directory, corrupt
//! part file, short seed) is logged with `tracing` and becomes `None`, and
//! the caller shows some fallback image. Inside the pipeline errors are
//! ordinary `Result`s propagated with `?`.
//!
//! ## Explicit Random Source
//!
//! The random source is a field of each generator, seeded per build and
//! reset afterwards. Nothing touches process-global RNG state, so two
//! generators never interfere and determinism is testable in isolation. A
//! single generator is not meant to be shared across threads mid-build.
//!
//! ## Appearance Is Part of the Contract
//!
//! Part order, the order of random draws, seed offsets, the recoloring gate
//! (lightness strictly between 10 and 99, GD alpha below 115) and palettes
//! all feed into what an existing user's avatar looks like. Changing any of
//! them changes every avatar already shown.

pub mod cache;
pub mod color;
pub mod config;
pub mod generator;
pub mod identity;
pub mod inventory;
pub mod naming;
pub mod output;
pub mod random;
pub mod raster;
pub mod store;
pub mod styles;

#[cfg(test)]
pub(crate) mod test_helpers;
