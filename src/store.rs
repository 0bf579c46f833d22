//! On-disk store of rendered avatars.
//!
//! Building a raster avatar means decoding and compositing several PNGs, so
//! callers that serve the same avatar repeatedly keep the finished bytes:
//!
//! ```text
//! <root>/
//! └── monster/
//!     └── 3f/
//!         ├── 3fa9…e1-80.png
//!         └── 3fa9…e1-160.png
//! ```
//!
//! The two-character fan-out directory keeps any one directory small. Seeds
//! become file names, so only ASCII alphanumeric seeds (hex hashes) are
//! accepted.

use crate::generator::{Avatar, Generator};
use crate::styles::Style;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seed is not safe to use as a file name: {0:?}")]
    UnsafeSeed(String),
}

#[derive(Debug, Clone)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the avatar for `style`/`seed`/`size` lives.
    pub fn path(&self, style: Style, seed: &str, size: u32) -> Result<PathBuf, StoreError> {
        if seed.is_empty() || !seed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(StoreError::UnsafeSeed(seed.to_string()));
        }
        let fan_out = seed.get(..2).unwrap_or(seed);
        Ok(self
            .root
            .join(style.name())
            .join(fan_out)
            .join(format!("{seed}-{size}.{}", style.extension())))
    }

    /// Read a stored avatar, `None` if it has not been stored.
    pub fn get(&self, style: Style, seed: &str, size: u32) -> Result<Option<Avatar>, StoreError> {
        let path = self.path(style, seed, size)?;
        if !path.is_file() {
            return Ok(None);
        }
        let avatar = match style.extension() {
            "svg" => Avatar::Svg(fs::read_to_string(&path)?),
            _ => Avatar::Png(fs::read(&path)?),
        };
        Ok(Some(avatar))
    }

    /// Store an avatar, returning the written path.
    pub fn set(
        &self,
        style: Style,
        seed: &str,
        size: u32,
        avatar: &Avatar,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path(style, seed, size)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, avatar.as_bytes())?;
        Ok(path)
    }

    /// Return the stored avatar, building and storing it on a miss.
    ///
    /// A failed write is logged; the freshly built avatar is still returned.
    pub fn get_or_build(
        &self,
        style: Style,
        seed: &str,
        size: u32,
        generator: &mut dyn Generator,
    ) -> Result<Option<Avatar>, StoreError> {
        if let Some(avatar) = self.get(style, seed, size)? {
            debug!(%style, size, "avatar store hit");
            return Ok(Some(avatar));
        }
        let Some(avatar) = generator.build(seed, size) else {
            return Ok(None);
        };
        if let Err(e) = self.set(style, seed, size, &avatar) {
            warn!(%style, size, error = %e, "could not store avatar");
        }
        Ok(Some(avatar))
    }
}
