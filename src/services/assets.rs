use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Error accessing images in {}: {source}", .dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Picks illustrative images from a directory. The choice is unrelated to
/// the generated content.
#[derive(Debug, Clone)]
pub struct AssetPicker {
    dir: PathBuf,
}

impl AssetPicker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pick(&self) -> Result<Option<PathBuf>, AssetError> {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<PathBuf>, AssetError> {
        let images = self.list_images()?;
        Ok(images.choose(rng).cloned())
    }

    /// All image files in the directory, in name order.
    pub fn list_images(&self) -> Result<Vec<PathBuf>, AssetError> {
        let listing_error = |source| AssetError::Listing {
            dir: self.dir.clone(),
            source,
        };

        let mut images = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(listing_error)? {
            let entry = entry.map_err(listing_error)?;
            let name = entry.file_name();
            if is_image_name(&name.to_string_lossy()) {
                images.push(self.dir.join(name));
            }
        }
        images.sort();
        Ok(images)
    }
}

fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
