use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode::decode_image,
    foundation::{core::Rgba8, error::StageResult},
};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl ImageData {
    /// Uniformly colored image, handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.premultiplied();
        let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            bytes.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}

/// One manifest entry: either `{"id": .., "src": ..}` or a bare path whose
/// file stem becomes the id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AssetEntry {
    /// Explicit id.
    Keyed {
        /// Lookup id used by entity configs.
        id: String,
        /// Path relative to the asset root.
        #[serde(alias = "path")]
        src: String,
    },
    /// Bare path.
    Path(String),
}

impl AssetEntry {
    /// Lookup id.
    pub fn id(&self) -> String {
        match self {
            Self::Keyed { id, .. } => id.clone(),
            Self::Path(p) => Path::new(p)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.clone()),
        }
    }

    /// Source path.
    pub fn src(&self) -> &str {
        match self {
            Self::Keyed { src, .. } => src,
            Self::Path(p) => p,
        }
    }
}

/// Asset manifest of a scene document. The interpreter only forwards it to
/// the resolver.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetManifest {
    /// Raster images.
    #[serde(default)]
    pub images: Vec<AssetEntry>,
    /// Sound effects and music.
    #[serde(default)]
    pub audio: Vec<AssetEntry>,
    /// Videos.
    #[serde(default)]
    pub videos: Vec<AssetEntry>,
}

impl AssetManifest {
    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.images.len() + self.audio.len() + self.videos.len()
    }

    /// Whether the manifest lists nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Asset-loading collaborator.
pub trait AssetResolver {
    /// Load what `manifest` lists. Called from a scene's `enter` hook.
    /// Individual failures should be logged, not returned.
    fn preload(&mut self, _manifest: &AssetManifest) -> StageResult<()> {
        Ok(())
    }

    /// Resolve an image by id.
    fn image(&self, id: &str) -> Option<Arc<ImageData>>;
}

/// In-memory resolver populated by the host.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssets {
    images: HashMap<String, Arc<ImageData>>,
}

impl MemoryAssets {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an image.
    pub fn insert_image(&mut self, id: impl Into<String>, image: ImageData) {
        self.images.insert(id.into(), Arc::new(image));
    }
}

impl AssetResolver for MemoryAssets {
    fn image(&self, id: &str) -> Option<Arc<ImageData>> {
        self.images.get(id).cloned()
    }
}

/// Resolver that reads manifest images from disk relative to a root.
#[derive(Clone, Debug)]
pub struct FileAssets {
    root: PathBuf,
    images: HashMap<String, Arc<ImageData>>,
}

impl FileAssets {
    /// Resolve manifest paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    /// Read and decode one image, registering it under `id`.
    pub fn load_image(&mut self, id: &str, rel_path: &str) -> StageResult<()> {
        let path = self.root.join(rel_path);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        let image = decode_image(&bytes)?;
        self.images.insert(id.to_owned(), Arc::new(image));
        Ok(())
    }

    /// Number of decoded images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl AssetResolver for FileAssets {
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    fn preload(&mut self, manifest: &AssetManifest) -> StageResult<()> {
        for entry in &manifest.images {
            let id = entry.id();
            if self.images.contains_key(&id) {
                continue;
            }
            if let Err(err) = self.load_image(&id, entry.src()) {
                tracing::warn!(%id, src = entry.src(), %err, "image failed to load");
            }
        }
        tracing::debug!(loaded = self.images.len(), "images ready");
        Ok(())
    }

    fn image(&self, id: &str) -> Option<Arc<ImageData>> {
        self.images.get(id).cloned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
