//! Safe loading: the bridge between fallible resource loaders and the
//! remediation engine.
//!
//! `load_safe` is the pipeline's only suspension point. Whatever the
//! underlying loader does — resolve, reject, take forever — the caller gets
//! back a usable asset; failures become diagnostics plus a placeholder, not
//! propagated errors.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use atelier_core::{AssetKind, ColorSpace};

use crate::error::LoadError;
use crate::ktx2;
use crate::model::{self, ModelAsset};
use crate::repair::TextureRepair;
use crate::texture::{ImageData, PixelFormat, TextureHandle};

/// Boxed future returned by loader implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The asynchronous contract an underlying resource loader exposes: one
/// call, one eventual resolution or rejection.
pub trait ResourceLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>>;
}

/// A successfully loaded asset of either kind.
#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Texture(TextureHandle),
    Model(ModelAsset),
}

impl LoadedAsset {
    pub fn as_texture(&self) -> Option<&TextureHandle> {
        match self {
            LoadedAsset::Texture(handle) => Some(handle),
            LoadedAsset::Model(_) => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelAsset> {
        match self {
            LoadedAsset::Model(model) => Some(model),
            LoadedAsset::Texture(_) => None,
        }
    }
}

impl TextureRepair {
    /// Load `source` through `loader`, converting any failure into a usable
    /// placeholder.
    ///
    /// This call never fails outward. A rejected load is logged and replaced
    /// by a labeled placeholder; a resolved texture is retagged for display
    /// color space and dimension-checked. The dimension check is best
    /// effort: a streaming loader may resolve before the payload arrives, in
    /// which case only the missing-data warning is recorded and the caller
    /// re-runs [`TextureRepair::validate_dimensions`] once the payload
    /// lands. A handle already delivered is never swapped retroactively.
    pub async fn load_safe(
        &mut self,
        name: &str,
        source: &str,
        kind: AssetKind,
        loader: &dyn ResourceLoader,
    ) -> LoadedAsset {
        match loader.load(source).await {
            Ok(LoadedAsset::Texture(mut handle)) => {
                if kind == AssetKind::Texture {
                    // A failed retag is already reported; the handle still
                    // renders with its original tags.
                    let _ = self.fix_format(&mut handle, ColorSpace::Display);
                    self.validate_dimensions(&handle, name);
                }
                LoadedAsset::Texture(handle)
            }
            Ok(asset) => asset,
            Err(err) => {
                self.diagnostics_mut()
                    .log_error("LoadFailure", format!("failed to load '{name}': {err}"));
                LoadedAsset::Texture(self.create_fallback(name))
            }
        }
    }
}

/// Resolve a manifest source (site-absolute, e.g. `/assets/foo.png`)
/// against a base directory.
fn resolve(base: &Path, source: &str) -> PathBuf {
    base.join(source.trim_start_matches('/'))
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io(path.to_path_buf(), err)
        }
    })
}

/// Loads PNG/JPEG files from disk through the `image` crate.
pub struct ImageFileLoader {
    base: PathBuf,
}

impl ImageFileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceLoader for ImageFileLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
        let path = resolve(&self.base, source);
        Box::pin(async move {
            let bytes = read_file(&path).await?;
            let decoded = image::load_from_memory(&bytes)
                .map_err(|err| LoadError::ImageDecode(path.clone(), err.to_string()))?;

            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            Ok(LoadedAsset::Texture(TextureHandle::from_image(
                ImageData {
                    width,
                    height,
                    pixels: rgba.into_raw(),
                },
                PixelFormat::Rgba8,
            )))
        })
    }
}

/// Loads block-compressed KTX2 containers from disk.
pub struct Ktx2FileLoader {
    base: PathBuf,
}

impl Ktx2FileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceLoader for Ktx2FileLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
        let path = resolve(&self.base, source);
        Box::pin(async move {
            let bytes = read_file(&path).await?;
            let handle =
                ktx2::read_texture(&bytes).map_err(|err| LoadError::Ktx2(path.clone(), err))?;
            Ok(LoadedAsset::Texture(handle))
        })
    }
}

/// Loads glTF binary models from disk.
pub struct GlbFileLoader {
    base: PathBuf,
}

impl GlbFileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceLoader for GlbFileLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
        let path = resolve(&self.base, source);
        Box::pin(async move {
            let bytes = read_file(&path).await?;
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".to_string());
            let model = model::load_glb(&stem, &bytes)
                .map_err(|err| LoadError::Model(path.clone(), err.to_string()))?;
            Ok(LoadedAsset::Model(model))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FALLBACK_EDGE;
    use crate::manifest::base_manifest;

    /// Rejects every load with a network error.
    struct FailingLoader;

    impl ResourceLoader for FailingLoader {
        fn load(&self, _source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
            Box::pin(async { Err(LoadError::Network("network error".to_string())) })
        }
    }

    /// Resolves every load with a clone of one handle.
    struct StaticLoader(TextureHandle);

    impl ResourceLoader for StaticLoader {
        fn load(&self, _source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
            let handle = self.0.clone();
            Box::pin(async move { Ok(LoadedAsset::Texture(handle)) })
        }
    }

    fn rgba_handle(width: u32, height: u32) -> TextureHandle {
        TextureHandle::from_image(
            ImageData {
                width,
                height,
                pixels: vec![0; (width * height * 4) as usize],
            },
            PixelFormat::Rgba8,
        )
    }

    #[tokio::test]
    async fn rejection_becomes_a_placeholder_not_an_error() {
        let mut repair = TextureRepair::new();
        let asset = repair
            .load_safe("baked", "/assets/baked/baked.ktx2", AssetKind::Texture, &FailingLoader)
            .await;

        let handle = asset.as_texture().expect("placeholder texture");
        assert_eq!(handle.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));

        let errors = repair.diagnostics().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("baked"));
        assert!(errors[0].message.contains("network error"));
    }

    #[tokio::test]
    async fn resolved_texture_is_retagged_and_checked() {
        let mut repair = TextureRepair::new();
        let asset = repair
            .load_safe(
                "wall",
                "/assets/wall.png",
                AssetKind::Texture,
                &StaticLoader(rgba_handle(512, 512)),
            )
            .await;

        let handle = asset.as_texture().unwrap();
        assert_eq!(handle.color_space, ColorSpace::Display);
        assert!(handle.needs_upload);
        assert_eq!(repair.report().total_issues, 0);
    }

    #[tokio::test]
    async fn misaligned_resolved_texture_is_reported_but_delivered() {
        let mut repair = TextureRepair::new();
        let asset = repair
            .load_safe(
                "odd",
                "/assets/odd.png",
                AssetKind::Texture,
                &StaticLoader(rgba_handle(510, 512)),
            )
            .await;

        // Delivered as loaded; the structural error is in the log and the
        // caller decides whether to substitute.
        assert_eq!(asset.as_texture().unwrap().dimensions(), Some((510, 512)));
        assert_eq!(repair.diagnostics().errors().len(), 1);
    }

    #[tokio::test]
    async fn streaming_texture_logs_missing_data_warning() {
        let mut repair = TextureRepair::new();
        repair
            .load_safe(
                "streamed",
                "/assets/streamed.ktx2",
                AssetKind::Texture,
                &StaticLoader(TextureHandle::empty()),
            )
            .await;

        assert!(repair.diagnostics().errors().is_empty());
        assert_eq!(repair.diagnostics().warnings().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_manifest_texture_yields_labeled_placeholder() {
        let manifest = base_manifest();
        let descriptor = manifest
            .items
            .iter()
            .find(|item| item.name == "starduster")
            .expect("starduster in base manifest");

        let mut repair = TextureRepair::new();
        let loader = Ktx2FileLoader::new("/nonexistent");
        let asset = repair
            .load_safe(&descriptor.name, &descriptor.source, descriptor.kind, &loader)
            .await;

        let handle = asset.as_texture().unwrap();
        assert_eq!(handle.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));
        assert_eq!(handle.color_space, ColorSpace::Display);

        let report = repair.report();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.fallbacks_created, ["starduster"]);
        // One load error plus the substitution warning.
        assert_eq!(report.total_issues, 2);
    }

    #[tokio::test]
    async fn model_kind_passes_through_untouched() {
        struct ModelLoader;
        impl ResourceLoader for ModelLoader {
            fn load(&self, _source: &str) -> BoxFuture<'_, Result<LoadedAsset, LoadError>> {
                Box::pin(async {
                    Ok(LoadedAsset::Model(ModelAsset {
                        name: "door".to_string(),
                        meshes: Vec::new(),
                    }))
                })
            }
        }

        let mut repair = TextureRepair::new();
        let asset = repair
            .load_safe("door", "/assets/models/door.glb", AssetKind::Model, &ModelLoader)
            .await;

        assert!(asset.as_model().is_some());
        assert_eq!(repair.report().total_issues, 0);
    }
}
