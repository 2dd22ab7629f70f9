//! Texture remediation.
//!
//! Block-compressed GPU formats constrain texture dimensions to multiples of
//! 4, and content exported for the scene does not always honor that. This
//! module sits between the loaders and the renderer: every handle that
//! leaves it either carries GPU-valid parameters or is a clearly labeled
//! placeholder. Failures are contained here and turned into diagnostics, not
//! propagated into the render loop.

use std::collections::HashMap;
use std::mem;

use tracing::{info, warn};

use atelier_core::{Color, ColorSpace};

use crate::diagnostics::{DiagnosticLog, DiagnosticReport, DiagnosticSink};
use crate::error::FixError;
use crate::fallback::{generate_placeholder, FallbackRegistry};
use crate::loader::LoadedAsset;
use crate::texture::{bytes_per_pixel, ChannelType, FilterMode, PixelFormat, TextureHandle, WrapMode};

/// Block edge the compressed format requires dimensions to be multiples of.
pub const BLOCK_EDGE: u32 = 4;

/// Default fill for generated placeholders (mid gray).
pub const FALLBACK_COLOR: u32 = 0x808080;

/// Maps an asset name to the color space its payload should be tagged with.
pub type ColorSpaceClassifier = fn(&str) -> ColorSpace;

/// Default classifier: data maps (normal, roughness, metalness) are linear,
/// everything else is display.
///
/// The asset name is the only signal the manifest carries, so an asset that
/// breaks the naming convention is tagged display; install a different
/// classifier with [`TextureRepair::with_classifier`] when the convention
/// does not hold.
pub fn default_color_space_for(name: &str) -> ColorSpace {
    let lower = name.to_ascii_lowercase();
    if lower.contains("normal") || lower.contains("roughness") || lower.contains("metalness") {
        ColorSpace::Linear
    } else {
        ColorSpace::Display
    }
}

/// Outcome of a batch repair pass.
#[derive(Debug, Default)]
pub struct FixSummary {
    /// Assets whose handle now carries valid parameters (including those
    /// that were replaced by a placeholder).
    pub fixed: Vec<String>,
    /// Assets whose repair was refused; these were removed from the batch.
    pub failed: Vec<(String, FixError)>,
}

/// Validates and repairs texture handles, generating labeled placeholders
/// when a handle cannot be made renderable.
pub struct TextureRepair {
    diagnostics: DiagnosticLog,
    fallbacks: FallbackRegistry,
    classifier: ColorSpaceClassifier,
}

impl TextureRepair {
    pub fn new() -> Self {
        Self {
            diagnostics: DiagnosticLog::new(),
            fallbacks: FallbackRegistry::default(),
            classifier: default_color_space_for,
        }
    }

    /// Construct with a custom diagnostic sink instead of the tracing one.
    pub fn with_sink(sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            diagnostics: DiagnosticLog::with_sink(sink),
            ..Self::new()
        }
    }

    /// Replace the name-based color-space classifier.
    pub fn with_classifier(mut self, classifier: ColorSpaceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Check that a handle's dimensions satisfy the 4x4 block constraint.
    ///
    /// A handle without a payload gets a warning rather than an error: that
    /// is an expected transient state during streaming loads, softer than
    /// wrong-size data. Either way the handle is not yet renderable and
    /// `false` is returned.
    pub fn validate_dimensions(&mut self, handle: &TextureHandle, name: &str) -> bool {
        let Some((width, height)) = handle.dimensions() else {
            self.diagnostics
                .log_warning("MissingData", format!("no image payload for texture '{name}'"));
            return false;
        };

        if width % BLOCK_EDGE != 0 || height % BLOCK_EDGE != 0 {
            self.diagnostics.log_error(
                "InvalidDimensions",
                format!(
                    "'{name}' is {width}x{height}; block compression requires \
                     multiple-of-{BLOCK_EDGE} dimensions"
                ),
            );
            return false;
        }

        true
    }

    /// Retag a handle with the canonical (format, channel, color space)
    /// triple and mark it for re-upload.
    ///
    /// Uncompressed RGB payloads are expanded to RGBA in place; compressed
    /// payloads cannot be retagged, so only the color-space tag applies to
    /// them. A payload whose byte length contradicts its declared dimensions
    /// is refused and reported, leaving the handle untouched.
    pub fn fix_format(
        &mut self,
        handle: &mut TextureHandle,
        color_space: ColorSpace,
    ) -> Result<(), FixError> {
        if let (Some(image), Some(bpp)) = (
            &handle.image,
            bytes_per_pixel(handle.format, handle.channel),
        ) {
            let expected = image.width as usize * image.height as usize * bpp;
            if image.pixels.len() != expected {
                let err = FixError::PayloadMismatch {
                    width: image.width,
                    height: image.height,
                    format: handle.format,
                    expected,
                    actual: image.pixels.len(),
                };
                self.diagnostics.log_error("FormatFix", err.to_string());
                return Err(err);
            }
        }

        match handle.format {
            PixelFormat::Rgb8 => {
                if let Some(image) = handle.image.as_mut() {
                    let mut rgba = Vec::with_capacity(image.pixels.len() / 3 * 4);
                    for chunk in image.pixels.chunks(3) {
                        rgba.extend_from_slice(chunk);
                        rgba.push(255);
                    }
                    image.pixels = rgba;
                }
                handle.format = PixelFormat::Rgba8;
                handle.channel = ChannelType::UnsignedByte;
            }
            PixelFormat::Rgba8 => {
                handle.channel = ChannelType::UnsignedByte;
            }
            PixelFormat::BlockCompressed => {}
        }

        handle.color_space = color_space;
        handle.needs_upload = true;
        Ok(())
    }

    /// Generate a placeholder for `name` with the default gray fill.
    pub fn create_fallback(&mut self, name: &str) -> TextureHandle {
        self.create_fallback_with(name, Color::from_hex(FALLBACK_COLOR))
    }

    /// Generate a placeholder for `name`, register it, and warn.
    ///
    /// This is the terminal every failure path converges on. Calling it
    /// again for the same name regenerates and overwrites the registry
    /// entry, warning each time.
    pub fn create_fallback_with(&mut self, name: &str, color: Color) -> TextureHandle {
        let handle = generate_placeholder(name, color);
        self.fallbacks.insert(name, handle.clone());
        self.diagnostics
            .log_warning("Fallback", format!("created placeholder texture for '{name}'"));
        handle
    }

    /// Bring an already-loaded handle into a renderable state.
    ///
    /// An absent handle or one whose format cannot be fixed is replaced by a
    /// placeholder. A handle with a zero dimension is refused outright
    /// (`FixError::Degenerate`) rather than substituted.
    pub fn fix_existing(
        &mut self,
        handle: Option<TextureHandle>,
        name: &str,
        color_space: ColorSpace,
    ) -> Result<TextureHandle, FixError> {
        let Some(mut handle) = handle else {
            self.diagnostics
                .log_error("MissingTexture", format!("texture '{name}' is absent"));
            return Ok(self.create_fallback(name));
        };

        if let Some((width, height)) = handle.dimensions() {
            if width == 0 || height == 0 {
                return Err(FixError::Degenerate {
                    name: name.to_string(),
                    width,
                    height,
                });
            }
        }

        if self.fix_format(&mut handle, color_space).is_err() {
            // Already reported by fix_format.
            return Ok(self.create_fallback(name));
        }

        handle.generate_mipmaps = true;
        handle.min_filter = FilterMode::LinearMipmapLinear;
        handle.mag_filter = FilterMode::Linear;
        handle.wrap_s = WrapMode::ClampToEdge;
        handle.wrap_t = WrapMode::ClampToEdge;
        Ok(handle)
    }

    /// Repair every texture in a name-keyed batch.
    ///
    /// Model entries pass through untouched. The color space for each
    /// texture comes from the installed classifier. A refused entry is
    /// removed from the batch and collected in `failed`; it does not abort
    /// the rest of the pass.
    pub fn fix_all(&mut self, assets: &mut HashMap<String, LoadedAsset>) -> FixSummary {
        let mut summary = FixSummary::default();

        let mut names: Vec<String> = assets.keys().cloned().collect();
        names.sort();

        for name in names {
            let Some(LoadedAsset::Texture(handle)) = assets.get_mut(&name) else {
                continue;
            };
            let color_space = (self.classifier)(&name);
            let taken = mem::take(handle);

            match self.fix_existing(Some(taken), &name, color_space) {
                Ok(fixed) => {
                    if let Some(LoadedAsset::Texture(slot)) = assets.get_mut(&name) {
                        *slot = fixed;
                    }
                    summary.fixed.push(name);
                }
                Err(err) => {
                    assets.remove(&name);
                    summary.failed.push((name, err));
                }
            }
        }

        info!("fixed {} texture assets", summary.fixed.len());
        if !summary.failed.is_empty() {
            warn!("refused to fix {} texture assets", summary.failed.len());
        }
        summary
    }

    /// Snapshot of accumulated diagnostics and substitutions.
    pub fn report(&self) -> DiagnosticReport {
        let errors = self.diagnostics.errors().to_vec();
        let warnings = self.diagnostics.warnings().to_vec();
        let total_issues = errors.len() + warnings.len();
        DiagnosticReport {
            errors,
            warnings,
            fallbacks_created: self.fallbacks.names(),
            total_issues,
        }
    }

    /// Render the grouped human-readable report through tracing.
    pub fn print_report(&self) {
        let report = self.report();
        info!(
            "texture report: {} errors, {} warnings, {} placeholders",
            report.errors.len(),
            report.warnings.len(),
            report.fallbacks_created.len()
        );
        for record in &report.errors {
            info!("  error [{}] {}", record.category, record.message);
        }
        for record in &report.warnings {
            info!("  warning [{}] {}", record.category, record.message);
        }
        if !report.fallbacks_created.is_empty() {
            info!("  placeholders: {}", report.fallbacks_created.join(", "));
        }
    }

    /// Drop accumulated diagnostics. Registered placeholders are kept so the
    /// report still enumerates prior substitutions.
    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    /// Full reset: diagnostics and the placeholder registry.
    pub fn reset(&mut self) {
        self.diagnostics.clear();
        self.fallbacks.clear();
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn fallbacks(&self) -> &FallbackRegistry {
        &self.fallbacks
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut DiagnosticLog {
        &mut self.diagnostics
    }
}

impl Default for TextureRepair {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FALLBACK_EDGE;
    use crate::texture::ImageData;

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

    #[test]
    fn misaligned_dimensions_rejected_with_one_error() {
        let mut repair = TextureRepair::new();
        let handle = rgba_handle(510, 512);

        assert!(!repair.validate_dimensions(&handle, "baked"));
        assert_eq!(repair.diagnostics().errors().len(), 1);
        assert!(repair.diagnostics().warnings().is_empty());
    }

    #[test]
    fn missing_payload_is_a_warning_not_an_error() {
        let mut repair = TextureRepair::new();

        assert!(!repair.validate_dimensions(&TextureHandle::empty(), "baked"));
        assert!(repair.diagnostics().errors().is_empty());
        assert_eq!(repair.diagnostics().warnings().len(), 1);
    }

    #[test]
    fn aligned_texture_passes_without_records() {
        let mut repair = TextureRepair::new();

        assert!(repair.validate_dimensions(&rgba_handle(512, 512), "baked"));
        assert!(repair.diagnostics().errors().is_empty());
        assert!(repair.diagnostics().warnings().is_empty());
    }

    #[test]
    fn fallback_is_block_aligned_and_registered() {
        let mut repair = TextureRepair::new();
        let handle = repair.create_fallback("starduster");

        assert_eq!(handle.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));
        assert_eq!(repair.diagnostics().warnings().len(), 1);
        assert!(repair.fallbacks().get("starduster").is_some());
    }

    #[test]
    fn regenerating_a_fallback_overwrites_and_warns_again() {
        let mut repair = TextureRepair::new();
        repair.create_fallback("starduster");
        repair.create_fallback("starduster");

        assert_eq!(repair.diagnostics().warnings().len(), 2);
        assert_eq!(repair.fallbacks().len(), 1);
    }

    #[test]
    fn rgb_payload_expanded_to_rgba() {
        let mut repair = TextureRepair::new();
        let mut handle = TextureHandle::from_image(
            ImageData {
                width: 4,
                height: 4,
                pixels: vec![7; 48],
            },
            PixelFormat::Rgb8,
        );

        repair
            .fix_format(&mut handle, ColorSpace::Display)
            .unwrap();
        assert_eq!(handle.format, PixelFormat::Rgba8);
        let image = handle.image.as_ref().unwrap();
        assert_eq!(image.pixels.len(), 64);
        assert_eq!(&image.pixels[0..4], &[7, 7, 7, 255]);
        assert!(handle.needs_upload);
    }

    #[test]
    fn payload_mismatch_reported_and_handle_untouched() {
        let mut repair = TextureRepair::new();
        let mut handle = rgba_handle(8, 8);
        handle.image.as_mut().unwrap().pixels.truncate(100);

        let err = repair
            .fix_format(&mut handle, ColorSpace::Display)
            .unwrap_err();
        assert!(matches!(err, FixError::PayloadMismatch { actual: 100, .. }));
        assert_eq!(repair.diagnostics().errors().len(), 1);
        assert!(!handle.needs_upload);
    }

    #[test]
    fn fix_existing_forces_sampler_state() {
        let mut repair = TextureRepair::new();
        let fixed = repair
            .fix_existing(Some(rgba_handle(512, 512)), "baked", ColorSpace::Display)
            .unwrap();

        assert!(fixed.generate_mipmaps);
        assert_eq!(fixed.min_filter, FilterMode::LinearMipmapLinear);
        assert_eq!(fixed.mag_filter, FilterMode::Linear);
        assert_eq!(fixed.wrap_s, WrapMode::ClampToEdge);
        assert_eq!(fixed.wrap_t, WrapMode::ClampToEdge);
    }

    #[test]
    fn fix_existing_substitutes_for_absent_handle() {
        let mut repair = TextureRepair::new();
        let fixed = repair
            .fix_existing(None, "ghost", ColorSpace::Display)
            .unwrap();

        assert_eq!(fixed.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));
        assert!(repair.fallbacks().get("ghost").is_some());
    }

    #[test]
    fn fix_existing_substitutes_on_broken_payload() {
        let mut repair = TextureRepair::new();
        let mut handle = rgba_handle(8, 8);
        handle.image.as_mut().unwrap().pixels.truncate(100);

        let fixed = repair
            .fix_existing(Some(handle), "torn", ColorSpace::Display)
            .unwrap();
        assert_eq!(fixed.dimensions(), Some((FALLBACK_EDGE, FALLBACK_EDGE)));
        assert_eq!(repair.fallbacks().names(), ["torn"]);
    }

    #[test]
    fn classifier_routes_data_maps_to_linear() {
        let mut repair = TextureRepair::new();
        let mut assets = HashMap::new();
        assets.insert(
            "wall_normal".to_string(),
            LoadedAsset::Texture(rgba_handle(512, 512)),
        );
        assets.insert(
            "wall_diffuse".to_string(),
            LoadedAsset::Texture(rgba_handle(512, 512)),
        );

        let summary = repair.fix_all(&mut assets);
        assert_eq!(summary.fixed.len(), 2);

        let Some(LoadedAsset::Texture(normal)) = assets.get("wall_normal") else {
            panic!("wall_normal missing");
        };
        let Some(LoadedAsset::Texture(diffuse)) = assets.get("wall_diffuse") else {
            panic!("wall_diffuse missing");
        };
        assert_eq!(normal.color_space, ColorSpace::Linear);
        assert_eq!(diffuse.color_space, ColorSpace::Display);
    }

    #[test]
    fn degenerate_entry_is_isolated_not_fatal() {
        let mut repair = TextureRepair::new();
        let mut assets = HashMap::new();
        assets.insert(
            "broken".to_string(),
            LoadedAsset::Texture(rgba_handle(0, 512)),
        );
        assets.insert(
            "healthy".to_string(),
            LoadedAsset::Texture(rgba_handle(512, 512)),
        );

        let summary = repair.fix_all(&mut assets);
        assert_eq!(summary.fixed, ["healthy"]);
        assert_eq!(summary.failed.len(), 1);
        let (name, err) = &summary.failed[0];
        assert_eq!(name, "broken");
        assert!(err.to_string().contains("degenerate"));
        assert!(!assets.contains_key("broken"));
    }

    #[test]
    fn clearing_diagnostics_keeps_the_registry() {
        let mut repair = TextureRepair::new();
        repair.create_fallback("starduster");
        repair.clear_diagnostics();

        let report = repair.report();
        assert_eq!(report.total_issues, 0);
        assert_eq!(report.fallbacks_created, ["starduster"]);
    }

    #[test]
    fn custom_classifier_wins() {
        fn always_linear(_: &str) -> ColorSpace {
            ColorSpace::Linear
        }

        let mut repair = TextureRepair::new().with_classifier(always_linear);
        let mut assets = HashMap::new();
        assets.insert(
            "plain".to_string(),
            LoadedAsset::Texture(rgba_handle(512, 512)),
        );
        repair.fix_all(&mut assets);

        let Some(LoadedAsset::Texture(plain)) = assets.get("plain") else {
            panic!("plain missing");
        };
        assert_eq!(plain.color_space, ColorSpace::Linear);
    }
}
