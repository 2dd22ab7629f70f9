//! Atelier Assets - asset loading and texture remediation
//!
//! Loads the portfolio experience's models and textures, validates texture
//! parameters against the constraints of block-compressed GPU formats, and
//! substitutes labeled placeholders when loading or validation fails, so the
//! render loop never sees a broken handle.

mod diagnostics;
mod error;
mod fallback;
mod ktx2;
mod loader;
mod manifest;
mod model;
mod repair;
mod texture;

pub use diagnostics::{
    DiagnosticLog, DiagnosticRecord, DiagnosticReport, DiagnosticSink, Severity, TracingSink,
};
pub use error::{FixError, LoadError};
pub use fallback::{generate_placeholder, FallbackRegistry, FALLBACK_EDGE};
pub use ktx2::{
    parse_header as parse_ktx2_header, read_texture as read_ktx2_texture, Ktx2Error, Ktx2Header,
    KTX2_IDENTIFIER,
};
pub use loader::{
    BoxFuture, GlbFileLoader, ImageFileLoader, Ktx2FileLoader, LoadedAsset, ResourceLoader,
};
pub use manifest::{base_manifest, AssetDescriptor, AssetGroup};
pub use model::{load_glb, MeshData, ModelAsset, Primitive};
pub use repair::{
    default_color_space_for, ColorSpaceClassifier, FixSummary, TextureRepair, BLOCK_EDGE,
    FALLBACK_COLOR,
};
pub use texture::{ChannelType, FilterMode, ImageData, PixelFormat, TextureHandle, WrapMode};
