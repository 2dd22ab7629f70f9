//! Atelier Core - Core types for the Atelier experience
//!
//! This crate provides the foundational types used throughout the pipeline:
//! - Color values and hex conversion
//! - Asset kind tags used by the manifest and loaders
//! - The closed color-space enumeration textures are tagged with

pub mod types;

pub use types::{AssetKind, Color, ColorSpace};
