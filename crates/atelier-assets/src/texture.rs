//! Renderer-agnostic texture handle model.
//!
//! A [`TextureHandle`] owns decoded (or still-compressed) pixel data together
//! with the sampling state the renderer uploads alongside it. The remediation
//! engine mutates this state in place; the renderer consumes the handle once
//! `needs_upload` is set.

use atelier_core::ColorSpace;

/// Pixel format of a texture payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Rgb8,
    /// 4x4 block-compressed payload (KTX2 family). Byte length is not
    /// derivable from width and height alone.
    BlockCompressed,
}

/// Channel data type declared for the GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    UnsignedByte,
    Float,
}

/// Minification/magnification filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// Raw pixel payload with its dimensions.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A loaded texture with the runtime parameters the renderer uploads.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    /// Pixel payload. `None` while a streaming load is still in flight.
    pub image: Option<ImageData>,
    pub format: PixelFormat,
    pub channel: ChannelType,
    pub color_space: ColorSpace,
    pub generate_mipmaps: bool,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    /// Set whenever parameters change so the renderer re-uploads.
    pub needs_upload: bool,
}

impl TextureHandle {
    /// A handle with no payload yet, carrying loader defaults.
    pub fn empty() -> Self {
        Self {
            image: None,
            format: PixelFormat::Rgba8,
            channel: ChannelType::UnsignedByte,
            color_space: ColorSpace::Display,
            generate_mipmaps: false,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            needs_upload: false,
        }
    }

    /// Wrap a decoded payload in a handle with loader defaults.
    pub fn from_image(image: ImageData, format: PixelFormat) -> Self {
        Self {
            image: Some(image),
            format,
            ..Self::empty()
        }
    }

    /// Width and height of the payload, if one has arrived.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|image| (image.width, image.height))
    }

    /// Whether the pixel buffer length is consistent with the declared
    /// dimensions and format. Block-compressed payloads are not checked.
    pub fn payload_consistent(&self) -> bool {
        let Some(image) = &self.image else {
            return true;
        };
        let Some(bpp) = bytes_per_pixel(self.format, self.channel) else {
            return true;
        };
        image.pixels.len() == image.width as usize * image.height as usize * bpp
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bytes per pixel for a (format, channel) pair, or `None` when the payload
/// size is not a per-pixel quantity.
pub(crate) fn bytes_per_pixel(format: PixelFormat, channel: ChannelType) -> Option<usize> {
    let channels = match format {
        PixelFormat::Rgba8 => 4,
        PixelFormat::Rgb8 => 3,
        PixelFormat::BlockCompressed => return None,
    };
    let width = match channel {
        ChannelType::UnsignedByte => 1,
        ChannelType::Float => 4,
    };
    Some(channels * width)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn empty_handle_has_no_dimensions() {
        assert_eq!(TextureHandle::empty().dimensions(), None);
    }

    #[test]
    fn consistent_payload_accepted() {
        assert!(rgba_handle(8, 8).payload_consistent());
    }

    #[test]
    fn truncated_payload_detected() {
        let mut handle = rgba_handle(8, 8);
        handle.image.as_mut().unwrap().pixels.pop();
        assert!(!handle.payload_consistent());
    }

    #[test]
    fn compressed_payload_not_length_checked() {
        let handle = TextureHandle::from_image(
            ImageData {
                width: 8,
                height: 8,
                pixels: vec![0; 13],
            },
            PixelFormat::BlockCompressed,
        );
        assert!(handle.payload_consistent());
    }
}
