//! Minimal reader for the KTX2 texture container.
//!
//! Only the identifier, the fixed header, and the level index are
//! interpreted: enough to recover dimensions and hand the renderer the
//! still-compressed level-0 payload. Transcoding the block data is the GPU
//! pipeline's job, not ours.

use crate::texture::{ImageData, PixelFormat, TextureHandle};

/// 12-byte identifier every KTX2 file starts with.
pub const KTX2_IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x32, 0x30, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

// Byte layout: identifier (12), nine u32 header fields (36), index block
// (32), then levelCount * 24 bytes of level index entries.
const HEADER_END: usize = 48;
const LEVEL_INDEX_START: usize = 80;

/// Problems a KTX2 container can have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ktx2Error {
    #[error("not a KTX2 file (bad identifier)")]
    BadIdentifier,

    #[error("container truncated: needed {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("container declares no mip levels")]
    NoLevels,
}

/// The fixed header fields following the identifier.
#[derive(Debug, Clone, Copy)]
pub struct Ktx2Header {
    pub vk_format: u32,
    pub type_size: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub layer_count: u32,
    pub face_count: u32,
    pub level_count: u32,
    pub supercompression_scheme: u32,
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, Ktx2Error> {
    let end = offset + 4;
    let slice = bytes.get(offset..end).ok_or(Ktx2Error::Truncated {
        needed: end,
        actual: bytes.len(),
    })?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

fn read_u64(bytes: &[u8], offset: usize) -> Result<u64, Ktx2Error> {
    let end = offset + 8;
    let slice = bytes.get(offset..end).ok_or(Ktx2Error::Truncated {
        needed: end,
        actual: bytes.len(),
    })?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(slice);
    Ok(u64::from_le_bytes(buf))
}

/// Parse the identifier and fixed header.
pub fn parse_header(bytes: &[u8]) -> Result<Ktx2Header, Ktx2Error> {
    if bytes.len() < KTX2_IDENTIFIER.len() || bytes[..KTX2_IDENTIFIER.len()] != KTX2_IDENTIFIER {
        return Err(Ktx2Error::BadIdentifier);
    }
    if bytes.len() < HEADER_END {
        return Err(Ktx2Error::Truncated {
            needed: HEADER_END,
            actual: bytes.len(),
        });
    }

    Ok(Ktx2Header {
        vk_format: read_u32(bytes, 12)?,
        type_size: read_u32(bytes, 16)?,
        pixel_width: read_u32(bytes, 20)?,
        pixel_height: read_u32(bytes, 24)?,
        pixel_depth: read_u32(bytes, 28)?,
        layer_count: read_u32(bytes, 32)?,
        face_count: read_u32(bytes, 36)?,
        level_count: read_u32(bytes, 40)?,
        supercompression_scheme: read_u32(bytes, 44)?,
    })
}

/// Read a KTX2 container into a block-compressed texture handle carrying the
/// level-0 payload.
pub fn read_texture(bytes: &[u8]) -> Result<TextureHandle, Ktx2Error> {
    let header = parse_header(bytes)?;
    if header.level_count == 0 {
        return Err(Ktx2Error::NoLevels);
    }

    // Level index entry: byteOffset, byteLength, uncompressedByteLength.
    let offset = read_u64(bytes, LEVEL_INDEX_START)? as usize;
    let length = read_u64(bytes, LEVEL_INDEX_START + 8)? as usize;
    let end = offset.saturating_add(length);
    let payload = bytes.get(offset..end).ok_or(Ktx2Error::Truncated {
        needed: end,
        actual: bytes.len(),
    })?;

    Ok(TextureHandle::from_image(
        ImageData {
            width: header.pixel_width,
            height: header.pixel_height,
            pixels: payload.to_vec(),
        },
        PixelFormat::BlockCompressed,
    ))
}
