use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::Result;

/// Decoded RGBA8 image attached to an entity, identified by content hash.
#[derive(Debug, Clone)]
pub struct TextureRef {
    pub source_hash: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<image::RgbaImage>,
}

impl PartialEq for TextureRef {
    fn eq(&self, other: &Self) -> bool {
        self.source_hash == other.source_hash
    }
}

impl TextureRef {
    /// Decode an encoded image (PNG, JPEG, ...) into a texture reference.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let source_hash = hash_bytes(bytes);
        log::debug!(
            "Decoded texture {}x{} ({})",
            image.width(),
            image.height(),
            &source_hash[..12]
        );
        Ok(Self {
            source_hash,
            width: image.width(),
            height: image.height(),
            pixels: Arc::new(image),
        })
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn decodes_png_dimensions() {
        let bytes = encode_png(3, 2, [255, 0, 0, 255]);
        let texture = TextureRef::decode(&bytes).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.pixels.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(texture.source_hash.len(), 64);
    }

    #[test]
    fn same_bytes_produce_equal_references() {
        let bytes = encode_png(1, 1, [0, 0, 255, 255]);
        let a = TextureRef::decode(&bytes).unwrap();
        let b = TextureRef::decode(&bytes).unwrap();
        assert_eq!(a, b);
        let other = TextureRef::decode(&encode_png(1, 1, [0, 255, 0, 255])).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn garbage_bytes_are_reported() {
        let err = TextureRef::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, EditorError::Texture(_)));
    }
}
