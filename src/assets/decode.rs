use std::{io::Cursor, sync::Arc};

use crate::{
    assets::store::ImageData,
    foundation::{
        core::Rgba8,
        error::{StageError, StageResult},
    },
};

/// Largest image side the raster surface can sample from.
pub const MAX_IMAGE_SIDE: u32 = u16::MAX as u32;

/// Decode a sprite image of any format `image` recognizes by its magic bytes.
///
/// The pixel size becomes the sprite's natural size, so images the raster
/// surface could never draw are rejected here rather than at render time.
pub fn decode_image(bytes: &[u8]) -> StageResult<ImageData> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| StageError::asset(format!("sniff image format: {e}")))?;
    let Some(format) = reader.format() else {
        return Err(StageError::asset("unrecognized image format"));
    };
    let rgba = reader
        .decode()
        .map_err(|e| StageError::asset(format!("decode {format:?} image: {e}")))?
        .into_rgba8();

    let (width, height) = rgba.dimensions();
    if width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
        return Err(StageError::asset(format!(
            "{format:?} image is {width}x{height}, sides above {MAX_IMAGE_SIDE} cannot be drawn"
        )));
    }

    let mut pixels = rgba.into_raw();
    for px in pixels.chunks_exact_mut(4) {
        let premul = Rgba8::rgba(px[0], px[1], px[2], px[3]).premultiplied();
        px.copy_from_slice(&premul);
    }

    Ok(ImageData {
        width,
        height,
        rgba8_premul: Arc::new(pixels),
    })
}

/// Undo premultiplication so pixels can be written to straight-alpha formats.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
