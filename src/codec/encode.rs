use crate::{
    foundation::error::{SeqError, SeqResult},
    tensor::Frame8,
};

/// Deflate level used for every written PNG.
pub const PNG_COMPRESS_LEVEL: u8 = 4;

/// One textual metadata entry for a PNG file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngText {
    /// Chunk keyword (1-79 Latin-1 bytes).
    pub keyword: String,
    /// Chunk payload.
    pub text: String,
}

impl PngText {
    /// Build an entry from any string-like keyword and text.
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }

    fn is_latin1(&self) -> bool {
        self.text.chars().all(|c| u32::from(c) <= 0xff)
    }
}

/// Encode `frame` as an 8-bit PNG in memory, embedding `text` before the image data.
///
/// Latin-1 payloads are stored as `tEXt`, anything else as uncompressed `iTXt`.
pub fn encode_png(frame: &Frame8, text: &[PngText]) -> SeqResult<Vec<u8>> {
    let color = match frame.channels {
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => {
            return Err(SeqError::validation(format!(
                "cannot encode {n}-channel frame as png"
            )));
        }
    };

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, frame.width, frame.height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_deflate_compression(png::DeflateCompression::Level(PNG_COMPRESS_LEVEL));
        for entry in text {
            let res = if entry.is_latin1() {
                encoder.add_text_chunk(entry.keyword.clone(), entry.text.clone())
            } else {
                encoder.add_itxt_chunk(entry.keyword.clone(), entry.text.clone())
            };
            res.map_err(|e| SeqError::codec(format!("png text '{}': {e}", entry.keyword)))?;
        }

        let mut writer = encoder
            .write_header()
            .map_err(|e| SeqError::codec(format!("png header: {e}")))?;
        writer
            .write_image_data(&frame.data)
            .map_err(|e| SeqError::codec(format!("png image data: {e}")))?;
        writer
            .finish()
            .map_err(|e| SeqError::codec(format!("png finish: {e}")))?;
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/encode.rs"]
mod tests;
