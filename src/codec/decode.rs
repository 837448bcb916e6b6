use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use image::{DynamicImage, ExtendedColorType, ImageDecoder as _, ImageReader};

use crate::foundation::error::{SeqError, SeqResult};

/// A decoded image together with the color layout stored in the file.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Pixels after orientation, expanded to a standard color type.
    pub image: DynamicImage,
    /// Color layout as stored in the file, before palette or transparency expansion.
    pub source_color: ExtendedColorType,
}

impl DecodedImage {
    /// Whether the file stores an explicit alpha channel.
    ///
    /// Palette images report `false` even when a transparency table makes the
    /// expanded pixels carry alpha.
    pub fn source_has_alpha(&self) -> bool {
        color_has_alpha_channel(self.source_color)
    }
}

fn color_has_alpha_channel(color: ExtendedColorType) -> bool {
    use ExtendedColorType as C;
    matches!(
        color,
        C::A8
            | C::La1
            | C::La2
            | C::La4
            | C::La8
            | C::La16
            | C::Rgba1
            | C::Rgba2
            | C::Rgba4
            | C::Rgba8
            | C::Rgba16
            | C::Bgra8
            | C::Rgba32F
    )
}

/// Decode the image at `path` and apply its embedded EXIF orientation.
pub fn open_oriented(path: &Path) -> SeqResult<DecodedImage> {
    let file = File::open(path).map_err(|e| SeqError::io(path, e))?;
    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| SeqError::io(path, e))?;
    decode_reader(reader)
        .map_err(|e| SeqError::codec(format!("decode image '{}': {e}", path.display())))
}

fn decode_reader<R: BufRead + Seek>(reader: ImageReader<R>) -> image::ImageResult<DecodedImage> {
    let mut decoder = reader.into_decoder()?;
    let source_color = decoder.original_color_type();
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(DecodedImage {
        image,
        source_color,
    })
}

/// Keyword/value pairs stored in the `tEXt`, `zTXt` and `iTXt` chunks of a PNG file.
///
/// Only chunks preceding the image data are reported. Entries are grouped by chunk type
/// (`tEXt`, then `zTXt`, then `iTXt`), each group in file order; the interleaving of
/// different chunk types in the file is not preserved.
pub fn read_png_text(path: &Path) -> SeqResult<Vec<(String, String)>> {
    let file = File::open(path).map_err(|e| SeqError::io(path, e))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_ignore_text_chunk(false);
    let reader = decoder
        .read_info()
        .map_err(|e| SeqError::codec(format!("read png header '{}': {e}", path.display())))?;
    let info = reader.info();

    let mut out = Vec::new();
    for chunk in &info.uncompressed_latin1_text {
        out.push((chunk.keyword.clone(), chunk.text.clone()));
    }
    for chunk in &info.compressed_latin1_text {
        let text = chunk
            .get_text()
            .map_err(|e| SeqError::codec(format!("zTXt '{}': {e}", chunk.keyword)))?;
        out.push((chunk.keyword.clone(), text));
    }
    for chunk in &info.utf8_text {
        let text = chunk
            .get_text()
            .map_err(|e| SeqError::codec(format!("iTXt '{}': {e}", chunk.keyword)))?;
        out.push((chunk.keyword.clone(), text));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decode.rs"]
mod tests;
