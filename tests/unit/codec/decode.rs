use std::path::PathBuf;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "frameseq_decode_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// Big-endian TIFF header with a single IFD0 entry: Orientation (0x0112) = 6 (rotate 90 cw).
const EXIF_ROTATE_90: [u8; 26] = [
    0x4d, 0x4d, 0x00, 0x2a, 0x00, 0x00, 0x00, 0x08, 0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

fn write_png_with_exif(path: &Path, width: u32, height: u32, rgb: &[u8]) {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_chunk(png::chunk::ChunkType(*b"eXIf"), &EXIF_ROTATE_90)
            .unwrap();
        writer.write_image_data(rgb).unwrap();
        writer.finish().unwrap();
    }
    std::fs::write(path, buf).unwrap();
}

#[test]
fn open_oriented_applies_exif_rotation() {
    let dir = temp_dir("exif");
    let path = dir.join("rotated.png");
    // 2x1: red on the left, blue on the right.
    write_png_with_exif(&path, 2, 1, &[255, 0, 0, 0, 0, 255]);

    let img = open_oriented(&path).unwrap().image;
    assert_eq!((img.width(), img.height()), (1, 2));
    let rgb = img.to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(rgb.get_pixel(0, 1).0, [0, 0, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn open_oriented_plain_png_keeps_layout() {
    let dir = temp_dir("plain");
    let path = dir.join("plain.png");
    image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6])
        .unwrap()
        .save(&path)
        .unwrap();

    let decoded = open_oriented(&path).unwrap();
    assert_eq!((decoded.image.width(), decoded.image.height()), (2, 1));
    assert!(!decoded.image.color().has_alpha());
    assert!(!decoded.source_has_alpha());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn palette_with_transparency_is_not_an_alpha_source() {
    let dir = temp_dir("palette");
    let path = dir.join("indexed.png");
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, 1, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![10u8, 20, 30]);
        encoder.set_trns(vec![0u8]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0]).unwrap();
        writer.finish().unwrap();
    }
    std::fs::write(&path, buf).unwrap();

    let decoded = open_oriented(&path).unwrap();
    assert!(decoded.image.color().has_alpha());
    assert!(!decoded.source_has_alpha());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn gray_alpha_is_an_alpha_source() {
    let dir = temp_dir("la");
    let path = dir.join("la.png");
    image::GrayAlphaImage::from_raw(1, 1, vec![7, 51])
        .unwrap()
        .save(&path)
        .unwrap();

    let decoded = open_oriented(&path).unwrap();
    assert_eq!(decoded.source_color, ExtendedColorType::La8);
    assert!(decoded.source_has_alpha());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn open_oriented_missing_file_is_not_found() {
    let dir = temp_dir("missing");
    let err = open_oriented(&dir.join("nope.png")).unwrap_err();
    assert!(err.is_not_found());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn open_oriented_garbage_is_codec_error() {
    let dir = temp_dir("garbage");
    let path = dir.join("garbage.png");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let err = open_oriented(&path).unwrap_err();
    assert!(matches!(err, SeqError::Codec(_)), "{err}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn read_png_text_on_plain_png_is_empty() {
    let dir = temp_dir("notext");
    let path = dir.join("plain.png");
    image::RgbImage::new(1, 1).save(&path).unwrap();

    assert!(read_png_text(&path).unwrap().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}
