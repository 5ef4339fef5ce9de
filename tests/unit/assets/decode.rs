use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_unreadable() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, PlinthError::Decode(_)));
}

#[test]
fn missing_file_is_unreadable() {
    let err = load_image(Path::new("target/does/not/exist.png")).unwrap_err();
    assert!(matches!(err, PlinthError::Decode(_)));
}

#[test]
fn decode_pair_fails_if_either_side_fails() {
    let ok = png_bytes(2, 3, [1, 2, 3, 255]);
    let (a, b) = decode_pair(&ok, &ok).unwrap();
    assert_eq!((a.width, a.height), (2, 3));
    assert_eq!(a, b);
    assert!(decode_pair(&ok, b"nope").is_err());
    assert!(decode_pair(b"nope", &ok).is_err());
}
