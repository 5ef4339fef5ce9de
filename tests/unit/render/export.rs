use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 64, 0, 128],
        premultiplied: true,
    }
}

#[test]
fn png_bytes_decode_back_to_straight_alpha() {
    let bytes = encode_png(&frame()).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 128, 0, 128]);
}

#[test]
fn mismatched_buffer_is_rejected() {
    let mut f = frame();
    f.data.pop();
    assert!(matches!(encode_png(&f), Err(PlinthError::Surface(_))));
}

#[test]
fn save_png_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("plinth-export-{}", std::process::id()));
    let path = dir.join("nested").join("out.png");
    save_png(&frame(), &path).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (2, 1));
    let _ = std::fs::remove_dir_all(&dir);
}
