use super::*;

fn one_px(a: u8) -> PreparedImage {
    PreparedImage::from_straight_rgba8(1, 1, vec![200, 100, 50, a]).unwrap()
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0u8; 15]).is_err());
    assert!(PreparedImage::from_premul(2, 2, vec![0u8; 16]).is_ok());
}

#[test]
fn straight_roundtrip_is_close_for_partial_alpha() {
    let img = one_px(128);
    assert_eq!(img.alpha(), vec![128]);
    let back = img.to_straight_rgba8();
    for (a, b) in back.iter().zip([200u8, 100, 50, 128]) {
        assert!((i32::from(*a) - i32::from(b)).abs() <= 1);
    }
}

#[test]
fn transparent_pixels_zero_color() {
    let img = one_px(0);
    assert_eq!(img.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn session_store_lifecycle() {
    let mut store = SessionAssetStore::new();
    assert!(store.is_empty());
    assert!(store.insert("upload-1", one_px(255)).is_none());
    assert!(store.insert("upload-2", one_px(10)).is_none());
    assert!(store.contains("upload-1"));
    assert_eq!(store.get("upload-2").unwrap().alpha(), vec![10]);
    assert!(store.get("missing").is_err());

    assert!(store.insert("upload-1", one_px(20)).is_some());
    assert_eq!(store.len(), 2);
    assert!(store.remove("upload-2").is_some());
    store.clear();
    assert!(store.is_empty());
}
