use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn fade_starts_at_opacity_and_reaches_zero_at_falloff() {
    let fade = VerticalFade {
        opacity: 0.5,
        falloff: 0.5,
    };
    let h = 100;
    let top = fade.factor_at(0, h);
    assert!(top > 0.49 && top <= 0.5);
    assert!(fade.factor_at(25, h) < top);
    assert_eq!(fade.factor_at(50, h), 0.0);
    assert_eq!(fade.factor_at(99, h), 0.0);
}

#[test]
fn fade_is_monotonic_non_increasing() {
    let fade = VerticalFade {
        opacity: 0.8,
        falloff: 1.0,
    };
    let mut prev = f32::INFINITY;
    for row in 0..64 {
        let f = fade.factor_at(row, 64);
        assert!(f <= prev);
        prev = f;
    }
}

#[test]
fn zero_falloff_hides_everything() {
    let fade = VerticalFade {
        opacity: 1.0,
        falloff: 0.0,
    };
    assert_eq!(fade.factor_at(0, 10), 0.0);
}
