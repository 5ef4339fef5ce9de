use super::*;

#[test]
fn default_params_build_expected_url() {
    let url = shadow_preview_url("demo", "products/chair", ShadowParams::default()).unwrap();
    assert_eq!(
        url,
        concat!(
            "https://res.cloudinary.com/demo/image/upload/",
            "e_dropshadow:azimuth_215;elevation_45;spread_50/products/chair.png",
        )
    );
}

#[test]
fn range_edges_are_accepted() {
    let p = ShadowParams {
        azimuth: 360,
        elevation: 90,
        spread: 0,
    };
    let url = shadow_preview_url("demo", "x", p).unwrap();
    assert!(url.contains("azimuth_360;elevation_90;spread_0"));
}

#[test]
fn out_of_range_params_are_rejected() {
    for p in [
        ShadowParams {
            azimuth: 361,
            ..ShadowParams::default()
        },
        ShadowParams {
            elevation: 91,
            ..ShadowParams::default()
        },
        ShadowParams {
            spread: 101,
            ..ShadowParams::default()
        },
    ] {
        let err = shadow_preview_url("demo", "x", p).unwrap_err();
        assert!(matches!(err, PlinthError::Validation(_)));
    }
}

#[test]
fn bad_identifiers_are_rejected() {
    let p = ShadowParams::default();
    assert!(shadow_preview_url("", "x", p).is_err());
    assert!(shadow_preview_url("de mo", "x", p).is_err());
    assert!(shadow_preview_url("demo", "", p).is_err());
    assert!(shadow_preview_url("demo", "a b", p).is_err());
    assert!(shadow_preview_url("demo", "a?b", p).is_err());
}

#[test]
fn surrounding_slashes_are_trimmed() {
    let url = shadow_preview_url("demo", "/chair/", ShadowParams::default()).unwrap();
    assert!(url.ends_with("/chair.png"));
}
