use std::path::PathBuf;

use super::*;

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("plinth-pipeline-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba(f(x, y)));
    img.save(path).unwrap();
}

fn stage(json: &str) -> Stage {
    Stage::from_json_str(json).unwrap()
}

#[test]
fn render_stage_composites_subject_over_backdrop() {
    let root = temp_root("basic");
    write_png(&root.join("bg.png"), 40, 30, |_, _| [0, 0, 255, 255]);
    write_png(&root.join("subject.png"), 10, 10, |_, _| [255, 0, 0, 255]);

    let s = stage(
        r#"{
            "backdrop": { "path": "bg.png" },
            "shadowed": { "path": "subject.png" },
            "placement": { "x": 0.5, "y": 0.5, "scale": 1.0 }
        }"#,
    );
    let out = render_stage(&s, &root).unwrap();
    assert_eq!((out.frame.width, out.frame.height), (40, 30));
    assert!(out.deskew.is_none());
    assert_eq!(out.layout.shadowed_subject_rect.y, 5);
    assert_eq!(out.frame.pixel(20, 10), Some([255, 0, 0, 255]));
    assert_eq!(out.frame.pixel(1, 1), Some([0, 0, 255, 255]));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn orientation_swaps_subject_axes() {
    let root = temp_root("orient");
    write_png(&root.join("bg.png"), 20, 20, |_, _| [0, 0, 0, 255]);
    write_png(&root.join("subject.png"), 8, 4, |_, _| [255, 255, 255, 255]);

    let s = stage(
        r#"{
            "backdrop": { "path": "bg.png" },
            "shadowed": { "path": "subject.png", "orientation": 6 }
        }"#,
    );
    let prepared = prepare_stage(&s, &root).unwrap();
    assert_eq!((prepared.shadowed.width, prepared.shadowed.height), (4, 8));
    assert_eq!(prepared.clean, prepared.shadowed);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn explicit_canvas_overrides_backdrop_size() {
    let root = temp_root("canvas");
    write_png(&root.join("bg.png"), 20, 20, |_, _| [0, 0, 0, 255]);
    write_png(&root.join("subject.png"), 4, 4, |_, _| [255, 255, 255, 255]);

    let s = stage(
        r#"{
            "canvas": { "width": 64, "height": 48 },
            "backdrop": { "path": "bg.png" },
            "shadowed": { "path": "subject.png" }
        }"#,
    );
    let out = render_stage(&s, &root).unwrap();
    assert_eq!((out.layout.canvas_width, out.layout.canvas_height), (64, 48));
    assert_eq!((out.frame.width, out.frame.height), (64, 48));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn undecodable_input_fails_without_output() {
    let root = temp_root("broken");
    write_png(&root.join("bg.png"), 20, 20, |_, _| [0, 0, 0, 255]);
    std::fs::write(root.join("subject.png"), b"not a png").unwrap();

    let s = stage(
        r#"{
            "backdrop": { "path": "bg.png" },
            "shadowed": { "path": "subject.png" }
        }"#,
    );
    let err = render_stage(&s, &root).unwrap_err();
    assert!(matches!(err, crate::PlinthError::Decode(_)));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn deskew_runs_when_requested() {
    let root = temp_root("deskew");
    write_png(&root.join("bg.png"), 50, 50, |_, _| [0, 0, 0, 255]);
    write_png(&root.join("subject.png"), 200, 200, |x, y| {
        if (40..160).contains(&x) && (40..150).contains(&y) {
            [200, 200, 200, 255]
        } else {
            [0, 0, 0, 0]
        }
    });

    let s = stage(
        r#"{
            "backdrop": { "path": "bg.png" },
            "shadowed": { "path": "subject.png" },
            "deskew": {}
        }"#,
    );
    let out = render_stage(&s, &root).unwrap();
    let d = out.deskew.unwrap();
    assert_eq!(d.outcome, crate::DeskewOutcome::AlreadyStraight);
    assert_eq!(out.layout.shadowed_subject_rect.width, 200);
    let _ = std::fs::remove_dir_all(&root);
}
