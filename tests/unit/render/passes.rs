use super::*;

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl DrawSurface for Recorder {
    fn size(&self) -> (u32, u32) {
        (8, 6)
    }

    fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: PixelRect,
        mirror_y: bool,
        fade: Option<VerticalFade>,
    ) -> PlinthResult<()> {
        self.calls.push(format!(
            "image {}x{} -> {:?} mirror={} fade={}",
            image.width,
            image.height,
            (dest.x, dest.y, dest.width, dest.height),
            mirror_y,
            fade.is_some()
        ));
        Ok(())
    }

    fn blur(&mut self, sigma_px: f32) -> PlinthResult<()> {
        self.calls.push(format!("blur {sigma_px}"));
        Ok(())
    }

    fn readback(&mut self) -> PlinthResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: 8,
            height: 6,
            data: vec![0; 8 * 6 * 4],
            premultiplied: true,
        })
    }
}

fn solid(w: u32, h: u32) -> PreparedImage {
    PreparedImage::from_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

#[test]
fn execute_plan_dispatches_ops_in_order() {
    let backdrop = solid(1, 1);
    let shadowed = solid(2, 2);
    let clean = solid(3, 3);
    let rect = PixelRect {
        x: 1,
        y: 2,
        width: 3,
        height: 4,
    };
    let plan = CompositePlan {
        width: 8,
        height: 6,
        ops: vec![
            DrawOp::Image {
                slot: ImageSlot::Backdrop,
                dest: rect,
                mirror_y: false,
                fade: None,
            },
            DrawOp::Blur { sigma_px: 2.0 },
            DrawOp::Image {
                slot: ImageSlot::Clean,
                dest: rect,
                mirror_y: true,
                fade: Some(VerticalFade {
                    opacity: 0.5,
                    falloff: 1.0,
                }),
            },
            DrawOp::Image {
                slot: ImageSlot::Shadowed,
                dest: rect,
                mirror_y: false,
                fade: None,
            },
        ],
    };

    let mut rec = Recorder::default();
    let inputs = CompositeInputs {
        backdrop: &backdrop,
        shadowed: &shadowed,
        clean: &clean,
    };
    let frame = execute_plan(&mut rec, &plan, inputs).unwrap();
    assert_eq!((frame.width, frame.height), (8, 6));
    assert_eq!(
        rec.calls,
        vec![
            "image 1x1 -> (1, 2, 3, 4) mirror=false fade=false",
            "blur 2",
            "image 3x3 -> (1, 2, 3, 4) mirror=true fade=true",
            "image 2x2 -> (1, 2, 3, 4) mirror=false fade=false",
        ]
    );
}

#[test]
fn execute_plan_rejects_size_mismatch() {
    let img = solid(1, 1);
    let plan = CompositePlan {
        width: 10,
        height: 10,
        ops: vec![],
    };
    let mut rec = Recorder::default();
    let inputs = CompositeInputs {
        backdrop: &img,
        shadowed: &img,
        clean: &img,
    };
    let err = execute_plan(&mut rec, &plan, inputs).unwrap_err();
    assert!(matches!(err, PlinthError::Surface(_)));
    assert!(rec.calls.is_empty());
}

#[test]
fn frame_pixel_and_straight_conversion() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    assert_eq!(frame.pixel(0, 0), Some([64, 0, 0, 128]));
    assert_eq!(frame.pixel(1, 0), None);
    let straight = frame.to_straight_rgba8();
    assert_eq!(straight[3], 128);
    assert!((i32::from(straight[0]) - 127).abs() <= 1);
}
