use super::*;
use crate::assets::registry::AssetId;
use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Arc<DecodedImage> {
    Arc::new(DecodedImage {
        width: w,
        height: h,
        rgba8: Arc::new(px.repeat((w * h) as usize)),
    })
}

fn image_layer(image: Arc<DecodedImage>, transform: Affine, clip: Option<Rect>) -> Layer {
    Layer::Image(ImageLayer {
        asset: AssetId::new("test"),
        image,
        transform,
        clip,
    })
}

#[test]
fn clear_color_fills_empty_scene() {
    let mut b = CpuBackend::new(RenderSettings {
        clear: Some(Rgba8::rgb(10, 20, 30)),
    });
    let scene = Scene {
        canvas: Canvas::new(8, 8).unwrap(),
        layers: Vec::new(),
    };
    let f = b.render_scene(&scene, 4, 4).unwrap();
    assert_eq!(f.pixel(3, 3), Some([10, 20, 30, 255]));
    assert!(f.premultiplied);
}

#[test]
fn image_layer_is_scaled_to_output() {
    let mut b = CpuBackend::new(RenderSettings::default());
    let scene = Scene {
        canvas: Canvas::new(10, 10).unwrap(),
        layers: vec![image_layer(
            solid(5, 10, [255, 0, 0, 255]),
            Affine::IDENTITY,
            None,
        )],
    };
    let f = b.render_scene(&scene, 20, 20).unwrap();
    assert_eq!(f.pixel(4, 10), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(15, 10), Some([0, 0, 0, 0]));
}

#[test]
fn clip_limits_layer_to_rect() {
    let mut b = CpuBackend::new(RenderSettings {
        clear: Some(Rgba8::WHITE),
    });
    let scene = Scene {
        canvas: Canvas::new(20, 20).unwrap(),
        layers: vec![image_layer(
            solid(20, 20, [0, 0, 255, 255]),
            Affine::IDENTITY,
            Some(Rect::new(5.0, 5.0, 15.0, 15.0)),
        )],
    };
    let f = b.render_scene(&scene, 20, 20).unwrap();
    assert_eq!(f.pixel(10, 10), Some([0, 0, 255, 255]));
    assert_eq!(f.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(f.pixel(17, 10), Some([255, 255, 255, 255]));
}

#[test]
fn zero_or_oversized_targets_are_render_errors() {
    let mut b = CpuBackend::new(RenderSettings::default());
    let scene = Scene {
        canvas: Canvas::new(8, 8).unwrap(),
        layers: Vec::new(),
    };
    assert!(matches!(b.render_scene(&scene, 0, 4), Err(CardError::Render(_))));
    assert!(matches!(
        b.render_scene(&scene, 70_000, 4),
        Err(CardError::Render(_))
    ));
}

#[test]
fn over_operator_blends_premultiplied() {
    let mut dst = vec![0, 0, 200, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst[3], 255);
    assert_eq!(dst[0], 128);
    assert!((i32::from(dst[2]) - 100).abs() <= 1);
    assert!(premul_over_in_place(&mut dst, &[0; 8]).is_err());
}

#[test]
fn clip_coverage_is_fractional_at_edges() {
    let mut px = [200u8, 200, 200, 200].repeat(4);
    clip_rect_in_place(&mut px, 4, 1, Rect::new(0.5, 0.0, 2.0, 1.0));
    assert!((i32::from(px[3]) - 100).abs() <= 1);
    assert_eq!(px[7], 200);
    assert_eq!(px[11], 0);
}
