use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn mask_close(a: &Mask, b: &Mask) -> bool {
    close(a.x, b.x) && close(a.y, b.y) && close(a.width, b.width) && close(a.height, b.height)
}

#[test]
fn square_frame_is_letterboxed_vertically() {
    let p = FramePlacement::new(1000, 1000, Canvas::REFERENCE).unwrap();
    assert!(close(p.scale, 1.08));
    assert!(close(p.offset.x, 0.0));
    assert!(close(p.offset.y, (1920.0 - 1080.0) / 2.0));
    let r = p.frame_rect();
    assert!(close(r.width(), 1080.0));
    assert!(close(r.height(), 1080.0));
}

#[test]
fn wide_frame_is_limited_by_width_and_tall_by_height() {
    let wide = FramePlacement::new(2160, 1000, Canvas::REFERENCE).unwrap();
    assert!(close(wide.scale, 0.5));
    let tall = FramePlacement::new(100, 400, Canvas::REFERENCE).unwrap();
    assert!(close(tall.scale, 4.8));
    assert!(close(tall.offset.x, (1080.0 - 480.0) / 2.0));
    assert!(close(tall.offset.y, 0.0));
}

#[test]
fn mask_round_trips_through_canvas_space() {
    let frames = [(1000u32, 1000u32), (333, 777), (4000, 2250), (1080, 1920)];
    let m = Mask {
        x: 37.5,
        y: 12.25,
        width: 210.0,
        height: 199.0,
    };
    for (w, h) in frames {
        let p = FramePlacement::new(w, h, Canvas::REFERENCE).unwrap();
        let back = p.mask_to_asset(&p.mask_to_canvas(&m));
        assert!(mask_close(&back, &m), "{w}x{h}: {back:?}");
        let pt = Point::new(3.0, 4.0);
        let pt_back = p.point_to_asset(p.point_to_canvas(pt));
        assert!((pt_back - pt).hypot() < 1e-9);
    }
}

#[test]
fn mask_to_canvas_matches_affine() {
    let p = FramePlacement::new(500, 1000, Canvas::REFERENCE).unwrap();
    let m = Mask {
        x: 10.0,
        y: 20.0,
        width: 30.0,
        height: 40.0,
    };
    let c = p.mask_to_canvas(&m);
    let top_left = p.to_affine() * Point::new(m.x, m.y);
    assert!(close(c.x, top_left.x));
    assert!(close(c.y, top_left.y));
}

#[test]
fn display_scale_never_upscales() {
    let d = DisplayMapping::fit(Canvas::REFERENCE, 4000.0, 4000.0).unwrap();
    assert_eq!(d.scale(), 1.0);
    let d = DisplayMapping::fit(Canvas::REFERENCE, 270.0, 1000.0).unwrap();
    assert!(close(d.scale(), 0.25));
    let d = DisplayMapping::fit(Canvas::REFERENCE, 1000.0, 480.0).unwrap();
    assert!(close(d.scale(), 0.25));
    assert!(close(d.display_size().width, 270.0));
    assert!(close(d.display_size().height, 480.0));
}

#[test]
fn zero_display_is_unavailable() {
    let err = DisplayMapping::fit(Canvas::REFERENCE, 0.0, 100.0).unwrap_err();
    assert!(matches!(err, CardError::Render(_)));
}

#[test]
fn drag_delta_divides_by_display_scale() {
    let mut spaces = CoordinateSpaces::new(Canvas::REFERENCE);
    spaces.set_display_size(270.0, 480.0).unwrap();
    let s = spaces.display_scale();
    let (dx, dy) = (13.0, -7.5);
    let d = spaces.drag_to_canvas(Vec2::new(dx, dy));
    assert_eq!(d, Vec2::new(dx / s, dy / s));
    assert!(close(d.x, 52.0));
    assert!(close(d.y, -30.0));
}

#[test]
fn failed_resize_keeps_previous_mapping() {
    let mut spaces = CoordinateSpaces::new(Canvas::REFERENCE);
    spaces.set_display_size(540.0, 960.0).unwrap();
    assert!(spaces.set_display_size(f64::NAN, 10.0).is_err());
    assert!(close(spaces.display_scale(), 0.5));
}

#[test]
fn display_lengths_scale_uniformly() {
    let d = DisplayMapping::fit(Canvas::REFERENCE, 540.0, 960.0).unwrap();
    assert_eq!(d.len_to_display(48.0), 24.0);
    assert_eq!(
        d.rect_to_display(Rect::new(10.0, 20.0, 30.0, 40.0)),
        Rect::new(5.0, 10.0, 15.0, 20.0)
    );
    assert_eq!(d.point_to_canvas(Point::new(5.0, 10.0)), Point::new(10.0, 20.0));
    assert_eq!(d.point_to_display(Point::new(10.0, 20.0)), Point::new(5.0, 10.0));
}

#[test]
fn window_falls_back_per_frame_and_per_canvas() {
    let spaces = CoordinateSpaces::new(Canvas::REFERENCE);
    let none = spaces.window_in_canvas(None).unwrap();
    assert!(mask_close(&none, &Mask::fallback_for(1080, 1920)));

    let frame = FrameWindow {
        width: 1080,
        height: 1920,
        mask: None,
    };
    let unmasked = spaces.window_in_canvas(Some(frame)).unwrap();
    assert!(mask_close(&unmasked, &Mask::fallback_for(1080, 1920)));

    let masked = FrameWindow {
        width: 540,
        height: 960,
        mask: Some(Mask {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
        }),
    };
    let w = spaces.window_in_canvas(Some(masked)).unwrap();
    assert!(mask_close(
        &w,
        &Mask {
            x: 20.0,
            y: 20.0,
            width: 200.0,
            height: 100.0
        }
    ));
    let back = spaces.window_to_asset(540, 960, &w).unwrap();
    assert!(mask_close(&back, &masked.mask.unwrap()));
}
