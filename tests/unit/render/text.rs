use super::*;
use crate::foundation::color::Rgba8;

#[test]
fn caption_svg_escapes_and_splits_lines() {
    let t = TextProperties {
        content: "Tom & Jerry\n<3".into(),
        ..Default::default()
    };
    let svg = caption_svg(&t, Canvas::REFERENCE);
    assert!(svg.contains("Tom &amp; Jerry"));
    assert!(svg.contains("&lt;3"));
    assert_eq!(svg.matches("<tspan").count(), 2);
    assert!(svg.contains(r#"viewBox="0 0 1080 1920""#));
}

#[test]
fn caption_svg_reflects_style_flags() {
    let plain = TextProperties {
        shadow: false,
        outline_width: 0.0,
        fill: Rgba8::rgba(255, 0, 0, 128),
        ..Default::default()
    };
    let svg = caption_svg(&plain, Canvas::REFERENCE);
    assert!(!svg.contains("feDropShadow"));
    assert!(!svg.contains("stroke="));
    assert!(svg.contains(r##"fill="#ff0000""##));

    let styled = TextProperties::default();
    let svg = caption_svg(&styled, Canvas::REFERENCE);
    assert!(svg.contains("feDropShadow"));
    assert!(svg.contains(r#"stroke-width="2""#));
    assert!(svg.contains(r#"paint-order="stroke""#));
}

#[test]
fn baseline_sits_below_block_top() {
    let t = TextProperties {
        x: 10.0,
        y: 100.0,
        font_size: 50.0,
        ..Default::default()
    };
    let svg = caption_svg(&t, Canvas::REFERENCE);
    assert!(svg.contains(r#"x="10" y="140""#));
}

#[test]
fn caption_raster_matches_requested_size() {
    let t = TextProperties::default();
    let buf = rasterize_caption(&t, Canvas::REFERENCE, 270, 480).unwrap();
    assert_eq!(buf.len(), 270 * 480 * 4);
}
