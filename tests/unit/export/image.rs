use super::*;

fn frame(premul: [u8; 4], w: u32, h: u32) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: premul.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn png_round_trips_through_decoder() {
    let f = frame([100, 50, 0, 255], 3, 2);
    let png = frame_to_png(&f).unwrap();
    let decoded = crate::assets::decode::decode_image(&png).unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(&decoded.rgba8[..4], &[100, 50, 0, 255]);
}

#[test]
fn png_is_straight_alpha() {
    let f = frame([64, 0, 0, 128], 1, 1);
    let rgba = straight_rgba8(&f);
    assert_eq!(rgba[3], 128);
    assert!((i32::from(rgba[0]) - 128).abs() <= 1);
}

#[test]
fn flatten_composites_over_matte() {
    let f = frame([0, 0, 0, 0], 1, 1);
    assert_eq!(flatten_rgb8(&f, Rgba8::WHITE), vec![255, 255, 255]);
    let f = frame([10, 20, 30, 255], 1, 1);
    assert_eq!(flatten_rgb8(&f, Rgba8::WHITE), vec![10, 20, 30]);
}

#[test]
fn jpeg_has_expected_dimensions() {
    let f = frame([200, 10, 10, 255], 16, 8);
    let jpg = frame_to_jpeg(&f, 90, Rgba8::WHITE).unwrap();
    assert_eq!(crate::assets::decode::sniff_mime(&jpg).unwrap(), "image/jpeg");
    let decoded = crate::assets::decode::decode_image(&jpg).unwrap();
    assert_eq!((decoded.width, decoded.height), (16, 8));
}

#[test]
fn encode_png_rejects_short_buffer() {
    assert!(matches!(encode_png(2, 2, &[0; 4]), Err(CardError::Export(_))));
}
