use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_straight_alpha() {
    let decoded = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(&decoded.rgba8[..4], &[100, 50, 200, 128]);
    assert_eq!(
        &decoded.premultiplied()[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn corrupt_bytes_are_a_decode_error() {
    let err = decode_image(b"\x89PNG\r\n\x1a\nnot really").unwrap_err();
    assert!(matches!(err, CardError::Decode(_)));
    assert!(sniff_mime(b"hello").is_err());
}

#[test]
fn payload_round_trips_through_data_url() {
    let bytes = png_bytes(1, 1, [1, 2, 3, 255]);
    let payload = ImagePayload::from_bytes(bytes.clone()).unwrap();
    assert_eq!(payload.mime(), "image/png");
    let url = payload.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));
    let back = ImagePayload::from_data_url(&url).unwrap();
    assert_eq!(back.bytes(), bytes.as_slice());

    let json = serde_json::to_string(&payload).unwrap();
    let parsed: ImagePayload = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, payload);
}

#[test]
fn malformed_data_urls_are_rejected() {
    assert!(ImagePayload::from_data_url("image/png;base64,AAAA").is_err());
    assert!(ImagePayload::from_data_url("data:image/png,AAAA").is_err());
    assert!(ImagePayload::from_data_url("data:image/png;base64,***").is_err());
}
