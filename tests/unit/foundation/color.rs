use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));

    let c: Rgba8 = serde_json::from_value(json!("#FA0")).unwrap();
    assert_eq!(c, Rgba8::rgb(0xff, 0xaa, 0x00));

    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#gg0000").is_err());
}

#[test]
fn parses_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Rgba8::rgb(1, 2, 3));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgba8::rgba(1, 2, 3, 4));
    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn serializes_as_hex_and_drops_opaque_alpha() {
    assert_eq!(serde_json::to_value(Rgba8::WHITE).unwrap(), json!("#ffffff"));
    assert_eq!(
        serde_json::to_value(Rgba8::rgba(16, 32, 48, 64)).unwrap(),
        json!("#10203040")
    );
}

#[test]
fn premultiplied_scales_channels_by_alpha() {
    assert_eq!(Rgba8::rgba(255, 128, 0, 128).premultiplied(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::TRANSPARENT.premultiplied(), [0, 0, 0, 0]);
}

#[test]
fn hex_rgb_drops_alpha() {
    assert_eq!(Rgba8::rgba(255, 0, 16, 128).to_hex_rgb(), "#ff0010");
}
