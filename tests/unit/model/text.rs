use super::*;

#[test]
fn defaults_are_drawable_and_valid() {
    let t = TextProperties::default();
    assert!(t.validate().is_ok());
    assert!(t.is_drawable());
}

#[test]
fn validation_rejects_bad_sizes() {
    let mut t = TextProperties {
        font_size: 0.0,
        ..Default::default()
    };
    assert!(t.validate().is_err());
    t.font_size = 20.0;
    t.outline_width = -1.0;
    assert!(t.validate().is_err());
    t.outline_width = 0.0;
    t.x = f64::NAN;
    assert!(t.validate().is_err());
}

#[test]
fn hidden_or_blank_text_is_not_drawable() {
    let hidden = TextProperties {
        visible: false,
        ..Default::default()
    };
    assert!(!hidden.is_drawable());
    let blank = TextProperties {
        content: "  \n".into(),
        ..Default::default()
    };
    assert!(!blank.is_drawable());
}

#[test]
fn partial_json_fills_defaults() {
    let t: TextProperties =
        serde_json::from_str(r##"{"content":"Hi","fill":"#ff0000","x":10}"##).unwrap();
    assert_eq!(t.content, "Hi");
    assert_eq!(t.fill, Rgba8::rgb(255, 0, 0));
    assert_eq!(t.x, 10.0);
    assert_eq!(t.font_size, TextProperties::default().font_size);
}

#[test]
fn translated_moves_position_only() {
    let t = TextProperties::default().translated(Vec2::new(5.0, -10.0));
    assert_eq!((t.x, t.y), (145.0, 1490.0));
    assert_eq!(t.content, TextProperties::default().content);
}
