use super::*;
use crate::foundation::core::Point;

#[test]
fn default_is_identity() {
    assert_eq!(PhotoTransform::default().to_affine(), Affine::IDENTITY);
}

#[test]
fn affine_scales_then_translates() {
    let t = PhotoTransform {
        x: 10.0,
        y: 20.0,
        scale: 2.0,
        rotation: 0.0,
    };
    let p = t.to_affine() * Point::new(5.0, 5.0);
    assert_eq!(p, Point::new(20.0, 30.0));
    assert_eq!(t.scaled_size(100.0, 50.0), Size::new(200.0, 100.0));
}

#[test]
fn rotation_pivots_on_top_left() {
    let t = PhotoTransform {
        x: 100.0,
        y: 100.0,
        scale: 1.0,
        rotation: 90.0,
    };
    let origin = t.to_affine() * Point::new(0.0, 0.0);
    assert!((origin - Point::new(100.0, 100.0)).hypot() < 1e-9);
    let p = t.to_affine() * Point::new(10.0, 0.0);
    assert!((p - Point::new(100.0, 110.0)).hypot() < 1e-9);
}

#[test]
fn translated_keeps_scale_and_rotation() {
    let t = PhotoTransform {
        x: 1.0,
        y: 2.0,
        scale: 0.5,
        rotation: 15.0,
    }
    .translated(Vec2::new(3.0, -2.0));
    assert_eq!((t.x, t.y, t.scale, t.rotation), (4.0, 0.0, 0.5, 15.0));
}

#[test]
fn rotation_defaults_when_missing_from_json() {
    let t: PhotoTransform = serde_json::from_str(r#"{"x":1,"y":2,"scale":3}"#).unwrap();
    assert_eq!(t.rotation, 0.0);
}

#[test]
fn validate_rejects_non_positive_scale_and_nan() {
    assert!(PhotoTransform::default().validate().is_ok());
    let zero = PhotoTransform {
        scale: 0.0,
        ..Default::default()
    };
    assert!(zero.validate().is_err());
    let nan = PhotoTransform {
        rotation: f64::NAN,
        ..Default::default()
    };
    assert!(nan.validate().is_err());
}
