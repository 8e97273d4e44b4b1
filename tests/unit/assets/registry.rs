use std::io::Cursor;

use super::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn photo(name: &str) -> PhotoAsset {
    PhotoAsset::from_upload(name, png(4, 3)).unwrap().0
}

#[test]
fn upload_decodes_dimensions_and_generates_kind_prefixed_ids() {
    let (frame, decoded) = FrameAsset::from_upload("f.png", png(8, 6)).unwrap();
    assert_eq!((frame.width, frame.height), (8, 6));
    assert_eq!((decoded.width, decoded.height), (8, 6));
    assert!(frame.id.as_str().starts_with("frame-"));
    assert!(frame.mask.is_none());

    let a = photo("a.png");
    let b = photo("a.png");
    assert!(a.id.as_str().starts_with("photo-"));
    assert_ne!(a.id, b.id);
}

#[test]
fn get_returns_none_for_missing_reference() {
    let mut reg = AssetRegistry::new();
    let p = photo("p.png");
    let id = p.id.clone();
    reg.insert(p);
    assert!(reg.get(&id).is_some());
    assert!(reg.get(&AssetId::new("photo-missing")).is_none());
    assert!(reg.require(&AssetId::new("photo-missing")).is_err());
}

#[test]
fn insert_replaces_and_prepend_moves_to_front() {
    let mut reg = AssetRegistry::new();
    let a = photo("a.png");
    let b = photo("b.png");
    reg.insert(a.clone());
    reg.insert(b.clone());
    assert_eq!(reg.ids(), vec![a.id.clone(), b.id.clone()]);

    let renamed = PhotoAsset {
        name: "renamed".into(),
        ..a.clone()
    };
    assert!(reg.insert(renamed).is_some());
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get(&a.id).unwrap().name, "renamed");

    reg.prepend(b.clone());
    assert_eq!(reg.ids(), vec![b.id.clone(), a.id.clone()]);
    assert!(reg.remove(&b.id).is_some());
    assert!(reg.remove(&b.id).is_none());
}

#[test]
fn from_vec_drops_duplicate_ids() {
    let a = photo("a.png");
    let reg = AssetRegistry::from_vec(vec![a.clone(), a.clone()]);
    assert_eq!(reg.len(), 1);
}

#[test]
fn from_vec_drops_zero_sized_assets() {
    let a = photo("a.png");
    assert_eq!(a.dimensions(), (4, 3));
    let empty = PhotoAsset {
        id: AssetId::new("photo-empty"),
        width: 0,
        ..a.clone()
    };
    let reg = AssetRegistry::from_vec(vec![empty, a.clone()]);
    assert_eq!(reg.ids(), vec![a.id]);
}

#[test]
fn batch_ingest_skips_corrupt_files() {
    let report = ingest_uploads::<PhotoAsset>(vec![
        Upload::new("good.png", png(2, 2)),
        Upload::new("bad.png", b"not an image".to_vec()),
        Upload::new("also-good.png", png(3, 1)),
    ]);
    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "bad.png");
    assert!(matches!(report.rejected[0].1, CardError::Decode(_)));
}

#[test]
fn registry_serializes_as_plain_list() {
    let mut reg = AssetRegistry::new();
    reg.insert(photo("a.png"));
    let v = serde_json::to_value(&reg).unwrap();
    assert!(v.is_array());
    let back: AssetRegistry<PhotoAsset> = serde_json::from_value(v).unwrap();
    assert_eq!(back, reg);
}
