use super::*;
use crate::assets::decode::ImagePayload;
use crate::assets::registry::{PhotoAsset, Upload};
use crate::foundation::core::Point;
use crate::model::text::TextProperties;

fn png(w: u32, h: u32) -> Vec<u8> {
    crate::export::image::encode_png(w, h, &[50, 60, 70, 255].repeat((w * h) as usize)).unwrap()
}

#[test]
fn empty_project_only_draws_caption() {
    let editor = Editor::new(Canvas::REFERENCE);
    let scene = Compositor::new().build_scene(&editor).unwrap();
    assert_eq!(scene.canvas, Canvas::REFERENCE);
    assert!(matches!(scene.layers.as_slice(), [Layer::Text(_)]));
}

#[test]
fn layers_are_frame_photo_text_in_canvas_space() {
    let mut editor = Editor::new(Canvas::REFERENCE);
    let frame = editor.ingest_frames([Upload::new("f.png", png(540, 960))]).added[0].clone();
    let photo = editor.ingest_photos([Upload::new("p.png", png(300, 200))]).added[0].clone();
    editor.select_frame(Some(frame)).unwrap();
    editor.select_photo(Some(photo)).unwrap();

    let scene = Compositor::new().build_scene(&editor).unwrap();
    let [Layer::Image(f), Layer::Image(p), Layer::Text(_)] = scene.layers.as_slice() else {
        panic!("unexpected layers: {:?}", scene.layers.len());
    };
    assert!(f.clip.is_none());
    assert_eq!(f.transform * Point::new(540.0, 960.0), Point::new(1080.0, 1920.0));

    let window = editor.window_in_canvas().unwrap();
    assert_eq!(p.clip, Some(window.to_rect()));
    assert_eq!(p.transform, editor.project().photo_transform.to_affine());
}

#[test]
fn hidden_caption_is_skipped() {
    let mut editor = Editor::new(Canvas::REFERENCE);
    editor
        .set_text_properties(TextProperties {
            visible: false,
            ..Default::default()
        })
        .unwrap();
    let scene = Compositor::new().build_scene(&editor).unwrap();
    assert!(scene.layers.is_empty());
}

#[test]
fn restored_assets_are_decoded_once_and_pruned() {
    let mut editor = Editor::new(Canvas::REFERENCE);
    let photo = editor.ingest_photos([Upload::new("p.png", png(4, 4))]).added[0].clone();
    let record = editor.photos().get(&photo).unwrap().clone();

    // A restored editor has no decoded pixels cached.
    let mut restored = Editor::new(Canvas::REFERENCE);
    restored.add_photo(record);
    restored.select_photo(Some(photo.clone())).unwrap();

    let mut c = Compositor::new();
    c.build_scene(&restored).unwrap();
    assert_eq!(c.cached_images(), 1);
    c.build_scene(&restored).unwrap();
    assert_eq!(c.cached_images(), 1);

    restored.remove_photo(&photo).unwrap();
    c.build_scene(&restored).unwrap();
    assert_eq!(c.cached_images(), 0);
}

#[test]
fn replaced_asset_is_decoded_again() {
    let mut editor = Editor::new(Canvas::REFERENCE);
    let photo = editor.ingest_photos([Upload::new("p.png", png(4, 4))]).added[0].clone();
    let record = editor.photos().get(&photo).unwrap().clone();

    let mut restored = Editor::new(Canvas::REFERENCE);
    restored.add_photo(record.clone());
    restored.select_photo(Some(photo.clone())).unwrap();

    let mut c = Compositor::new();
    let scene = c.build_scene(&restored).unwrap();
    let Some(Layer::Image(first)) = scene.layers.first() else {
        panic!("photo layer missing");
    };
    assert_eq!((first.image.width, first.image.height), (4, 4));

    restored.add_photo(PhotoAsset {
        payload: ImagePayload::from_bytes(png(8, 2)).unwrap(),
        width: 8,
        height: 2,
        ..record
    });
    let scene = c.build_scene(&restored).unwrap();
    let Some(Layer::Image(second)) = scene.layers.first() else {
        panic!("photo layer missing");
    };
    assert_eq!((second.image.width, second.image.height), (8, 2));
    assert_eq!(c.cached_images(), 1);
}
