use super::*;

#[test]
fn empty_json_is_default() {
    let cfg: EditorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, EditorConfig::default());
    assert_eq!(cfg.canvas, Canvas::REFERENCE);
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_path_reads_partial_file() {
    let path = std::env::temp_dir().join(format!(
        "framecard_cfg_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::write(
        &path,
        r##"{"canvas":{"width":540,"height":960},"export_multiplier":2,"background":"#000"}"##,
    )
    .unwrap();
    let cfg = EditorConfig::from_path(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(cfg.canvas, Canvas::new(540, 960).unwrap());
    assert_eq!(cfg.export_canvas().unwrap(), Canvas::new(1080, 1920).unwrap());
    assert_eq!(cfg.background, Rgba8::BLACK);
    assert_eq!(cfg.jpeg_quality, 92);
}

#[test]
fn validate_rejects_bad_values() {
    let bad = [
        EditorConfig {
            export_multiplier: 0,
            ..Default::default()
        },
        EditorConfig {
            jpeg_quality: 0,
            ..Default::default()
        },
        EditorConfig {
            pdf_margin_mm: -1.0,
            ..Default::default()
        },
        EditorConfig {
            display: Some(DisplaySize {
                width: 0.0,
                height: 100.0,
            }),
            ..Default::default()
        },
        EditorConfig {
            canvas: Canvas {
                width: 0,
                height: 10,
            },
            ..Default::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn overrides_apply_and_ignore_garbage() {
    let cfg = EditorConfig::default().with_overrides(|k| match k {
        ENV_STORE_DIR => Some("/tmp/cards".into()),
        ENV_EXPORT_MULTIPLIER => Some("3".into()),
        ENV_PERSIST_DEBOUNCE_MS => Some("soon".into()),
        _ => None,
    });
    assert_eq!(cfg.store_dir, Some(PathBuf::from("/tmp/cards")));
    assert_eq!(cfg.export_multiplier, 3);
    assert_eq!(cfg.persist_debounce_ms, 500);

    let cfg = EditorConfig::default().with_overrides(|k| match k {
        ENV_EXPORT_MULTIPLIER => Some("0".into()),
        _ => None,
    });
    assert_eq!(cfg.export_multiplier, 1);
}
