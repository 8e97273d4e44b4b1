use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn portrait_card_on_a4_is_height_limited_and_centered() {
    let p = place_on_page(1080, 1920, PaperFormat::A4.size_mm(), 10.0).unwrap();
    assert!(approx(p.height_mm, 277.0));
    assert!(approx(p.width_mm, 277.0 * 1080.0 / 1920.0));
    assert!(approx(p.y_mm, 10.0));
    assert!(approx(p.x_mm, (210.0 - p.width_mm) / 2.0));
}

#[test]
fn wide_image_is_width_limited() {
    let p = place_on_page(2000, 500, PaperFormat::A5.size_mm(), 10.0).unwrap();
    assert!(approx(p.width_mm, 128.0));
    assert!(approx(p.height_mm, 32.0));
    assert!(approx(p.x_mm, 10.0));
    assert!(approx(p.y_mm, (210.0 - 32.0) / 2.0));
}

#[test]
fn oversized_margin_is_an_export_error() {
    assert!(matches!(
        place_on_page(10, 10, PaperFormat::A5.size_mm(), 80.0),
        Err(CardError::Export(_))
    ));
}

#[test]
fn paper_names_parse_and_print() {
    for paper in PaperFormat::ALL {
        let parsed: PaperFormat = paper.to_string().parse().unwrap();
        assert_eq!(parsed, paper);
    }
    assert_eq!("LETTER".parse::<PaperFormat>().unwrap(), PaperFormat::Letter);
    assert!("tabloid".parse::<PaperFormat>().is_err());
    assert_eq!(PaperFormat::Legal.size_mm(), (215.9, 355.6));
}

#[test]
fn pdf_bytes_have_pdf_header() {
    let frame = FrameRGBA {
        width: 9,
        height: 16,
        data: [255, 0, 0, 255].repeat(9 * 16),
        premultiplied: true,
    };
    let pdf = encode_pdf(&frame, PaperFormat::A4, 10.0, Rgba8::WHITE, "card").unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}
