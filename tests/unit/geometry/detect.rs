use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(width, height, image::Rgba(px))
}

fn punch(img: &mut image::RgbaImage, x: u32, y: u32, w: u32, h: u32, px: [u8; 4]) {
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, image::Rgba(px));
        }
    }
}

#[test]
fn opaque_mid_gray_falls_back_to_default_rect() {
    let img = solid(400, 600, [128, 128, 128, 255]);
    let det = detect_mask(&img);
    assert_eq!(det.source, MaskSource::Fallback);
    assert_eq!(det.mask, Mask::fallback_for(400, 600));
}

#[test]
fn transparent_square_is_padded_by_five() {
    let mut img = solid(400, 400, [90, 20, 40, 255]);
    punch(&mut img, 100, 100, 200, 200, [0, 0, 0, 0]);

    let det = detect_mask(&img);
    assert_eq!(det.source, MaskSource::Detected);
    assert_eq!(
        det.mask,
        Mask {
            x: 95.0,
            y: 95.0,
            width: 210.0,
            height: 210.0
        }
    );
}

#[test]
fn near_white_placeholder_counts_as_window() {
    let mut img = solid(300, 300, [30, 60, 90, 255]);
    punch(&mut img, 50, 80, 120, 100, [250, 250, 250, 255]);

    let det = detect_mask(&img);
    assert_eq!(det.source, MaskSource::Detected);
    assert_eq!(
        det.mask,
        Mask {
            x: 45.0,
            y: 75.0,
            width: 130.0,
            height: 110.0
        }
    );
}

#[test]
fn padding_is_clamped_to_image_bounds() {
    let mut img = solid(200, 200, [10, 10, 10, 255]);
    punch(&mut img, 0, 120, 200, 80, [0, 0, 0, 0]);

    let det = detect_mask(&img);
    assert_eq!(
        det.mask,
        Mask {
            x: 0.0,
            y: 115.0,
            width: 200.0,
            height: 85.0
        }
    );
}

#[test]
fn small_regions_are_discarded() {
    let mut img = solid(400, 400, [128, 128, 128, 255]);
    punch(&mut img, 10, 10, 49, 200, [0, 0, 0, 0]);
    let det = detect_mask(&img);
    assert_eq!(det.source, MaskSource::Fallback);
}

#[test]
fn semi_transparent_gray_is_not_a_window() {
    assert!(!is_window_pixel([255, 255, 255, 128]));
    assert!(!is_window_pixel([240, 255, 255, 255]));
    assert!(is_window_pixel([0, 0, 0, 9]));
    assert!(is_window_pixel([241, 241, 241, 241]));
}

#[test]
fn mismatched_buffer_is_inconclusive() {
    let det = detect_mask_rgba8(&[0u8; 12], 2, 2);
    assert_eq!(det.source, MaskSource::Fallback);
}

#[test]
fn detection_is_deterministic() {
    let mut img = solid(128, 128, [200, 0, 0, 255]);
    punch(&mut img, 20, 30, 60, 70, [0, 0, 0, 0]);
    assert_eq!(detect_mask(&img), detect_mask(&img));
}
