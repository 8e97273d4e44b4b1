//! Single-page document export.

use crate::foundation::color::Rgba8;
use crate::foundation::error::{CardError, CardResult};
use crate::render::backend::FrameRGBA;

const MM_PER_INCH: f32 = 25.4;

/// Named paper sizes, portrait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    /// 210 x 297 mm.
    #[default]
    A4,
    /// 148 x 210 mm.
    A5,
    /// 8.5 x 11 in.
    Letter,
    /// 8.5 x 14 in.
    Legal,
}

impl PaperFormat {
    /// Every supported format.
    pub const ALL: [PaperFormat; 4] = [Self::A4, Self::A5, Self::Letter, Self::Legal];

    /// `(width, height)` in millimetres.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
        }
    }
}

impl std::str::FromStr for PaperFormat {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => Err(CardError::validation(format!(
                "unknown paper format \"{other}\" (expected a4, a5, letter or legal)"
            ))),
        }
    }
}

impl std::fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::A4 => "a4",
            Self::A5 => "a5",
            Self::Letter => "letter",
            Self::Legal => "legal",
        })
    }
}

/// Where the card image lands on the page, in millimetres from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PagePlacement {
    /// Left edge.
    pub x_mm: f32,
    /// Top edge.
    pub y_mm: f32,
    /// Drawn width.
    pub width_mm: f32,
    /// Drawn height.
    pub height_mm: f32,
}

/// Fit an image inside the page minus `margin_mm` on every side, centered, preserving aspect.
///
/// Same decision as the photo `fit` policy: a relatively wider image is limited by width,
/// otherwise by height.
pub fn place_on_page(
    image_width: u32,
    image_height: u32,
    page_mm: (f32, f32),
    margin_mm: f32,
) -> CardResult<PagePlacement> {
    if image_width == 0 || image_height == 0 {
        return Err(CardError::export("image has zero size"));
    }
    let (page_w, page_h) = page_mm;
    let avail_w = page_w - 2.0 * margin_mm;
    let avail_h = page_h - 2.0 * margin_mm;
    if !(avail_w > 0.0 && avail_h > 0.0) {
        return Err(CardError::export(format!(
            "margin {margin_mm}mm leaves no room on a {page_w}x{page_h}mm page"
        )));
    }

    let image_aspect = image_width as f32 / image_height as f32;
    let avail_aspect = avail_w / avail_h;
    let (width_mm, height_mm) = if image_aspect > avail_aspect {
        (avail_w, avail_w / image_aspect)
    } else {
        (avail_h * image_aspect, avail_h)
    };
    Ok(PagePlacement {
        x_mm: (page_w - width_mm) / 2.0,
        y_mm: (page_h - height_mm) / 2.0,
        width_mm,
        height_mm,
    })
}

/// Encode a rendered card as a one-page PDF, flattened onto `matte`.
pub fn encode_pdf(
    frame: &FrameRGBA,
    paper: PaperFormat,
    margin_mm: f32,
    matte: Rgba8,
    title: &str,
) -> CardResult<Vec<u8>> {
    use printpdf::{Image, ImageTransform, Mm, PdfDocument};

    let (page_w, page_h) = paper.size_mm();
    let place = place_on_page(frame.width, frame.height, (page_w, page_h), margin_mm)?;

    let rgb = crate::export::image::flatten_rgb8(frame, matte);
    let buffer = printpdf::image_crate::RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| CardError::export("rgb buffer length does not match dimensions"))?;
    let dynamic = printpdf::image_crate::DynamicImage::ImageRgb8(buffer);

    let (doc, page, layer) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Layer 1");
    let current_layer = doc.get_page(page).get_layer(layer);
    let pdf_image = Image::from_dynamic_image(&dynamic);
    // PDF origin is bottom-left.
    let transform = ImageTransform {
        translate_x: Some(Mm(place.x_mm)),
        translate_y: Some(Mm(page_h - place.y_mm - place.height_mm)),
        rotate: None,
        scale_x: Some(1.0),
        scale_y: Some(1.0),
        dpi: Some(frame.width as f32 * MM_PER_INCH / place.width_mm),
    };
    pdf_image.add_to_layer(current_layer, transform);

    let mut out = Vec::new();
    {
        let mut writer = std::io::BufWriter::new(&mut out);
        doc.save(&mut writer)
            .map_err(|e| CardError::export(format!("failed to write pdf: {e}")))?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/document.rs"]
mod tests;
