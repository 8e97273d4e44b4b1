use std::fmt::Write as _;

use crate::assets::svg_raster::{parse_svg, rasterize_svg_to_premul_rgba8, system_fontdb};
use crate::foundation::core::Canvas;
use crate::foundation::error::CardResult;
use crate::model::text::TextProperties;

/// First baseline below the top of the text block, as a share of the font size.
const ASCENT: f64 = 0.8;
/// Line advance as a share of the font size.
const LINE_HEIGHT: f64 = 1.2;
/// Shadow offset as a share of the font size.
const SHADOW_OFFSET: f64 = 0.04;
/// Shadow blur deviation as a share of the font size.
const SHADOW_BLUR: f64 = 0.06;

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// SVG document for a caption on a `canvas`-sized page.
///
/// All lengths stay in canvas units; whoever rasterizes the document scales them uniformly.
pub fn caption_svg(text: &TextProperties, canvas: Canvas) -> String {
    let size = text.font_size;
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    );
    if text.shadow {
        let _ = write!(
            svg,
            r##"<defs><filter id="caption-shadow" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="{o}" dy="{o}" stdDeviation="{b}" flood-color="#000000" flood-opacity="0.6"/></filter></defs>"##,
            o = size * SHADOW_OFFSET,
            b = size * SHADOW_BLUR,
        );
    }

    let _ = write!(
        svg,
        r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" fill="{fill}" fill-opacity="{fo}""#,
        x = text.x,
        y = text.y + size * ASCENT,
        family = escape_xml(&text.font_family),
        fill = text.fill.to_hex_rgb(),
        fo = text.fill.opacity(),
    );
    if text.outline_width > 0.0 {
        let _ = write!(
            svg,
            r#" stroke="{stroke}" stroke-opacity="{so}" stroke-width="{sw}" stroke-linejoin="round" paint-order="stroke""#,
            stroke = text.outline.to_hex_rgb(),
            so = text.outline.opacity(),
            sw = text.outline_width,
        );
    }
    if text.shadow {
        svg.push_str(r#" filter="url(#caption-shadow)""#);
    }
    svg.push('>');

    for (i, line) in text.content.split('\n').enumerate() {
        let dy = if i == 0 { 0.0 } else { size * LINE_HEIGHT };
        let _ = write!(
            svg,
            r#"<tspan x="{x}" dy="{dy}">{line}</tspan>"#,
            x = text.x,
            line = escape_xml(line.trim_end_matches('\r')),
        );
    }
    svg.push_str("</text></svg>");
    svg
}

/// Rasterize a caption into a premultiplied `width x height` RGBA8 buffer covering the canvas.
pub fn rasterize_caption(
    text: &TextProperties,
    canvas: Canvas,
    width: u32,
    height: u32,
) -> CardResult<Vec<u8>> {
    let markup = caption_svg(text, canvas);
    let tree = parse_svg(&markup, system_fontdb())?;
    rasterize_svg_to_premul_rgba8(&tree, width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
