use std::sync::{Arc, OnceLock};

use crate::foundation::error::{CardError, CardResult};

/// Shared font database with system fonts loaded once per process.
pub(crate) fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}

/// Parse SVG markup, resolving text against `fontdb`.
pub(crate) fn parse_svg(
    markup: &str,
    fontdb: Arc<usvg::fontdb::Database>,
) -> CardResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    usvg::Tree::from_str(markup, &opts).map_err(|e| CardError::render(format!("parse svg: {e}")))
}

/// Rasterize a tree into a `width x height` premultiplied RGBA8 buffer, stretching its viewport.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> CardResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}
