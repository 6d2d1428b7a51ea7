use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    foundation::error::{FlowreelError, FlowreelResult},
    render::svg::SvgOpts,
};

/// Rasterize an SVG document into premultiplied RGBA8 of `width x height`.
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> FlowreelResult<Vec<u8>> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| FlowreelError::render(format!("parse snapshot svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FlowreelError::render("failed to allocate snapshot pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

/// Rasterize an SVG document at the canvas size of `opts` and write it as PNG.
pub fn rasterize_png(svg: &str, opts: SvgOpts, out: &Path) -> FlowreelResult<()> {
    let SvgOpts { width, height } = opts;
    let rgba = rasterize_svg(svg, width, height)?;
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    // The snapshot paints an opaque background, so premultiplied and straight alpha agree.
    image::save_buffer_with_format(
        out,
        &rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}
