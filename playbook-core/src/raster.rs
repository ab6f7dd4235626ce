use std::sync::Arc;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {0}x{1} pixmap")]
    Pixmap(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("unreadable backup: {0}")]
    Backup(#[from] pitch_core::StorageError),
    #[error("formation \"{0}\" not found")]
    FormationNotFound(String),
}

pub type Fonts = Arc<usvg::fontdb::Database>;

/// Maps the generic `sans-serif` family to the first loaded face so labels
/// render with whatever font is available.
pub fn prepare_fonts(mut db: usvg::fontdb::Database) -> Fonts {
    let family = db
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
    if let Some(name) = family {
        db.set_sans_serif_family(name);
    } else {
        log::warn!("no font faces loaded; text will be skipped");
    }
    Arc::new(db)
}

/// Fonts installed on the host.
pub fn system_fonts() -> Fonts {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("loaded {} system font faces", db.len());
    prepare_fonts(db)
}

/// Faces from a font file fetched or bundled by the caller.
pub fn fonts_from_data(data: Vec<u8>) -> Fonts {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(data);
    prepare_fonts(db)
}

/// An empty database; text elements are dropped when rendering.
pub fn no_fonts() -> Fonts {
    Arc::new(usvg::fontdb::Database::new())
}

pub fn rasterize(svg: &str, fonts: Fonts) -> Result<tiny_skia::Pixmap, ExportError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = fonts;
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
    let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or(ExportError::Pixmap(w, h))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// RGBA8 PNG with fixed filter and compression, so equal input gives equal
/// bytes.
pub fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(FilterType::NoFilter);
        enc.set_compression(Compression::Default);
        let mut writer = enc.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }
    Ok(buf)
}

pub fn svg_to_png(svg: &str, fonts: Fonts) -> Result<Vec<u8>, ExportError> {
    encode_png(&rasterize(svg, fonts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::app_icon_svg;

    #[test]
    fn icon_rasterizes_to_green_square() {
        let pm = rasterize(&app_icon_svg(64, false), no_fonts()).unwrap();
        assert_eq!((pm.width(), pm.height()), (64, 64));
        assert_eq!(&pm.data()[..4], &[0x4c, 0xaf, 0x50, 0xff]);
    }

    #[test]
    fn png_bytes_are_deterministic() {
        let svg = app_icon_svg(32, true);
        let a = svg_to_png(&svg, no_fonts()).unwrap();
        let b = svg_to_png(&svg, no_fonts()).unwrap();
        assert_eq!(&a[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(a, b);
    }

    #[test]
    fn broken_svg_is_reported() {
        assert!(matches!(rasterize("<svg", no_fonts()), Err(ExportError::Svg(_))));
    }
}
