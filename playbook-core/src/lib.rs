//! Off-screen rendering of the board: an SVG back-end for the shared paint
//! routine, the app icon, and deterministic PNG output through resvg.

pub mod diagram;
pub mod icon;
pub mod raster;
pub mod svg;

pub use diagram::{backup_to_svg, scene_from_backup};
pub use icon::app_icon_svg;
pub use raster::{
    ExportError, Fonts, encode_png, fonts_from_data, no_fonts, rasterize, svg_to_png, system_fonts,
};
pub use svg::{SvgPainter, build_diagram_svg, build_field_svg};

/// Rendered app icon as PNG bytes.
pub fn app_icon_png(size: u32, maskable: bool, fonts: Fonts) -> Result<Vec<u8>, ExportError> {
    svg_to_png(&app_icon_svg(size, maskable), fonts)
}
