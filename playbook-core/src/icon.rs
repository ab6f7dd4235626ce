/// App icon background.
pub const ICON_GREEN: &str = "#4CAF50";
pub const ICON_TEXT: &str = "SA";

/// Square app icon: green background with white initials at half the
/// edge length. The maskable variant nudges the text down by 2%.
pub fn app_icon_svg(size: u32, maskable: bool) -> String {
    let s = size as f64;
    let dy = if maskable { (s * 0.02).floor() } else { 0.0 };
    let font = (s * 0.5).floor();
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">\n"
    ));
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{ICON_GREEN}\"/>\n"
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"Arial, Helvetica, sans-serif\" font-size=\"{font}\" fill=\"#ffffff\">{ICON_TEXT}</text>\n",
        s / 2.0,
        s / 2.0 + dy
    ));
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_icon_text_is_half_the_size() {
        let svg = app_icon_svg(192, false);
        assert!(svg.contains("width=\"192\" height=\"192\""));
        assert!(svg.contains("font-size=\"96\""));
        assert!(svg.contains("y=\"96.00\""));
    }

    #[test]
    fn maskable_icon_only_shifts_text() {
        let svg = app_icon_svg(512, true);
        // same glyph size as the plain icon, 10px lower
        assert!(svg.contains("font-size=\"256\""));
        assert!(svg.contains("y=\"266.00\""));
        assert!(app_icon_svg(512, false).contains("font-size=\"256\""));
    }
}
