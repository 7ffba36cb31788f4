//! Standalone HTML document assembly.
//!
//! The captured container only renders correctly with the page's own
//! stylesheets and at its original size, so the document carries a copy of
//! the page head, the body direction, and a wrapper with the measured
//! width and height.

use serde::{Deserialize, Serialize};

/// Text direction of the captured page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Parse a computed CSS `direction`; anything but `rtl` is left-to-right.
    pub fn from_computed(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("rtl") {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    /// Body declarations replicating this direction.
    pub fn body_style(self) -> &'static str {
        match self {
            TextDirection::Rtl => "direction: rtl; text-align: right;",
            TextDirection::Ltr => "direction: ltr; text-align: left;",
        }
    }
}

/// Measured size of the captured container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

/// Wrap `region_html` in a fixed-size container.
pub fn wrap_region(region_html: &str, geometry: Geometry) -> String {
    format!(
        r#"<div style="width: {}px; height: {}px; position: relative; overflow: hidden; background-color: white; border: 1px solid #ddd;">
{}
</div>"#,
        geometry.width, geometry.height, region_html
    )
}

/// Full standalone document around an already sanitized region.
pub fn standalone_document(
    head_html: &str,
    direction: TextDirection,
    geometry: Geometry,
    region_html: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>{head}</head>
<body style="{dir} margin: 0; padding: 0;">
{wrapper}
</body>
</html>
"#,
        head = head_html,
        dir = direction.body_style(),
        wrapper = wrap_region(region_html, geometry),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parsing() {
        assert_eq!(TextDirection::from_computed("rtl"), TextDirection::Rtl);
        assert_eq!(TextDirection::from_computed(" RTL "), TextDirection::Rtl);
        assert_eq!(TextDirection::from_computed("ltr"), TextDirection::Ltr);
        assert_eq!(TextDirection::from_computed(""), TextDirection::Ltr);
    }

    #[test]
    fn wrapper_uses_whole_pixel_sizes_without_fraction() {
        let html = wrap_region("<p>x</p>", Geometry { width: 300.0, height: 200.0 });
        assert!(html.contains("width: 300px; height: 200px;"), "got: {html}");
    }

    #[test]
    fn wrapper_keeps_fractional_sizes() {
        let html = wrap_region("", Geometry { width: 412.5, height: 99.25 });
        assert!(html.contains("width: 412.5px; height: 99.25px;"));
    }

    #[test]
    fn document_has_head_direction_and_region() {
        let doc = standalone_document(
            "<style>.a{color:red}</style>",
            TextDirection::Rtl,
            Geometry { width: 1.0, height: 2.0 },
            "<div class=\"RTMDre\"></div>",
        );
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<head><style>.a{color:red}</style></head>"));
        assert!(doc.contains(
            r#"<body style="direction: rtl; text-align: right; margin: 0; padding: 0;">"#
        ));
        assert!(doc.contains("<div class=\"RTMDre\"></div>"));
    }
}
