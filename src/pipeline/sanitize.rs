//! Rebuild the result container from a [`RegionSnapshot`].
//!
//! The output is the container's own tags around only the kept
//! recognized-text children, each followed by a visible label span carrying
//! its `aria-label`. The span is appended as the child's last element, so
//! it renders on top of the (otherwise empty) positioned text box.

use crate::session::{RegionItem, RegionSnapshot};

/// Inline style of the injected label span.
pub const LABEL_STYLE: &str = "color: black; font-size: 14px; position: absolute; left: 0px; \
top: 0px; z-index: 100; background-color: rgba(255, 255, 255, 0.8);";

/// Sanitized container markup for `snapshot`.
pub fn render_region(snapshot: &RegionSnapshot) -> String {
    let mut out = String::with_capacity(
        snapshot.open_tag.len()
            + snapshot.close_tag.len()
            + snapshot
                .items
                .iter()
                .map(|i| i.outer_html.len() + 160)
                .sum::<usize>(),
    );
    out.push_str(&snapshot.open_tag);
    for item in &snapshot.items {
        out.push_str(&labelled_item(item));
    }
    out.push_str(&snapshot.close_tag);
    out
}

/// `item` with its label span inserted before the element's end tag.
pub fn labelled_item(item: &RegionItem) -> String {
    let span = label_span(item.aria_label.as_deref().unwrap_or(""));
    let html = item.outer_html.as_str();
    match html.rfind("</") {
        Some(pos) if html.trim_end().ends_with('>') && pos > 0 => {
            format!("{}{}{}", &html[..pos], span, &html[pos..])
        }
        // Void or self-closing elements cannot hold children; keep the
        // label right after them.
        _ => format!("{html}{span}"),
    }
}

/// The visible label for one recognized-text element.
pub fn label_span(text: &str) -> String {
    format!(
        r#"<span style="{}">{}</span>"#,
        LABEL_STYLE,
        escape_text(text)
    )
}

/// Escape text content the way `outerHTML` serialises it.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(html: &str, label: Option<&str>) -> RegionItem {
        RegionItem {
            outer_html: html.to_string(),
            aria_label: label.map(str::to_string),
        }
    }

    fn snapshot(items: Vec<RegionItem>) -> RegionSnapshot {
        RegionSnapshot {
            open_tag: r#"<div class="RTMDre" jsname="x">"#.into(),
            close_tag: "</div>".into(),
            items,
            width: 10.0,
            height: 10.0,
            direction: "ltr".into(),
            head_html: String::new(),
        }
    }

    #[test]
    fn label_goes_inside_item_before_end_tag() {
        let out = labelled_item(&item(
            r#"<div class="lv6PAb PyT1Q" aria-label="Hi"><i></i></div>"#,
            Some("Hi"),
        ));
        assert!(out.starts_with(r#"<div class="lv6PAb PyT1Q" aria-label="Hi"><i></i><span "#));
        assert!(out.ends_with(">Hi</span></div>"), "got: {out}");
    }

    #[test]
    fn missing_label_gives_empty_span() {
        let out = labelled_item(&item(r#"<div class="lv6PAb PyT1Q"></div>"#, None));
        assert!(out.contains("></span></div>"), "got: {out}");
    }

    #[test]
    fn label_text_is_escaped() {
        let span = label_span("a < b & c");
        assert!(span.contains(">a &lt; b &amp; c</span>"));
    }

    #[test]
    fn region_keeps_container_tags_and_item_order() {
        let out = render_region(&snapshot(vec![
            item(r#"<div class="lv6PAb PyT1Q"><b></b></div>"#, Some("first")),
            item(r#"<div class="lv6PAb PyT1Q"></div>"#, Some("second")),
        ]));
        assert!(out.starts_with(r#"<div class="RTMDre" jsname="x">"#));
        assert!(out.ends_with("</div>"));
        let first = out.find(">first<").unwrap();
        let second = out.find(">second<").unwrap();
        assert!(first < second);
        assert_eq!(out.matches("<span ").count(), 2);
    }

    #[test]
    fn empty_region_is_just_the_container() {
        let out = render_region(&snapshot(vec![]));
        assert_eq!(out, r#"<div class="RTMDre" jsname="x"></div>"#);
    }
}
