//! JavaScript evaluated inside the Lens page.
//!
//! Every script the Chrome session runs is built here so the page contract
//! (which selectors, which attributes, what shape comes back) can be read in
//! one place. Selectors are embedded as JSON string literals, never spliced
//! raw, so quotes inside a selector such as `input[text='text']` are safe.
//!
//! All scripts are read-only except [`clear_input`]: the region snapshot
//! collects markup without mutating the live page.

use crate::config::RegionLocator;

/// Encode `s` as a JavaScript string literal.
pub fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// `true` when `selector` matches at least one element.
pub fn element_exists(selector: &str) -> String {
    format!("document.querySelector({}) !== null", js_string(selector))
}

/// Count of `item` matches under the first `container` match, 0 if absent.
pub fn count_within(container: &str, item: &str) -> String {
    format!(
        r#"(() => {{
    const container = document.querySelector({});
    return container ? container.querySelectorAll({}).length : 0;
}})()"#,
        js_string(container),
        js_string(item)
    )
}

/// Empty the input's value and focus it. Returns `false` if it is missing.
pub fn clear_input(selector: &str) -> String {
    format!(
        r#"(() => {{
    const input = document.querySelector({});
    if (!input) return false;
    input.value = '';
    input.focus();
    return true;
}})()"#,
        js_string(selector)
    )
}

/// Collect the region snapshot as a JSON object matching
/// [`crate::session::RegionSnapshot`], or `null` when the container is gone.
///
/// Only direct children matching `kept_item` are reported; the container's
/// own tags are split from a shallow clone so its attributes survive.
pub fn snapshot_region(region: &RegionLocator) -> String {
    format!(
        r#"(() => {{
    const container = document.querySelector({container});
    if (!container) return null;
    const rect = container.getBoundingClientRect();
    const shell = container.cloneNode(false).outerHTML;
    const closeTag = '</' + container.tagName.toLowerCase() + '>';
    const openTag = shell.endsWith(closeTag)
        ? shell.slice(0, shell.length - closeTag.length)
        : shell;
    const items = Array.from(container.children)
        .filter(el => el.matches({kept}))
        .map(el => ({{
            outerHtml: el.outerHTML,
            ariaLabel: el.getAttribute('aria-label'),
        }}));
    return {{
        openTag: openTag,
        closeTag: shell.endsWith(closeTag) ? closeTag : '',
        items: items,
        width: rect.width,
        height: rect.height,
        direction: getComputedStyle(document.body).direction,
        headHtml: document.head ? document.head.innerHTML : '',
    }};
}})()"#,
        container = js_string(&region.container),
        kept = js_string(&region.kept_item),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_quotes_are_escaped() {
        let js = element_exists("input[text='text']");
        assert_eq!(js, r#"document.querySelector("input[text='text']") !== null"#);

        let js = element_exists(r#"a[title="x"]"#);
        assert!(js.contains(r#""a[title=\"x\"]""#), "got: {js}");
    }

    #[test]
    fn count_script_names_both_selectors() {
        let js = count_within(".RTMDre", ".lv6PAb");
        assert!(js.contains(r#"document.querySelector(".RTMDre")"#));
        assert!(js.contains(r#"querySelectorAll(".lv6PAb")"#));
    }

    #[test]
    fn snapshot_script_uses_kept_selector_and_aria_label() {
        let js = snapshot_region(&RegionLocator::default());
        assert!(js.contains(r#"el.matches(".lv6PAb.PyT1Q")"#));
        assert!(js.contains("getAttribute('aria-label')"));
        assert!(js.contains("getComputedStyle(document.body).direction"));
        assert!(!js.contains(".remove()"), "snapshot must not mutate the page");
    }
}
