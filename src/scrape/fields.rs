// src/scrape/fields.rs
//
// Attribute-level extraction. Tolerates quoted/unquoted attribute values,
// any attribute order and any tag/attribute case; the alerts markup has
// shipped all of those.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::strip_tags;
use crate::core::sanitize::decode_entities;

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b([^>]*)>").expect("INPUT_TAG regex should compile"));
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("ANCHOR regex should compile")
});
static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("ATTR regex should compile")
});

/// Attribute value by name (case-insensitive), entity-decoded.
pub fn attr(tag_attrs: &str, name: &str) -> Option<String> {
    ATTR.captures_iter(tag_attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .and_then(|c| c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4)))
        .map(|m| decode_entities(m.as_str()))
}

/// Value of the first `<input type=... name=...>` matching both.
pub fn input_value(doc: &str, input_type: &str, name: &str) -> Option<String> {
    INPUT_TAG.captures_iter(doc).find_map(|c| {
        let attrs = &c[1];
        let ty = attr(attrs, "type")?;
        let nm = attr(attrs, "name")?;
        if ty.eq_ignore_ascii_case(input_type) && nm == name {
            Some(attr(attrs, "value").unwrap_or_default())
        } else {
            None
        }
    })
}

/// (href, visible text) for every anchor in `doc`.
pub fn anchors(doc: &str) -> impl Iterator<Item = (String, String)> + '_ {
    ANCHOR.captures_iter(doc).filter_map(|c| {
        let href = attr(&c[1], "href")?;
        let text = decode_entities(&strip_tags(&c[2]));
        Some((href, text))
    })
}
