//! Turns an untrusted fragment into self-contained, allowlisted markup.
//!
//! Every `a`/`img`/`iframe` and media URL is resolved against the document
//! URL first,
//! then the fragment is rebuilt from an allowlist: unknown elements are
//! unwrapped (their text survives), dangerous ones are dropped with their
//! content, and attributes are re-emitted only when permitted. Out-of-page
//! links are marked with [`SAFE_LINK_TARGET`]/[`SAFE_LINK_REL`].
//!
//! The sanitizer has no error path; hostile input degrades to stripped or
//! empty output.

pub mod policy;
pub mod urls;

pub use policy::SanitizePolicy;
pub use urls::resolve_url;

use scraper::Html;
use shelf_common::links::{SAFE_LINK_REL, SAFE_LINK_TARGET, is_local_or_script_href};
use shelf_common::text::{escape_attr, escape_html};
use url::Url;

use crate::dom::{Dom, Edge, NodeId, is_void_element};

#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    policy: SanitizePolicy,
}

impl Sanitizer {
    pub fn new(policy: SanitizePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SanitizePolicy {
        &self.policy
    }

    /// Sanitize `fragment`, resolving relative URLs against `base`.
    pub fn sanitize(&self, fragment: &str, base: &Url) -> String {
        let parsed = Html::parse_fragment(fragment);
        let dom = Dom::from_element(parsed.root_element(), |el| {
            let name = el.value().name();
            if policy::DROP_WITH_CONTENT.contains(&name) {
                return false;
            }
            if name == "iframe" {
                return el
                    .value()
                    .attr("src")
                    .is_some_and(|src| self.policy.allows_frame(src, base));
            }
            true
        });

        let mut out = String::with_capacity(fragment.len());
        let mut walk = dom.walk(Dom::ROOT);
        while let Some(edge) = walk.next() {
            match edge {
                Edge::Open(id) => {
                    let tag = dom.tag(id).unwrap_or_default();
                    if !policy::ALLOWED_TAGS.contains(&tag) {
                        continue;
                    }
                    match self.attributes(&dom, id, tag, base) {
                        Some(attrs) => write_open(&mut out, tag, &attrs),
                        // Element without its required URL: drop the subtree.
                        None => walk.skip_subtree(id),
                    }
                }
                Edge::Close(id) => {
                    let tag = dom.tag(id).unwrap_or_default();
                    if policy::ALLOWED_TAGS.contains(&tag) && !is_void_element(tag) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
                Edge::Text(id) => out.push_str(&escape_html(dom.text(id).unwrap_or_default())),
            }
        }
        out
    }

    /// Filtered attributes for an allowlisted element. `None` means the
    /// element cannot be kept at all.
    fn attributes(
        &self,
        dom: &Dom,
        id: NodeId,
        tag: &str,
        base: &Url,
    ) -> Option<Vec<(&'static str, String)>> {
        let mut attrs: Vec<(&'static str, String)> = Vec::new();
        let mut rest: Vec<(&'static str, String)> = Vec::new();

        match tag {
            "a" => {
                if let Some(href) = dom.attr(id, "href").and_then(|h| safe_href(h, base)) {
                    let external = !is_local_or_script_href(&href);
                    attrs.push(("href", href));
                    if external {
                        attrs.push(("target", SAFE_LINK_TARGET.to_string()));
                        attrs.push(("rel", SAFE_LINK_REL.to_string()));
                    }
                }
            }
            "img" => {
                let src = dom
                    .attr(id, "src")
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| dom.attr(id, "data-src"))?;
                attrs.push(("src", http_url(src, base)?));
            }
            "iframe" => {
                let src = dom.attr(id, "src").filter(|s| self.policy.allows_frame(s, base))?;
                attrs.push(("src", resolve_url(base, src)));
            }
            "source" => {
                if let Some(src) = dom.attr(id, "src") {
                    attrs.push(("src", http_url(src, base)?));
                }
                if let Some(srcset) = dom.attr(id, "srcset") {
                    attrs.push(("srcset", http_srcset(srcset, base)?));
                }
                if attrs.is_empty() {
                    return None;
                }
            }
            "video" | "audio" => {
                if let Some(src) = dom.attr(id, "src") {
                    attrs.push(("src", http_url(src, base)?));
                }
                if let Some(poster) = dom.attr(id, "poster").filter(|_| tag == "video") {
                    attrs.push(("poster", http_url(poster, base)?));
                }
            }
            _ => {}
        }

        for (name, value) in dom.attrs(id) {
            let Some(name) = allowed_attr_name(tag, name) else {
                continue;
            };
            let value = match name {
                "style" => match policy::filter_style(value) {
                    Some(style) => style,
                    None => continue,
                },
                "width" | "height" | "colspan" | "rowspan" | "start" | "frameborder" => {
                    if !policy::is_numeric_attr(value) {
                        continue;
                    }
                    value.trim().to_string()
                }
                _ => value.clone(),
            };
            rest.push((name, value));
        }
        rest.sort_by(|a, b| a.0.cmp(b.0));
        attrs.extend(rest);
        Some(attrs)
    }
}

/// The static name of `name` when `tag` may carry it.
fn allowed_attr_name(tag: &str, name: &str) -> Option<&'static str> {
    policy::GLOBAL_ATTRS
        .iter()
        .chain(policy::element_attrs(tag))
        .find(|allowed| **allowed == name)
        .copied()
}

/// Resolved `href`, or `None` when the link target is not safe to keep.
fn safe_href(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with('#') {
        return Some(raw.to_string());
    }
    if is_local_or_script_href(raw) {
        return None;
    }
    let resolved = resolve_url(base, raw);
    match urls::scheme_of(&resolved).as_deref() {
        Some("http" | "https" | "mailto") => Some(resolved),
        _ => None,
    }
}

fn http_url(raw: &str, base: &Url) -> Option<String> {
    let resolved = resolve_url(base, raw);
    match urls::scheme_of(&resolved).as_deref() {
        Some("http" | "https") => Some(resolved),
        _ => None,
    }
}

/// Every candidate of a `srcset` list resolved to http(s); `None` if any is not.
fn http_srcset(raw: &str, base: &Url) -> Option<String> {
    let candidates = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|candidate| {
            let (url, descriptor) = candidate
                .split_once(char::is_whitespace)
                .unwrap_or((candidate, ""));
            let url = http_url(url, base)?;
            let descriptor = descriptor.trim();
            Some(if descriptor.is_empty() {
                url
            } else {
                format!("{url} {descriptor}")
            })
        })
        .collect::<Option<Vec<_>>>()?;
    (!candidates.is_empty()).then(|| candidates.join(", "))
}

fn write_open(out: &mut String, tag: &str, attrs: &[(&str, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');
}

/// [`Sanitizer::sanitize`] with the default policy.
pub fn sanitize(fragment: &str, base: &Url) -> String {
    Sanitizer::default().sanitize(fragment, base)
}
