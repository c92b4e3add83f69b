//! Allowlists for elements, attributes, inline styles and embedded frames.

use regex::Regex;
use shelf_config::SanitizeConfig;
use std::sync::LazyLock;
use url::Url;

/// Dropped together with everything inside them.
pub const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "noscript", "template", "textarea", "select", "option", "object", "embed",
    "applet", "svg", "math", "head", "title", "form", "button", "link", "meta", "base", "frame",
    "frameset",
];

/// Kept with their (filtered) attributes. Anything else is unwrapped.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "blockquote", "pre", "code", "ul", "ol",
    "li", "strong", "b", "em", "i", "u", "s", "sup", "sub", "small", "mark", "del", "ins", "abbr",
    "cite", "q", "dl", "dt", "dd", "a", "img", "figure", "figcaption", "table", "thead", "tbody",
    "tfoot", "tr", "th", "td", "caption", "div", "span", "section", "iframe", "picture", "source",
    "video", "audio",
];

pub const GLOBAL_ATTRS: &[&str] = &["title", "style"];

/// Per-element attributes beyond [`GLOBAL_ATTRS`]. URL-bearing attributes are
/// handled separately by the sanitizer.
pub fn element_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["name"],
        "img" => &["alt", "width", "height"],
        "iframe" => &["width", "height", "allowfullscreen", "frameborder"],
        "video" => &["controls", "width", "height", "loop", "muted", "playsinline"],
        "audio" => &["controls", "loop", "muted"],
        "source" => &["type", "media", "width", "height"],
        "td" | "th" => &["colspan", "rowspan"],
        "ol" => &["start"],
        _ => &[],
    }
}

static NUMERIC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,5}%?$").expect("valid numeric-attribute regex"));

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(#[0-9a-f]{3}|#[0-9a-f]{6}|rgb\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*\)|rgba\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*(0|1|0?\.\d+)\s*\)|[a-z]+)$",
    )
    .expect("valid color regex")
});

static TEXT_ALIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(left|right|center|justify)$").expect("valid text-align regex")
});

static FONT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(normal|bold|bolder|lighter|[1-9]00)$").expect("valid font-weight regex")
});

static FONT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(normal|italic|oblique)$").expect("valid font-style regex")
});

static TEXT_DECORATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(none|underline|overline|line-through)( (underline|overline|line-through))*$")
        .expect("valid text-decoration regex")
});

fn style_pattern(property: &str) -> Option<&'static Regex> {
    match property {
        "color" | "background-color" => Some(&*COLOR),
        "text-align" => Some(&*TEXT_ALIGN),
        "font-weight" => Some(&*FONT_WEIGHT),
        "font-style" => Some(&*FONT_STYLE),
        "text-decoration" => Some(&*TEXT_DECORATION),
        _ => None,
    }
}

/// Keep only allowlisted declarations; `None` when nothing survives.
pub fn filter_style(style: &str) -> Option<String> {
    let kept: Vec<String> = style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            style_pattern(&prop)
                .filter(|re| re.is_match(value))
                .map(|_| format!("{prop}: {value}"))
        })
        .collect();
    (!kept.is_empty()).then(|| kept.join("; "))
}

pub fn is_numeric_attr(value: &str) -> bool {
    NUMERIC_ATTR.is_match(value.trim())
}

#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    iframe_hosts: Vec<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::from_config(&SanitizeConfig::default())
    }
}

impl SanitizePolicy {
    pub fn new<I, S>(iframe_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            iframe_hosts: iframe_hosts
                .into_iter()
                .map(|h| h.into().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(cfg: &SanitizeConfig) -> Self {
        Self::new(cfg.iframe_hosts.iter().cloned())
    }

    /// Resolved frame URL when `src` points at an allowlisted host.
    pub fn frame_url(&self, src: &str, base: &Url) -> Option<Url> {
        let url = base.join(src.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let host = url.host_str()?.to_ascii_lowercase();
        self.iframe_hosts.iter().any(|h| *h == host).then_some(url)
    }

    pub fn allows_frame(&self, src: &str, base: &Url) -> bool {
        self.frame_url(src, base).is_some()
    }
}
