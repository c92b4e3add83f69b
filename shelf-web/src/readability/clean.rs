//! Builds the filtered working copy the scorer runs over.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use url::Url;

use crate::dom::Dom;
use crate::sanitize::SanitizePolicy;

/// Never content: dropped together with their subtrees.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "button", "input",
    "select", "textarea", "object", "embed", "applet", "svg", "canvas", "template", "link", "meta",
    "dialog",
];

/// Exempt from class/id based unlikely-candidate removal.
const ALWAYS_CONSIDERED: &[&str] = &[
    "html", "body", "a", "article", "main", "table", "thead", "tbody", "tfoot", "tr", "td", "th",
];

static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote")
        .expect("valid unlikely-candidates regex")
});

static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow")
        .expect("valid maybe-candidate regex")
});

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|;)\s*(display\s*:\s*none|visibility\s*:\s*hidden)")
        .expect("valid hidden-style regex")
});

const UNLIKELY_ROLES: &[&str] = &[
    "menu",
    "menubar",
    "complementary",
    "navigation",
    "alert",
    "alertdialog",
    "dialog",
];

fn is_hidden(el: ElementRef<'_>) -> bool {
    let v = el.value();
    v.attr("hidden").is_some()
        || v.attr("aria-hidden").is_some_and(|a| a.trim() == "true")
        || v.attr("style").is_some_and(|s| HIDDEN_STYLE.is_match(s))
}

fn is_unlikely(el: ElementRef<'_>) -> bool {
    let v = el.value();
    if ALWAYS_CONSIDERED.contains(&v.name()) {
        return false;
    }
    if v
        .attr("role")
        .is_some_and(|r| UNLIKELY_ROLES.contains(&r.trim().to_ascii_lowercase().as_str()))
    {
        return true;
    }
    let match_string = format!(
        "{} {}",
        v.attr("class").unwrap_or_default(),
        v.attr("id").unwrap_or_default()
    );
    UNLIKELY_CANDIDATES.is_match(&match_string) && !MAYBE_CANDIDATE.is_match(&match_string)
}

/// Whether `el` survives into the working copy.
pub fn keep_element(el: ElementRef<'_>, base: &Url, policy: &SanitizePolicy) -> bool {
    let name = el.value().name();
    if NON_CONTENT_TAGS.contains(&name) {
        return false;
    }
    if name == "iframe" {
        return el
            .value()
            .attr("src")
            .is_some_and(|src| policy.allows_frame(src, base));
    }
    !is_hidden(el) && !is_unlikely(el)
}

/// Working copy of `root` with boilerplate removed.
pub fn working_copy(root: ElementRef<'_>, base: &Url, policy: &SanitizePolicy) -> Dom {
    Dom::from_element(root, |el| keep_element(el, base, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn body_text(html: &str) -> String {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("body").unwrap();
        let body = doc.select(&sel).next().unwrap();
        let base = Url::parse("https://example.com/").unwrap();
        let dom = working_copy(body, &base, &SanitizePolicy::default());
        dom.normalized_text(Dom::ROOT)
    }

    #[test]
    fn drops_chrome_and_scripts() {
        let text = body_text(
            "<body><header>Site</header><nav>Menu</nav><p>Story</p>\
             <script>track()</script><footer>(c)</footer><aside>More</aside></body>",
        );
        assert_eq!(text, "Story");
    }

    #[test]
    fn drops_hidden_elements() {
        let text = body_text(
            r#"<body><p hidden>a</p><p aria-hidden="true">b</p>
            <p style="color:red; display: none">c</p><p>shown</p></body>"#,
        );
        assert_eq!(text, "shown");
    }

    #[test]
    fn unlikely_classes_unless_maybe_candidate() {
        let text = body_text(
            r#"<body><div class="sidebar">side</div><div id="comments">c</div>
            <div class="sidebar-content">kept</div><div role="navigation">n</div></body>"#,
        );
        assert_eq!(text, "kept");
    }

    #[test]
    fn iframes_follow_host_allowlist() {
        let text = body_text(
            r#"<body><iframe src="https://evil.example/x">a</iframe>
            <iframe src="https://www.youtube.com/embed/1">b</iframe></body>"#,
        );
        assert!(!text.contains('a'));
        assert!(text.contains('b'));
    }
}
