use scraper::{Html, Selector};
use shelf_web::metadata::{MetadataLimits, extract_metadata};
use shelf_web::sanitize::sanitize;
use url::Url;

const BASES: &[&str] = &[
    "https://example.com/",
    "https://example.com/a/b/page.html?x=1#top",
    "http://blog.example.org:8080/2024/05/",
];

const RELATIVE: &[&str] = &[
    "image.png",
    "./dir/image.png",
    "../up/image.png",
    "/root/image.png",
    "//cdn.example.net/image.png",
    "?query=1",
    "image.png#frag",
    "https:foo",
    "https:pic.png",
];

const ABSOLUTE: &[&str] = &[
    "https://other.example.com/x.png",
    "http://other.example.com/a/../b.png?q=%20",
];

fn urls_of(markup: &str) -> Vec<String> {
    let doc = Html::parse_fragment(markup);
    let sel = Selector::parse("a[href], img[src]").unwrap();
    doc.select(&sel)
        .filter_map(|el| el.value().attr("href").or_else(|| el.value().attr("src")))
        .map(str::to_string)
        .collect()
}

#[test]
fn relative_references_become_absolute() {
    for base in BASES {
        let base = Url::parse(base).unwrap();
        for rel in RELATIVE {
            let html = format!(r#"<p><a href="{rel}">link</a><img src="{rel}" alt=""></p>"#);
            let urls = urls_of(&sanitize(&html, &base));
            assert_eq!(urls.len(), 2, "{rel} against {base}");
            for u in urls {
                let parsed = Url::parse(&u).unwrap_or_else(|_| panic!("{u} is not absolute"));
                assert_eq!(parsed, base.join(rel).unwrap());
            }
        }
    }
}

#[test]
fn absolute_references_are_unchanged() {
    let base = Url::parse(BASES[1]).unwrap();
    for abs in ABSOLUTE {
        let html = format!(r#"<a href="{abs}">x</a><img src="{abs}">"#);
        for u in urls_of(&sanitize(&html, &base)) {
            assert_eq!(u, *abs);
        }
    }
}

#[test]
fn disallowed_elements_never_survive() {
    let base = Url::parse(BASES[0]).unwrap();
    let cases = [
        ("<script>alert(1)</script><p>x</p>", "<script"),
        ("<p>x<SCRIPT src=//evil.js></SCRIPT></p>", "<script"),
        ("<object data=x.swf></object><p>x</p>", "<object"),
        ("<embed src=x.swf><p>x</p>", "<embed"),
        ("<style>*{}</style><p>x</p>", "<style"),
        ("<iframe src=https://evil.example/></iframe><p>x</p>", "<iframe"),
        ("<form action=/steal><input name=pw></form><p>x</p>", "<input"),
        ("<svg><a href=javascript:alert(1)>x</a></svg>", "javascript:"),
        ("<math><mi>x</mi></math>", "<math"),
        ("<meta http-equiv=refresh content=0;url=//evil>", "<meta"),
        ("<base href=//evil/>", "<base"),
    ];
    for (input, needle) in cases {
        let out = sanitize(input, &base).to_ascii_lowercase();
        assert!(!out.contains(needle), "{needle} survived in {out}");
    }
}

#[test]
fn disallowed_attributes_never_survive() {
    let base = Url::parse(BASES[0]).unwrap();
    let cases = [
        (r#"<p onclick="x()">x</p>"#, "onclick"),
        (r#"<img src="a.png" onerror="x()">"#, "onerror"),
        (r#"<a href="javascript:alert(1)">x</a>"#, "javascript:"),
        (r#"<a href="vbscript:msgbox(1)">x</a>"#, "vbscript:"),
        (r#"<img src="data:image/svg+xml,<svg onload=x()>">"#, "data:"),
        (r#"<div style="background-image: url(javascript:x)">x</div>"#, "url("),
        (r#"<p class="x" id="y" data-track="1">x</p>"#, "data-track"),
        (r#"<a href="/x" formaction="/y">x</a>"#, "formaction"),
    ];
    for (input, needle) in cases {
        let out = sanitize(input, &base).to_ascii_lowercase();
        assert!(!out.contains(needle), "{needle} survived in {out}");
    }
}

#[test]
fn hostile_nesting_does_not_panic() {
    let base = Url::parse(BASES[0]).unwrap();
    let html = format!("{}payload{}", "<div><span>".repeat(2000), "</span></div>".repeat(2000));
    let out = sanitize(&html, &base);
    assert!(out.contains("payload"));
}

#[test]
fn generic_description_is_used_verbatim_when_alone() {
    let base = Url::parse(BASES[0]).unwrap();
    let doc = Html::parse_document(
        r#"<html><head><meta name="description" content="Only the generic one."></head></html>"#,
    );
    let meta = extract_metadata(&doc, &base, MetadataLimits::default());
    assert_eq!(meta.description, "Only the generic one.");

    let long = "word ".repeat(200);
    let doc = Html::parse_document(&format!(
        r#"<html><head><meta name="description" content="{long}"></head></html>"#
    ));
    let meta = extract_metadata(&doc, &base, MetadataLimits::default());
    assert_eq!(meta.description, long.trim().chars().take(500).collect::<String>());
}
