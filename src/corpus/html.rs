// HTML article extraction: turns a saved news page into (title, body).
//
// The heuristics target the layout of the saved VilaWeb pages: the article
// body lives in a known `<article>` class (or `<main>`), navigation layers
// and page chrome are skipped, and short paragraphs (captions, bylines,
// share widgets) are dropped by length.

use std::path::Path;

use anyhow::{Context, Result};
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::Document;

/// Containers whose text never belongs to the article.
const NOISE_SELECTOR: &str =
    "#navigation-layer, #text_minut, header, footer, aside, nav, script, style";

/// Article containers, tried in order.
const BODY_SELECTORS: [&str; 3] = [
    "article.content-noticia-body",
    "article.article-content-publi",
    "main",
];

/// Paragraphs inside the article container must be longer than this.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Fallback paragraphs taken from anywhere in the page must be longer than this.
const MIN_FALLBACK_PARAGRAPH_CHARS: usize = 100;

const UNTITLED: &str = "Untitled";

/// Compiled selectors, built once per extraction run.
pub struct ArticleExtractor {
    noise: Selector,
    og_title: Selector,
    h1: Selector,
    title: Selector,
    bodies: Vec<Selector>,
    paragraph: Selector,
    whitespace: Regex,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            noise: parse_selector(NOISE_SELECTOR)?,
            og_title: parse_selector(r#"meta[property="og:title"]"#)?,
            h1: parse_selector("h1")?,
            title: parse_selector("title")?,
            bodies: BODY_SELECTORS
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<Vec<_>>>()?,
            paragraph: parse_selector("p")?,
            whitespace: Regex::new(r"\s+").context("Failed to compile whitespace pattern")?,
        })
    }

    /// Extract `(title, body)` from a full HTML page.
    pub fn extract(&self, html: &str) -> (String, String) {
        let page = Html::parse_document(html);
        let title = self.extract_title(&page);

        let mut paragraphs = Vec::new();
        if let Some(container) = self
            .bodies
            .iter()
            .find_map(|sel| page.select(sel).find(|el| !self.in_noise(el)))
        {
            paragraphs = container
                .select(&self.paragraph)
                .filter(|p| !self.in_noise(p))
                .map(|p| self.clean_text(&p))
                .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
        }

        if paragraphs.is_empty() {
            paragraphs = page
                .select(&self.paragraph)
                .filter(|p| !self.in_noise(p))
                .map(|p| self.clean_text(&p))
                .filter(|text| text.chars().count() > MIN_FALLBACK_PARAGRAPH_CHARS)
                .collect();
        }

        (title, paragraphs.join("\n\n"))
    }

    fn extract_title(&self, page: &Html) -> String {
        let og = page
            .select(&self.og_title)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty());
        if let Some(content) = og {
            return content.to_string();
        }

        page.select(&self.h1)
            .chain(page.select(&self.title))
            .map(|el| self.clean_text(&el))
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// True when the element sits inside (or is) a noise container.
    fn in_noise(&self, element: &ElementRef<'_>) -> bool {
        self.noise.matches(element)
            || element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| self.noise.matches(&ancestor))
    }

    fn clean_text(&self, element: &ElementRef<'_>) -> String {
        let raw: String = element.text().collect();
        self.whitespace.replace_all(raw.trim(), " ").into_owned()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("Invalid CSS selector {selector:?}: {e:?}"))
}

/// Extract every `*.html` file in `dir`, in filename order.
///
/// The filename becomes the document id. Files that can't be read are
/// skipped with a warning; the corpus loader downstream enforces that at
/// least one document survives.
pub fn extract_directory(dir: &Path) -> Result<Vec<Document>> {
    let extractor = ArticleExtractor::new()?;

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read HTML directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let html = match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable HTML file");
                continue;
            }
        };

        let (title, body) = extractor.extract(&html);
        debug!(file = %id, body_chars = body.chars().count(), "Extracted article");
        documents.push(Document { id, title, body });
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "Aquest és un paràgraf prou llarg per superar el llindar de quaranta caràcters.";

    #[test]
    fn prefers_og_title() {
        let html = r#"<html><head><title>Page</title>
            <meta property="og:title" content="Headline from metadata"></head>
            <body><h1>Visible heading</h1></body></html>"#;
        let (title, _) = ArticleExtractor::new().unwrap().extract(html);
        assert_eq!(title, "Headline from metadata");
    }

    #[test]
    fn falls_back_to_h1_then_untitled() {
        let extractor = ArticleExtractor::new().unwrap();
        let (title, _) = extractor.extract("<html><body><h1> The  heading </h1></body></html>");
        assert_eq!(title, "The heading");

        let (title, _) = extractor.extract("<html><body><p>x</p></body></html>");
        assert_eq!(title, UNTITLED);
    }

    #[test]
    fn keeps_long_paragraphs_from_article_container() {
        let html = format!(
            r#"<html><body>
            <nav><p>{LONG} menu text</p></nav>
            <article class="content-noticia-body">
                <p>Short caption</p>
                <p>{LONG}</p>
                <div id="navigation-layer"><p>{LONG} hidden layer</p></div>
                <p>Second {LONG}</p>
            </article></body></html>"#
        );
        let (_, body) = ArticleExtractor::new().unwrap().extract(&html);
        assert_eq!(body, format!("{LONG}\n\nSecond {LONG}"));
    }

    #[test]
    fn fallback_uses_only_very_long_paragraphs() {
        let very_long = LONG.repeat(2);
        let html = format!("<html><body><div><p>{LONG}</p><p>{very_long}</p></div></body></html>");
        let (_, body) = ArticleExtractor::new().unwrap().extract(&html);
        assert_eq!(body, very_long);
    }

    #[test]
    fn extract_directory_sorts_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.html"), "<h1>B</h1>").unwrap();
        std::fs::write(dir.path().join("a.html"), "<h1>A</h1>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let docs = extract_directory(dir.path()).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.html", "b.html"]);
        assert_eq!(docs[0].title, "A");
    }
}
