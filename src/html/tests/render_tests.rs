use crate::html::render::{escape, render_document};
use crate::results::ArticleContent;

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn article(author: Option<&str>) -> ArticleContent {
        ArticleContent {
            id: "id-1".to_string(),
            title: "Rust in Production".to_string(),
            url: "https://example.com/rust".to_string(),
            author: author.map(str::to_string),
            slug: "rust-in-production".to_string(),
            content: "<p>Body</p>".to_string(),
        }
    }

    fn select_text(doc: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_document_structure() {
        let article = article(Some("Ferris"));
        let html = render_document(&article, &article.content);
        let doc = Html::parse_document(&html);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(select_text(&doc, "title"), vec!["Rust in Production"]);
        assert_eq!(select_text(&doc, "h1"), vec!["Rust in Production"]);

        let paragraphs = select_text(&doc, "body > p");
        assert_eq!(paragraphs[0], "Author: Ferris");
        assert_eq!(paragraphs[1], "Source: https://example.com/rust");
        assert_eq!(paragraphs[2], "Body");

        let link = Selector::parse("a").unwrap();
        let href = doc.select(&link).next().unwrap().value().attr("href");
        assert_eq!(href, Some("https://example.com/rust"));
    }

    #[test]
    fn test_unknown_author() {
        let article = article(None);
        let html = render_document(&article, &article.content);
        assert!(html.contains("<h1>Rust in Production</h1>"));
        assert!(html.contains("Author: Unknown"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let article = article(Some("Ferris"));
        let first = render_document(&article, "<p>x</p>");
        let second = render_document(&article, "<p>x</p>");
        assert_eq!(first, second);
    }

    #[test]
    fn test_metadata_is_escaped_body_is_not() {
        let mut article = article(Some("A & B"));
        article.title = "<script>alert(1)</script>".to_string();
        let html = render_document(&article, "<em>kept</em>");

        assert!(html.contains("<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1>"));
        assert!(html.contains("Author: A &amp; B"));
        assert!(html.contains("<em>kept</em>"));

        let doc = Html::parse_document(&html);
        assert_eq!(select_text(&doc, "h1"), vec!["<script>alert(1)</script>"]);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>"c"&'d'"#), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
        assert_eq!(escape("plain"), "plain");
    }
}
