use crate::results::ArticleContent;

/// Render a standalone HTML document for `article` around an already rewritten body
///
/// Output depends only on the inputs, so rendering the same article twice
/// yields identical bytes.
pub fn render_document(article: &ArticleContent, body: &str) -> String {
    let title = escape(&article.title);
    let author = escape(article.author_or_unknown());
    let url = escape(&article.url);

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <p>Author: {author}</p>\n\
         <p>Source: <a href=\"{url}\">{url}</a></p>\n\
         <hr>\n\
         {body}\n\
         </body>\n\
         </html>\n"
    )
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
