use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};

/// Renders journey markdown to HTML that is safe to inject into the page.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = safe_markdown_to_html("# Hello\n\nI build **things**.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>things</strong>"));
    }

    #[test]
    fn strips_scripts_and_hardens_links() {
        let html = safe_markdown_to_html("<script>alert(1)</script>\n\n[site](https://example.com)");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("<a href=\"https://example.com\""));
        assert!(html.contains("rel=\"nofollow noopener noreferrer\""));
    }
}
