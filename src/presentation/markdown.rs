use pulldown_cmark::{html, Event, Options, Parser};

/// Render a release body to HTML. Raw HTML in the source is shown as text.
pub fn render(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic() {
        let out = render("# Title\n\n- one\n- **two**\n");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<li><strong>two</strong></li>"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_inline_html_escaped() {
        let out = render("hi <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_html_block_escaped() {
        let out = render("<div onclick=\"x()\">boom</div>\n");
        assert!(!out.contains("<div"));
        assert!(out.contains("&lt;div"));
    }
}
