use crate::config::HighlightConfig;

/// Turns a fenced code block into HTML.
///
/// Implementations receive raw code and must escape it themselves.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, code: &str, lang: &str) -> String;
}

/// Escapes code and tags it with the theme and language; colouring is left
/// to the theme's stylesheet.
#[derive(Debug, Clone)]
pub struct PlainHighlighter {
    theme: String,
}

impl PlainHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(config.theme.clone())
    }
}

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> String {
        format!(
            "<pre class=\"highlight\" data-theme=\"{}\"><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(&self.theme),
            sanitize_lang(lang),
            escape_html(code)
        )
    }
}

/// Info strings are user text; keep only characters valid in a class name.
fn sanitize_lang(lang: &str) -> String {
    let cleaned: String = lang
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#'))
        .collect();
    if cleaned.is_empty() {
        "text".to_string()
    } else {
        cleaned
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
