//! Markdown rendering for site pages.
//!
//! pulldown-cmark does the parsing and HTML output. On top of its event
//! stream we apply three rewrites, each switchable through
//! [`MarkdownOptions`]:
//!
//! - heading `id` slugs (duplicates get `-1`, `-2`, ...)
//! - unwrapping paragraphs that contain only images
//! - handing fenced code blocks to a [`Highlighter`]

use crate::config::MarkdownOptions;
use crate::highlight::Highlighter;
use pulldown_cmark::{
    html::push_html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use std::collections::HashMap;

/// Render a page body to HTML.
pub fn render_markdown(
    content: &str,
    options: &MarkdownOptions,
    highlighter: &dyn Highlighter,
) -> String {
    let parser_options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(content, parser_options);

    let mut rewriter = Rewriter::new(options, highlighter);
    for event in parser {
        rewriter.feed(event);
    }

    let mut html = String::with_capacity(content.len() * 2);
    push_html(&mut html, rewriter.out.into_iter());
    html
}

struct HeadingBuffer<'a> {
    level: HeadingLevel,
    text: String,
    inner: Vec<Event<'a>>,
}

struct CodeBuffer {
    lang: String,
    body: String,
}

struct Rewriter<'a, 'o> {
    options: &'o MarkdownOptions,
    highlighter: &'o dyn Highlighter,
    out: Vec<Event<'a>>,
    seen_slugs: HashMap<String, usize>,
    heading: Option<HeadingBuffer<'a>>,
    paragraph: Option<Vec<Event<'a>>>,
    code: Option<CodeBuffer>,
}

impl<'a, 'o> Rewriter<'a, 'o> {
    fn new(options: &'o MarkdownOptions, highlighter: &'o dyn Highlighter) -> Self {
        Self {
            options,
            highlighter,
            out: Vec::new(),
            seen_slugs: HashMap::new(),
            heading: None,
            paragraph: None,
            code: None,
        }
    }

    fn feed(&mut self, event: Event<'a>) {
        if self.code.is_some() {
            match event {
                Event::End(TagEnd::CodeBlock) => self.finish_code(),
                Event::Text(text) => {
                    if let Some(code) = self.code.as_mut() {
                        code.body.push_str(&text);
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
                    CodeBlockKind::Indented => None,
                }
                .unwrap_or(&self.options.highlight.default_lang)
                .to_string();
                self.code = Some(CodeBuffer {
                    lang,
                    body: String::new(),
                });
            }
            Event::Start(Tag::Heading { level, .. }) if self.options.heading_slugs => {
                self.heading = Some(HeadingBuffer {
                    level,
                    text: String::new(),
                    inner: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) if self.heading.is_some() => self.finish_heading(),
            Event::Start(Tag::Paragraph) if self.options.unwrap_images => {
                self.paragraph = Some(Vec::new());
            }
            Event::End(TagEnd::Paragraph) if self.paragraph.is_some() => self.finish_paragraph(),
            other => self.emit(other),
        }
    }

    fn emit(&mut self, event: Event<'a>) {
        if let Some(heading) = self.heading.as_mut() {
            if let Event::Text(text) | Event::Code(text) = &event {
                heading.text.push_str(text);
            }
            heading.inner.push(event);
        } else if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push(event);
        } else {
            self.out.push(event);
        }
    }

    fn finish_code(&mut self) {
        if let Some(code) = self.code.take() {
            let html = self.highlighter.highlight(&code.body, &code.lang);
            self.emit(Event::Html(CowStr::from(html)));
        }
    }

    fn finish_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let slug = self.unique_slug(&heading.text);
        let n = heading_number(heading.level);

        if slug.is_empty() {
            self.out.push(Event::Start(Tag::Heading {
                level: heading.level,
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            }));
            self.out.extend(heading.inner);
            self.out.push(Event::End(TagEnd::Heading(heading.level)));
        } else {
            self.out
                .push(Event::Html(format!("<h{n} id=\"{slug}\">").into()));
            self.out.extend(heading.inner);
            self.out.push(Event::Html(format!("</h{n}>\n").into()));
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(events) = self.paragraph.take() else {
            return;
        };
        if is_image_only(&events) {
            self.out.extend(events);
        } else {
            self.out.push(Event::Start(Tag::Paragraph));
            self.out.extend(events);
            self.out.push(Event::End(TagEnd::Paragraph));
        }
    }

    fn unique_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if base.is_empty() {
            return base;
        }
        // Every emitted slug is recorded, so a literal `notes-1` heading and a
        // generated `notes-1` suffix cannot collide.
        let mut count = self.seen_slugs.get(&base).copied().unwrap_or(0);
        let mut slug = base.clone();
        while self.seen_slugs.contains_key(&slug) {
            count += 1;
            slug = format!("{base}-{count}");
        }
        self.seen_slugs.insert(base.clone(), count);
        self.seen_slugs.entry(slug.clone()).or_insert(0);
        slug
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Lowercase, keep alphanumerics and `_`, collapse everything else into
/// single hyphens, strip leading/trailing hyphens.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            slug.extend(ch.to_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// True when a paragraph holds at least one image and nothing but images
/// and whitespace.
fn is_image_only(events: &[Event<'_>]) -> bool {
    let mut depth = 0usize;
    let mut images = 0usize;
    for event in events {
        match event {
            Event::Start(Tag::Image { .. }) => {
                if depth == 0 {
                    images += 1;
                }
                depth += 1;
            }
            Event::End(TagEnd::Image) => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            Event::Text(text) if text.trim().is_empty() => {}
            Event::SoftBreak | Event::HardBreak => {}
            _ => return false,
        }
    }
    images > 0
}
