use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{Result, SkimmerError};
use crate::parser::config::ParserConfig;
use crate::parser::inline::InlineNode;
use crate::parser::post::PostNode;

/// Reads [`PostNode`]s out of a rendered HTML snapshot.
///
/// The document is parsed, walked and dropped inside [`HtmlAdapter::extract`];
/// only owned data leaves it.
#[derive(Debug)]
pub struct HtmlAdapter {
    post: Selector,
    time: Selector,
    text: Selector,
    anchor: Selector,
}

impl HtmlAdapter {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            post: compile(&config.post_selector)?,
            time: compile(&config.time_selector)?,
            text: compile(&config.text_selector)?,
            anchor: compile("a")?,
        })
    }

    /// Every post element in document order. Relative link targets are
    /// resolved against `base` when given.
    pub fn extract(&self, html: &str, base: Option<&Url>) -> Vec<PostNode> {
        let document = Html::parse_document(html);
        document
            .select(&self.post)
            .map(|post| self.post_node(post, base))
            .collect()
    }

    fn post_node(&self, post: ElementRef<'_>, base: Option<&Url>) -> PostNode {
        let datetime = post
            .select(&self.time)
            .next()
            .map(|time| time.value().attr("datetime").unwrap_or_default().to_string());

        let content = post
            .select(&self.text)
            .next()
            .map(|container| inline_children(container, base));

        let links = post
            .select(&self.anchor)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve(href, base))
            .collect();

        PostNode {
            datetime,
            content,
            links,
            inner_text: post.text().collect(),
        }
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| SkimmerError::Config(format!("Invalid CSS selector '{}': {}", selector, e)))
}

fn inline_children(el: ElementRef<'_>, base: Option<&Url>) -> Vec<InlineNode> {
    let mut nodes = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let text: &str = &text.text;
                nodes.push(InlineNode::text(text));
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    nodes.push(inline_element(child_el, base));
                }
            }
            _ => {}
        }
    }
    nodes
}

fn inline_element(el: ElementRef<'_>, base: Option<&Url>) -> InlineNode {
    match el.value().name() {
        "img" => InlineNode::pictogram(el.value().attr("alt")),
        "a" => {
            let label: String = el.text().collect();
            let href = el.value().attr("href").and_then(|h| resolve(h, base));
            InlineNode::Link {
                label: Some(label).filter(|l| !l.is_empty()),
                href,
            }
        }
        _ => InlineNode::Group(inline_children(el, base)),
    }
}

fn resolve(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Some(href.to_string()),
    }
}
