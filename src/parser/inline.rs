//! Inline content tree for a post's text container.
//!
//! The page adapter turns live markup into [`InlineNode`]s; everything here is
//! a pure function of that tree so it can be exercised without a browser.

/// Characters with markdown meaning that get a backslash when they come from post content
const MARKDOWN_SPECIAL: &[char] = &['[', ']', '*', '_', '`', '<', '>'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// A run of literal text
    Text(String),
    /// An inline image standing for a glyph (emoji, custom icon)
    Pictogram { label: Option<String> },
    /// A hyperlink; `label` is its visible text, `href` the resolved target
    Link {
        label: Option<String>,
        href: Option<String>,
    },
    /// A styling or grouping wrapper with no meaning of its own
    Group(Vec<InlineNode>),
}

impl InlineNode {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn pictogram(label: Option<&str>) -> Self {
        Self::Pictogram {
            label: label.map(String::from),
        }
    }

    pub fn link(label: Option<&str>, href: Option<&str>) -> Self {
        Self::Link {
            label: label.map(String::from),
            href: href.map(String::from),
        }
    }
}

/// Backslash-escape markdown-significant characters.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render a sequence of inline nodes to single-line text.
///
/// Text and pictogram labels are escaped. Link labels are emitted verbatim
/// inside `[label](url)`. Newlines become single spaces.
pub fn render(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out.replace('\n', " ")
}

fn render_node(node: &InlineNode, out: &mut String) {
    match node {
        InlineNode::Text(text) => out.push_str(&escape_markdown(text)),
        InlineNode::Pictogram { label } => {
            if let Some(label) = label.as_deref().filter(|l| !l.is_empty()) {
                out.push_str(&escape_markdown(label));
            }
        }
        InlineNode::Link { label, href } => {
            let label = label.as_deref().filter(|l| !l.is_empty());
            let href = href.as_deref().filter(|h| !h.is_empty());
            if let (Some(label), Some(href)) = (label, href) {
                out.push('[');
                out.push_str(label);
                out.push_str("](");
                out.push_str(href);
                out.push(')');
            }
        }
        InlineNode::Group(children) => {
            for child in children {
                render_node(child, out);
            }
        }
    }
}
