//! Read-only rendering of stored content.
//!
//! Rendering is a pure function from a [`Content`] value to a tree of
//! [`VNode`]s. The tree can be serialised with [`to_html`] or inspected
//! directly. Nothing here can fail: unknown nodes render as nothing and
//! marks with unusable attributes leave their text unwrapped.

mod html;
mod tooltip;

pub use html::to_html;
pub use tooltip::{OverlayPosition, Rect, TooltipOverlay};

use crate::domain::{
    Config,
    document::{BlockKind, Content, Document, Mark, Node, walk},
};

/// Class of the element wrapping a tooltip mark.
pub const TOOLTIP_CLASS: &str = "regmaps-tooltip";

/// Attribute of a tooltip element holding the definition.
pub const TOOLTIP_ATTR: &str = "data-definition";

/// Class of the link produced for a reference mark.
pub const REFERENCE_CLASS: &str = "regmaps-reference";

/// A node of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VNode {
    /// An element with attributes and children.
    Element(Element),
    /// Literal text.
    Text(String),
}

impl VNode {
    /// Returns the element, if this is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
        }
    }

    /// Finds the first element, in document order, for which `predicate`
    /// holds.
    #[must_use]
    pub fn find(&self, predicate: &impl Fn(&Element) -> bool) -> Option<&Element> {
        let element = self.as_element()?;
        if predicate(element) {
            return Some(element);
        }
        element
            .children
            .iter()
            .find_map(|child| child.find(predicate))
    }
}

/// A rendered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: &'static str,
    /// Attributes in output order.
    pub attrs: Vec<(&'static str, String)>,
    /// Children in reading order.
    pub children: Vec<VNode>,
}

impl Element {
    const fn new(tag: &'static str, children: Vec<VNode>) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children,
        }
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the element has `class` among its classes.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Renders content using `config`.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a Config,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Renders any stored content.
    ///
    /// Plain text becomes one paragraph holding the string verbatim; empty
    /// content renders nothing.
    #[must_use]
    pub fn render(&self, content: &Content) -> Vec<VNode> {
        match content {
            Content::Document(document) => self.render_document(document),
            Content::PlainText(text) => vec![
                Element::new("p", vec![VNode::Text(text.clone())]).into(),
            ],
            Content::Empty => Vec::new(),
        }
    }

    /// Renders a document: one output node per known block, in order.
    #[must_use]
    pub fn render_document(&self, document: &Document) -> Vec<VNode> {
        walk(&document.content, &mut |node: &Node, children: Vec<VNode>| {
            self.render_node(node, children)
        })
    }

    /// A tooltip overlay placed with the configured offset.
    #[must_use]
    pub fn tooltip_overlay(&self) -> TooltipOverlay {
        TooltipOverlay::from_config(self.config)
    }

    /// Renders stored content straight to an HTML string.
    #[must_use]
    pub fn render_html(&self, content: &Content) -> String {
        to_html(&self.render(content))
    }

    fn render_node(&self, node: &Node, children: Vec<VNode>) -> VNode {
        match node {
            Node::Block(block) => {
                let mut element = Element::new(block_tag(block.kind), children);
                if let Some(start) = block.start().filter(|&start| start != 1) {
                    element.attrs.push(("start", start.to_string()));
                }
                element.into()
            }
            Node::Text(text) => text
                .marks
                .iter()
                .fold(VNode::Text(text.text.clone()), |inner, mark| {
                    self.apply_mark(mark, inner)
                }),
            Node::HardBreak => Element::new("br", Vec::new()).into(),
            Node::HorizontalRule => Element::new("hr", Vec::new()).into(),
            // `walk` never hands out unknown nodes.
            Node::Unknown(_) => VNode::Text(String::new()),
        }
    }

    /// Wraps `inner` in the affordance for `mark`.
    ///
    /// Marks are folded over a run in stored order, so the first mark ends
    /// up innermost and the last outermost.
    fn apply_mark(&self, mark: &Mark, inner: VNode) -> VNode {
        let Some(mut element) = self.wrapper(mark) else {
            return inner;
        };
        element.children.push(inner);
        element.into()
    }

    fn wrapper(&self, mark: &Mark) -> Option<Element> {
        let empty = |tag| Element::new(tag, Vec::new());
        let element = match mark {
            Mark::Bold => empty("strong"),
            Mark::Italic => empty("em"),
            Mark::Underline => empty("u"),
            Mark::Strike => empty("s"),
            Mark::Code => empty("code"),
            Mark::Link(link) => {
                let element = empty("a").attr("href", link.href());
                if self.config.external_links_new_tab {
                    element
                        .attr("target", "_blank")
                        .attr("rel", "noopener noreferrer")
                } else {
                    element
                }
            }
            Mark::Tooltip(tooltip) => empty("span")
                .attr("class", TOOLTIP_CLASS)
                .attr(TOOLTIP_ATTR, tooltip.definition())
                .attr("tabindex", "0"),
            Mark::Reference(reference) => empty("a")
                .attr(
                    "href",
                    reference.path_under(self.config.base_path()).to_string(),
                )
                .attr("class", REFERENCE_CLASS),
            Mark::Unknown(_) => return None,
        };
        Some(element)
    }
}

const fn block_tag(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Paragraph => "p",
        BlockKind::Heading(1) => "h1",
        BlockKind::Heading(2) => "h2",
        BlockKind::Heading(3) => "h3",
        BlockKind::Heading(4) => "h4",
        BlockKind::Heading(5) => "h5",
        BlockKind::Heading(_) => "h6",
        BlockKind::BulletList => "ul",
        BlockKind::OrderedList => "ol",
        BlockKind::ListItem => "li",
        BlockKind::Blockquote => "blockquote",
    }
}

/// Renders content with the default configuration.
#[must_use]
pub fn render(content: &Content) -> Vec<VNode> {
    Renderer::new(&Config::default()).render(content)
}
