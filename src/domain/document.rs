//! The rich document model.
//!
//! Stored content is a JSON tree in the shape produced by the editor:
//!
//! ```json
//! { "type": "doc", "content": [ { "type": "paragraph", "content": [ ... ] } ] }
//! ```
//!
//! The node and mark vocabularies are closed. Anything outside them is kept
//! as [`Node::Unknown`] / [`Mark::Unknown`] holding the raw JSON, so it
//! survives a load/save cycle untouched and renders as nothing (nodes) or as
//! plain text (marks).
//!
//! Decoding never fails on individual nodes. Only the root is checked: a
//! value that is not a `doc` object is not a [`Document`] at all, and
//! [`Content::parse`] falls back to treating it as plain text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::marks::{LinkAttrs, ReferenceAttrs, TooltipAttrs};

/// The root of a rich-text value.
///
/// An empty document has no blocks; it is never represented as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Document {
    /// Top-level blocks in reading order.
    pub content: Vec<Node>,
}

impl Document {
    /// Creates a document from its top-level blocks.
    #[must_use]
    pub const fn new(content: Vec<Node>) -> Self {
        Self { content }
    }

    /// A document holding one unstyled paragraph with `text`.
    #[must_use]
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new(vec![Node::paragraph(vec![Node::text(text)])])
    }

    /// Returns `true` if the document has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterates over every node in document order, including unknown ones.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.content.iter().rev().collect(),
        }
    }

    /// Concatenated text of all text runs, in reading order.
    #[must_use]
    pub fn text(&self) -> String {
        self.descendants()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialises the document to its stored string form.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Self::String("doc".to_string()));
        map.insert("content".to_string(), encode_nodes(document.content));
        Self::Object(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(ShapeError::NotAnObject);
        };
        if map.get("type").and_then(Value::as_str) != Some("doc") {
            return Err(ShapeError::NotADocument);
        }
        match map.remove("content") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Array(children)) => Ok(Self::new(decode_nodes(children))),
            Some(_) => Err(ShapeError::ContentNotAList),
        }
    }
}

/// Reasons a JSON value is not a stored document.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The value is not a JSON object.
    #[error("document root must be an object")]
    NotAnObject,

    /// The root's `type` is not `"doc"`.
    #[error("document root must have type \"doc\"")]
    NotADocument,

    /// The root's `content` is neither absent nor a list.
    #[error("document content must be a list")]
    ContentNotAList,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    /// A container node with ordered children.
    Block(Block),

    /// A run of text with its marks.
    Text(Text),

    /// A line break inside a block.
    HardBreak,

    /// A thematic break between blocks.
    HorizontalRule,

    /// A node outside the known vocabulary, kept verbatim.
    Unknown(Value),
}

impl Node {
    /// A paragraph with the given inline content.
    #[must_use]
    pub fn paragraph(content: Vec<Self>) -> Self {
        Self::block(BlockKind::Paragraph, content)
    }

    /// A container node of the given kind, with no extra attributes.
    #[must_use]
    pub fn block(kind: BlockKind, content: Vec<Self>) -> Self {
        Self::Block(Block {
            kind,
            attrs: Map::new(),
            content,
        })
    }

    /// An unstyled text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(Text::new(text))
    }

    /// A text run with marks, first mark innermost.
    #[must_use]
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text(Text {
            text: text.into(),
            marks,
        })
    }

    /// The node's children; empty for leaves and unknown nodes.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Block(block) => &block.content,
            Self::Text(_) | Self::HardBreak | Self::HorizontalRule | Self::Unknown(_) => &[],
        }
    }

    /// The stored `type` tag of the node, if it has one.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Block(block) => Some(block.kind.type_name()),
            Self::Text(_) => Some("text"),
            Self::HardBreak => Some("hardBreak"),
            Self::HorizontalRule => Some("horizontalRule"),
            Self::Unknown(value) => value.get("type").and_then(Value::as_str),
        }
    }
}

/// A container node and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Which container this is.
    pub kind: BlockKind,
    /// Stored attributes not captured by `kind`, such as an ordered list's
    /// `start`. Written back unchanged.
    pub attrs: Map<String, Value>,
    /// Children in reading order.
    pub content: Vec<Node>,
}

impl Block {
    /// The first number of an ordered list, if one is stored.
    #[must_use]
    pub fn start(&self) -> Option<u64> {
        match self.kind {
            BlockKind::OrderedList => self.attrs.get("start").and_then(Value::as_u64),
            _ => None,
        }
    }
}

/// The kinds of container node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A paragraph of inline content.
    Paragraph,
    /// A heading of level 1 to 6.
    Heading(u8),
    /// An unordered list of list items.
    BulletList,
    /// An ordered list of list items.
    OrderedList,
    /// One item of a list.
    ListItem,
    /// A quoted block.
    Blockquote,
}

impl BlockKind {
    /// The stored `type` tag.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading(_) => "heading",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::ListItem => "listItem",
            Self::Blockquote => "blockquote",
        }
    }

    fn from_type_name(name: &str, attrs: Option<&Map<String, Value>>) -> Option<Self> {
        let kind = match name {
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading(heading_level(attrs)),
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            "blockquote" => Self::Blockquote,
            _ => return None,
        };
        Some(kind)
    }
}

fn heading_level(attrs: Option<&Map<String, Value>>) -> u8 {
    let level = attrs
        .and_then(|attrs| attrs.get("level"))
        .and_then(Value::as_u64)
        .unwrap_or(1)
        .clamp(1, 6);
    u8::try_from(level).unwrap_or(1)
}

/// A run of text sharing one list of marks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// The text itself.
    pub text: String,
    /// Marks applied to the run. The first mark wraps innermost.
    pub marks: Vec<Mark>,
}

impl Text {
    /// An unstyled run.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Number of characters in the run.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` if the run carries a mark of `kind`.
    #[must_use]
    pub fn has_mark(&self, kind: MarkKind) -> bool {
        self.marks.iter().any(|mark| mark.kind() == Some(kind))
    }
}

/// An inline annotation on a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Mark {
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Underlined text.
    Underline,
    /// Struck-through text.
    Strike,
    /// Inline code.
    Code,
    /// An external link.
    Link(LinkAttrs),
    /// A hover definition.
    Tooltip(TooltipAttrs),
    /// A link to another part of the regulation hierarchy.
    Reference(ReferenceAttrs),
    /// A mark outside the known vocabulary, or one whose attributes are
    /// invalid. Kept verbatim; the text renders without an affordance.
    Unknown(Value),
}

impl Mark {
    /// The mark's kind, or `None` for unknown marks.
    #[must_use]
    pub const fn kind(&self) -> Option<MarkKind> {
        let kind = match self {
            Self::Bold => MarkKind::Bold,
            Self::Italic => MarkKind::Italic,
            Self::Underline => MarkKind::Underline,
            Self::Strike => MarkKind::Strike,
            Self::Code => MarkKind::Code,
            Self::Link(_) => MarkKind::Link,
            Self::Tooltip(_) => MarkKind::Tooltip,
            Self::Reference(_) => MarkKind::Reference,
            Self::Unknown(_) => return None,
        };
        Some(kind)
    }

    /// The stored `type` tag of the mark, if it has one.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Unknown(value) => value.get("type").and_then(Value::as_str),
            known => known.kind().map(MarkKind::type_name),
        }
    }
}

/// The kinds of mark, without attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// `bold`
    Bold,
    /// `italic`
    Italic,
    /// `underline`
    Underline,
    /// `strike`
    Strike,
    /// `code`
    Code,
    /// `link`
    Link,
    /// `tooltip`
    Tooltip,
    /// `reference`
    Reference,
}

impl MarkKind {
    /// The stored `type` tag.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Strike => "strike",
            Self::Code => "code",
            Self::Link => "link",
            Self::Tooltip => "tooltip",
            Self::Reference => "reference",
        }
    }

    /// Looks up a kind by its stored `type` tag.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "strike" => Self::Strike,
            "code" => Self::Code,
            "link" => Self::Link,
            "tooltip" => Self::Tooltip,
            "reference" => Self::Reference,
            _ => return None,
        };
        Some(kind)
    }
}

/// A stored content value after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A structured document.
    Document(Document),
    /// Legacy content stored as a bare string; shown as one unstyled
    /// paragraph.
    PlainText(String),
    /// Nothing stored.
    Empty,
}

impl Content {
    /// Parses a stored content string.
    ///
    /// Never fails: a string that is not a JSON `doc` becomes
    /// [`Content::PlainText`] and the empty string becomes [`Content::Empty`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }

        let document = serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|value| Document::try_from(value).ok());

        let Some(document) = document else {
            tracing::debug!("stored content is not a document, falling back to plain text");
            return Self::PlainText(raw.to_string());
        };
        Self::Document(document)
    }

    /// Interprets a value that may already be structured.
    ///
    /// Strings are parsed as with [`Content::parse`]; `null` is empty.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(raw) => Self::parse(&raw),
            other => match Document::try_from(other.clone()) {
                Ok(document) => Self::Document(document),
                Err(error) => {
                    tracing::debug!(%error, "structured content is not a document");
                    Self::PlainText(other.to_string())
                }
            },
        }
    }

    /// Converts the content into a document.
    ///
    /// Plain text becomes a single paragraph; empty content becomes an
    /// empty document.
    #[must_use]
    pub fn into_document(self) -> Document {
        match self {
            Self::Document(document) => document,
            Self::PlainText(text) => Document::plain_text(text),
            Self::Empty => Document::default(),
        }
    }
}

impl From<Document> for Content {
    fn from(document: Document) -> Self {
        Self::Document(document)
    }
}

/// Walks `nodes` bottom-up, handing each known node to `visit` together with
/// the results already produced for its children.
///
/// Unknown nodes are skipped along with their subtrees, so consumers written
/// today render future node types as nothing.
pub fn walk<T, F>(nodes: &[Node], visit: &mut F) -> Vec<T>
where
    F: FnMut(&Node, Vec<T>) -> T,
{
    let mut output = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Unknown(_) => {
                tracing::debug!(node_type = node.type_name(), "skipping unknown node");
            }
            Node::Block(_) | Node::Text(_) | Node::HardBreak | Node::HorizontalRule => {
                let children = walk(node.children(), visit);
                output.push(visit(node, children));
            }
        }
    }
    output
}

/// Depth-first, document-order iterator over nodes.
///
/// Created by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

fn decode_nodes(values: Vec<Value>) -> Vec<Node> {
    values.into_iter().map(Node::from).collect()
}

fn encode_nodes(nodes: Vec<Node>) -> Value {
    Value::Array(nodes.into_iter().map(Value::from).collect())
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return Self::Unknown(value);
        };
        let Some(type_name) = map.get("type").and_then(Value::as_str) else {
            return Self::Unknown(value);
        };
        let attrs = map.get("attrs").and_then(Value::as_object);

        if let Some(kind) = BlockKind::from_type_name(type_name, attrs) {
            let content = match map.get("content") {
                Some(Value::Array(children)) => decode_nodes(children.clone()),
                _ => Vec::new(),
            };
            let mut attrs = attrs.cloned().unwrap_or_default();
            if matches!(kind, BlockKind::Heading(_)) {
                attrs.remove("level");
            }
            return Self::Block(Block {
                kind,
                attrs,
                content,
            });
        }

        match type_name {
            "text" => {
                let Some(text) = map.get("text").and_then(Value::as_str) else {
                    return Self::Unknown(value);
                };
                let marks = match map.get("marks") {
                    Some(Value::Array(marks)) => marks.iter().cloned().map(Mark::from).collect(),
                    _ => Vec::new(),
                };
                Self::marked_text(text, marks)
            }
            "hardBreak" => Self::HardBreak,
            "horizontalRule" => Self::HorizontalRule,
            _ => Self::Unknown(value),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        let mut map = Map::new();
        match node {
            Node::Block(block) => {
                map.insert("type".to_string(), block.kind.type_name().into());
                let mut attrs = Map::new();
                if let BlockKind::Heading(level) = block.kind {
                    attrs.insert("level".to_string(), level.into());
                }
                attrs.extend(block.attrs);
                if !attrs.is_empty() {
                    map.insert("attrs".to_string(), Self::Object(attrs));
                }
                if !block.content.is_empty() {
                    map.insert("content".to_string(), encode_nodes(block.content));
                }
            }
            Node::Text(text) => {
                map.insert("type".to_string(), "text".into());
                map.insert("text".to_string(), text.text.into());
                if !text.marks.is_empty() {
                    map.insert(
                        "marks".to_string(),
                        Self::Array(text.marks.into_iter().map(Self::from).collect()),
                    );
                }
            }
            Node::HardBreak => {
                map.insert("type".to_string(), "hardBreak".into());
            }
            Node::HorizontalRule => {
                map.insert("type".to_string(), "horizontalRule".into());
            }
            Node::Unknown(value) => return value,
        }
        Self::Object(map)
    }
}

impl From<Value> for Mark {
    fn from(value: Value) -> Self {
        let attrs = value.get("attrs").and_then(Value::as_object);
        let decoded = match value.get("type").and_then(Value::as_str) {
            Some("bold") => Some(Self::Bold),
            Some("italic") => Some(Self::Italic),
            Some("underline") => Some(Self::Underline),
            Some("strike") => Some(Self::Strike),
            Some("code") => Some(Self::Code),
            Some("link") => LinkAttrs::decode(attrs).map(Self::Link),
            Some("tooltip") => TooltipAttrs::decode(attrs).map(Self::Tooltip),
            Some("reference") => ReferenceAttrs::decode(attrs).map(Self::Reference),
            _ => None,
        };
        decoded.unwrap_or_else(|| {
            tracing::debug!(mark = %value, "keeping unrecognised mark verbatim");
            Self::Unknown(value)
        })
    }
}

impl From<Mark> for Value {
    fn from(mark: Mark) -> Self {
        let attrs = match &mark {
            Mark::Unknown(value) => return value.clone(),
            Mark::Link(link) => Some(link.encode()),
            Mark::Tooltip(tooltip) => Some(tooltip.encode()),
            Mark::Reference(reference) => Some(reference.encode()),
            Mark::Bold | Mark::Italic | Mark::Underline | Mark::Strike | Mark::Code => None,
        };

        let mut map = Map::new();
        if let Some(name) = mark.type_name() {
            map.insert("type".to_string(), name.into());
        }
        if let Some(attrs) = attrs {
            map.insert("attrs".to_string(), Self::Object(attrs));
        }
        Self::Object(map)
    }
}
