//! Health checks for stored content.
//!
//! Loading never fails, so problems in stored content only show up as
//! degraded rendering. [`check`] reports them instead.

use std::fmt;

use serde_json::Value;

use crate::domain::{Content, Document, Mark, MarkKind, Node};

/// How a stored value was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A structured document.
    Document,
    /// A string that is not a document, shown as plain text.
    PlainText,
    /// Nothing stored.
    Empty,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Document => "document",
            Self::PlainText => "plain text",
            Self::Empty => "empty",
        })
    }
}

/// A problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A node outside the vocabulary. Renders as nothing.
    UnknownNode {
        /// The node's `type` tag, if it has one.
        node_type: Option<String>,
    },

    /// A mark outside the vocabulary. Its text renders unwrapped.
    UnknownMark {
        /// The mark's `type` tag, if it has one.
        mark_type: Option<String>,
    },

    /// A known mark whose attributes are invalid, such as a tooltip with no
    /// definition. Its text renders unwrapped.
    DegradedMark {
        /// The kind the mark claims to be.
        kind: MarkKind,
    },

    /// A text run with no characters.
    EmptyText,

    /// Neighbouring text runs with identical marks that should be one run.
    UnmergedRuns {
        /// The text of the second run.
        text: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_type } => {
                write!(f, "unknown node type {}", tag(node_type.as_deref()))
            }
            Self::UnknownMark { mark_type } => {
                write!(f, "unknown mark type {}", tag(mark_type.as_deref()))
            }
            Self::DegradedMark { kind } => {
                write!(f, "{} mark has invalid attributes", kind.type_name())
            }
            Self::EmptyText => f.write_str("empty text run"),
            Self::UnmergedRuns { text } => {
                write!(f, "run {text:?} has the same marks as the run before it")
            }
        }
    }
}

fn tag(name: Option<&str>) -> String {
    name.map_or_else(|| "(missing)".to_string(), |name| format!("'{name}'"))
}

/// The outcome of checking one stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// How the value was interpreted.
    pub kind: ContentKind,
    /// Problems in document order.
    pub issues: Vec<Issue>,
}

impl Report {
    /// Returns `true` if no problems were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Checks a parsed content value.
#[must_use]
pub fn check(content: &Content) -> Report {
    match content {
        Content::Document(document) => Report {
            kind: ContentKind::Document,
            issues: check_document(document),
        },
        Content::PlainText(_) => Report {
            kind: ContentKind::PlainText,
            issues: Vec::new(),
        },
        Content::Empty => Report {
            kind: ContentKind::Empty,
            issues: Vec::new(),
        },
    }
}

/// Lists the problems in a document, in document order.
#[must_use]
pub fn check_document(document: &Document) -> Vec<Issue> {
    let mut issues = unmerged(&document.content);

    for node in document.descendants() {
        match node {
            Node::Unknown(value) => issues.push(Issue::UnknownNode {
                node_type: type_tag(value),
            }),
            Node::Text(text) => {
                if text.text.is_empty() {
                    issues.push(Issue::EmptyText);
                }
                issues.extend(text.marks.iter().filter_map(mark_issue));
            }
            Node::Block(block) => issues.extend(unmerged(&block.content)),
            Node::HardBreak | Node::HorizontalRule => {}
        }
    }
    issues
}

fn mark_issue(mark: &Mark) -> Option<Issue> {
    let Mark::Unknown(value) = mark else {
        return None;
    };
    let mark_type = type_tag(value);
    let kind = mark_type.as_deref().and_then(MarkKind::from_type_name);
    Some(kind.map_or_else(
        || Issue::UnknownMark { mark_type },
        |kind| Issue::DegradedMark { kind },
    ))
}

fn unmerged(siblings: &[Node]) -> Vec<Issue> {
    siblings
        .windows(2)
        .filter_map(|pair| match pair {
            [Node::Text(first), Node::Text(second)] if first.marks == second.marks => {
                Some(Issue::UnmergedRuns {
                    text: second.text.clone(),
                })
            }
            _ => None,
        })
        .collect()
}

fn type_tag(value: &Value) -> Option<String> {
    value.get("type").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("" => ContentKind::Empty ; "empty string")]
    #[test_case("Bank wajib" => ContentKind::PlainText ; "legacy text")]
    #[test_case(r#"{"type":"doc"}"# => ContentKind::Document ; "document")]
    fn reports_content_kind(raw: &str) -> ContentKind {
        check(&Content::parse(raw)).kind
    }

    #[test]
    fn clean_document_has_no_issues() {
        let content = Content::parse(
            r#"{"type":"doc","content":[{"type":"paragraph","content":[
                {"type":"text","text":"Bank "},
                {"type":"text","text":"wajib","marks":[{"type":"bold"}]}
            ]}]}"#,
        );
        assert!(check(&content).is_clean());
    }

    #[test]
    fn finds_unknown_nodes_and_marks() {
        let content = Content::parse(
            r#"{"type":"doc","content":[
                {"type":"table","content":[]},
                {"type":"paragraph","content":[
                    {"type":"text","text":"a","marks":[{"type":"highlight"},{"type":"tooltip","attrs":{"definition":"  "}}]}
                ]}
            ]}"#,
        );
        let report = check(&content);
        assert_eq!(
            report.issues,
            vec![
                Issue::UnknownNode {
                    node_type: Some("table".to_string())
                },
                Issue::UnknownMark {
                    mark_type: Some("highlight".to_string())
                },
                Issue::DegradedMark {
                    kind: MarkKind::Tooltip
                },
            ]
        );
    }

    #[test]
    fn finds_unmerged_and_empty_runs() {
        let document = Document::new(vec![Node::paragraph(vec![
            Node::text("ab"),
            Node::text("cd"),
            Node::text(""),
        ])]);
        let issues = check_document(&document);
        assert!(issues.contains(&Issue::UnmergedRuns {
            text: "cd".to_string()
        }));
        assert!(issues.contains(&Issue::EmptyText));
    }

    #[test]
    fn runs_split_by_a_break_are_fine() {
        let document = Document::new(vec![Node::paragraph(vec![
            Node::text("ab"),
            Node::HardBreak,
            Node::text("cd"),
        ])]);
        assert!(check_document(&document).is_empty());
    }

    #[test]
    fn issues_read_well() {
        let issue = Issue::UnknownNode { node_type: None };
        assert_eq!(issue.to_string(), "unknown node type (missing)");
        let issue = Issue::DegradedMark {
            kind: MarkKind::Reference,
        };
        assert_eq!(issue.to_string(), "reference mark has invalid attributes");
    }
}
