//! Tree edits addressed by character offsets.
//!
//! Offsets count characters of text runs in reading order. Block boundaries
//! take up no room, so the offset at the end of one paragraph is also the
//! offset at the start of the next; edits at such an offset go to the
//! earlier run.

use std::ops::Range;

use crate::domain::document::{Block, BlockKind, Mark, Node, Text};

/// Number of characters across all text runs.
pub fn text_len(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text(text) => text.char_len(),
            other => text_len(other.children()),
        })
        .sum()
}

/// Applies `f` to the marks of every run inside `range`, splitting runs at
/// the range bounds and merging equal neighbours afterwards.
pub fn map_marks(
    nodes: Vec<Node>,
    range: &Range<usize>,
    f: &mut dyn FnMut(&mut Vec<Mark>),
) -> Vec<Node> {
    let mut pos = 0;
    rewrite_runs(nodes, &mut pos, range, &mut |mut middle| {
        f(&mut middle.marks);
        Some(middle)
    })
}

/// Removes the characters inside `range`. Blocks are kept even if they end
/// up empty.
pub fn delete(nodes: Vec<Node>, range: &Range<usize>) -> Vec<Node> {
    let mut pos = 0;
    rewrite_runs(nodes, &mut pos, range, &mut |_| None)
}

fn rewrite_runs(
    nodes: Vec<Node>,
    pos: &mut usize,
    range: &Range<usize>,
    f: &mut dyn FnMut(Text) -> Option<Text>,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => {
                let start = *pos;
                let end = start + text.char_len();
                *pos = end;

                let from = range.start.clamp(start, end) - start;
                let to = range.end.clamp(start, end) - start;
                if from >= to {
                    out.push(Node::Text(text));
                    continue;
                }

                let (head, rest) = split_chars(&text.text, from);
                let (middle, tail) = split_chars(rest, to - from);
                let piece = |s: &str| Text {
                    text: s.to_string(),
                    marks: text.marks.clone(),
                };

                out.push(Node::Text(piece(head)));
                if let Some(middle) = f(piece(middle)) {
                    out.push(Node::Text(middle));
                }
                out.push(Node::Text(piece(tail)));
            }
            Node::Block(mut block) => {
                block.content = rewrite_runs(block.content, pos, range, f);
                out.push(Node::Block(block));
            }
            other => out.push(other),
        }
    }
    normalise(out)
}

/// Drops empty runs and merges neighbouring runs with identical marks.
pub fn normalise(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) if text.text.is_empty() => {}
            Node::Text(text) => match out.last_mut() {
                Some(Node::Text(previous)) if previous.marks == text.marks => {
                    previous.text.push_str(&text.text);
                }
                _ => out.push(Node::Text(text)),
            },
            other => out.push(other),
        }
    }
    out
}

fn split_chars(s: &str, chars: usize) -> (&str, &str) {
    let index = s
        .char_indices()
        .nth(chars)
        .map_or(s.len(), |(index, _)| index);
    s.split_at(index)
}

/// A text run's position and the inline parent it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    pub start: usize,
    pub end: usize,
    pub parent: usize,
}

/// Lists every text run in reading order.
pub fn runs(nodes: &[Node]) -> Vec<(RunInfo, &Text)> {
    fn collect<'a>(
        nodes: &'a [Node],
        pos: &mut usize,
        parents: &mut usize,
        parent: usize,
        out: &mut Vec<(RunInfo, &'a Text)>,
    ) {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    let start = *pos;
                    *pos += text.char_len();
                    out.push((
                        RunInfo {
                            start,
                            end: *pos,
                            parent,
                        },
                        text,
                    ));
                }
                Node::Block(block) => {
                    *parents += 1;
                    let id = *parents;
                    collect(&block.content, pos, parents, id, out);
                }
                Node::HardBreak | Node::HorizontalRule | Node::Unknown(_) => {}
            }
        }
    }

    let mut out = Vec::new();
    collect(nodes, &mut 0, &mut 0, 0, &mut out);
    out
}

/// Index of the run that text typed at `cursor` goes into: the run ending
/// at or containing the cursor, or else the run starting at it.
pub fn run_at(runs: &[RunInfo], cursor: usize) -> Option<usize> {
    runs.iter()
        .position(|run| run.start < cursor && cursor <= run.end)
        .or_else(|| runs.iter().position(|run| run.start == cursor))
}

/// Inserts `text` at `cursor`, inheriting the marks of the run it lands in.
pub fn insert(mut nodes: Vec<Node>, cursor: usize, text: &str) -> Vec<Node> {
    let infos: Vec<RunInfo> = runs(&nodes).into_iter().map(|(info, _)| info).collect();

    if let Some(target) = run_at(&infos, cursor) {
        let offset = cursor - infos[target].start;
        let mut index = 0;
        for_each_text_mut(&mut nodes, &mut |run| {
            if index == target {
                let (head, _) = split_chars(&run.text, offset);
                let at = head.len();
                run.text.insert_str(at, text);
            }
            index += 1;
        });
        return nodes;
    }

    if let Some(block) = first_textblock_mut(&mut nodes) {
        block.content.push(Node::text(text));
        return nodes;
    }
    nodes.push(Node::paragraph(vec![Node::text(text)]));
    nodes
}

fn for_each_text_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Text)) {
    for node in nodes {
        match node {
            Node::Text(text) => f(text),
            Node::Block(block) => for_each_text_mut(&mut block.content, f),
            Node::HardBreak | Node::HorizontalRule | Node::Unknown(_) => {}
        }
    }
}

fn first_textblock_mut(nodes: &mut [Node]) -> Option<&mut Block> {
    for node in nodes {
        if let Node::Block(block) = node {
            if matches!(block.kind, BlockKind::Paragraph | BlockKind::Heading(_)) {
                return Some(block);
            }
            if let Some(found) = first_textblock_mut(&mut block.content) {
                return Some(found);
            }
        }
    }
    None
}

/// Index of the top-level block holding `cursor`.
pub fn top_level_at(nodes: &[Node], cursor: usize) -> Option<usize> {
    let mut end = 0;
    for (index, node) in nodes.iter().enumerate() {
        end += match node {
            Node::Text(text) => text.char_len(),
            other => text_len(other.children()),
        };
        if cursor <= end {
            return Some(index);
        }
    }
    nodes.len().checked_sub(1)
}
