//! Editing commands over a document.
//!
//! An [`EditorSession`] owns one document while it is being edited. Every
//! command that changes the document returns a full snapshot of it; the host
//! persists the snapshot however it likes. Commands that change nothing
//! return `None`.

mod picker;
mod tooltip_modal;
mod transform;

use std::ops::Range;

pub use picker::{HierarchySource, HierarchyState, PickerError, ReferencePicker};
pub use tooltip_modal::TooltipModal;

use crate::domain::{
    Content, Document, Mark, MarkKind, Node, TooltipError,
    document::{Block, BlockKind},
};

/// A selection over the document's text, in character offsets.
///
/// A collapsed selection is a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    from: usize,
    to: usize,
}

impl Selection {
    /// A selection between two offsets, in either order.
    #[must_use]
    pub const fn new(anchor: usize, head: usize) -> Self {
        if anchor <= head {
            Self {
                from: anchor,
                to: head,
            }
        } else {
            Self {
                from: head,
                to: anchor,
            }
        }
    }

    /// A collapsed selection at `offset`.
    #[must_use]
    pub const fn cursor(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Start of the selection.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.from
    }

    /// End of the selection.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.to
    }

    /// Returns `true` for a cursor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from == self.to
    }

    const fn range(self) -> Range<usize> {
        self.from..self.to
    }
}

/// Container a block can be wrapped in with [`EditorSession::toggle_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// An unordered list.
    BulletList,
    /// An ordered list.
    OrderedList,
    /// A quotation.
    Blockquote,
}

impl Wrapper {
    const fn kind(self) -> BlockKind {
        match self {
            Self::BulletList => BlockKind::BulletList,
            Self::OrderedList => BlockKind::OrderedList,
            Self::Blockquote => BlockKind::Blockquote,
        }
    }
}

/// Errors raised by editor commands.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditorError {
    /// A selection reached past the end of the text.
    #[error("offset {offset} is past the end of the document ({len} characters)")]
    OutOfRange {
        /// The offending offset.
        offset: usize,
        /// Length of the document's text.
        len: usize,
    },
}

/// One document being edited, with its selection and modals.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    document: Document,
    selection: Selection,
    tooltip: TooltipModal,
    picker: ReferencePicker,
}

impl EditorSession {
    /// Starts editing `content`. Plain text is converted to a paragraph.
    #[must_use]
    pub fn new(content: Content) -> Self {
        Self {
            document: content.into_document(),
            ..Self::default()
        }
    }

    /// The document as it currently stands.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Number of characters in the document's text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        transform::text_len(&self.document.content)
    }

    /// Moves the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfRange`] if either end lies past the text.
    pub fn select(&mut self, anchor: usize, head: usize) -> Result<(), EditorError> {
        let len = self.text_len();
        if let Some(offset) = [anchor, head].into_iter().find(|&offset| offset > len) {
            return Err(EditorError::OutOfRange { offset, len });
        }
        self.selection = Selection::new(anchor, head);
        Ok(())
    }

    /// Replaces the document with externally supplied content.
    ///
    /// Nothing happens when the incoming document is structurally equal to
    /// the one being edited, so the selection survives while the host echoes
    /// back what the editor just emitted. Returns `true` if the document was
    /// replaced.
    pub fn set_content(&mut self, content: Content) -> bool {
        let incoming = content.into_document();
        if incoming == self.document {
            return false;
        }
        tracing::debug!("replacing editor content");
        self.document = incoming;
        self.selection = Selection::default();
        true
    }

    /// Adds `mark` to the selected text.
    ///
    /// A mark of the same type already on a run is replaced in place;
    /// otherwise the mark is appended and so wraps outermost.
    pub fn add_mark(&mut self, mark: &Mark) -> Option<Document> {
        if self.selection.is_empty() {
            return None;
        }
        let kind = mark.kind();
        self.edit_marks(self.selection.range(), &mut |marks| {
            let existing = kind.and_then(|kind| marks.iter_mut().find(|m| m.kind() == Some(kind)));
            if let Some(existing) = existing {
                *existing = mark.clone();
                return;
            }
            marks.push(mark.clone());
        })
    }

    /// Removes marks of `kind` from the selection.
    ///
    /// With a cursor, removes the mark from the whole stretch of text around
    /// the cursor that carries it.
    pub fn remove_mark(&mut self, kind: MarkKind) -> Option<Document> {
        let range = if self.selection.is_empty() {
            self.mark_range_at(self.selection.start(), kind)?
        } else {
            self.selection.range()
        };
        self.edit_marks(range, &mut |marks| marks.retain(|m| m.kind() != Some(kind)))
    }

    /// Removes `mark`'s kind if every selected run already has it, and adds
    /// `mark` otherwise.
    pub fn toggle_mark(&mut self, mark: &Mark) -> Option<Document> {
        let kind = mark.kind()?;
        let range = self.selection.range();
        let selected: Vec<_> = transform::runs(&self.document.content)
            .into_iter()
            .filter(|(run, _)| run.start < range.end && range.start < run.end)
            .collect();

        if !selected.is_empty() && selected.iter().all(|(_, text)| text.has_mark(kind)) {
            self.remove_mark(kind)
        } else {
            self.add_mark(mark)
        }
    }

    fn mark_range_at(&self, cursor: usize, kind: MarkKind) -> Option<Range<usize>> {
        let runs: Vec<_> = transform::runs(&self.document.content)
            .into_iter()
            .map(|(run, text)| (run, text.has_mark(kind)))
            .collect();
        let index = runs
            .iter()
            .position(|(run, has)| *has && run.start <= cursor && cursor <= run.end)?;

        let joined = |a: usize, b: usize| {
            let ((left, _), (right, has)) = (runs[a], runs[b]);
            has && left.parent == right.parent && left.end == right.start
        };
        let (mut first, mut last) = (index, index);
        while first > 0 && runs[first - 1].1 && joined(first - 1, first) {
            first -= 1;
        }
        while last + 1 < runs.len() && joined(last, last + 1) {
            last += 1;
        }
        Some(runs[first].0.start..runs[last].0.end)
    }

    fn edit_marks(
        &mut self,
        range: Range<usize>,
        f: &mut dyn FnMut(&mut Vec<Mark>),
    ) -> Option<Document> {
        let content = std::mem::take(&mut self.document.content);
        let updated = transform::map_marks(content.clone(), &range, f);
        self.commit(content, updated)
    }

    /// Types `text`, replacing the selection. The cursor ends up after the
    /// inserted text.
    pub fn insert_text(&mut self, text: &str) -> Option<Document> {
        if text.is_empty() && self.selection.is_empty() {
            return None;
        }
        let content = std::mem::take(&mut self.document.content);
        let cursor = self.selection.start();

        let mut updated = content.clone();
        if !self.selection.is_empty() {
            updated = transform::delete(updated, &self.selection.range());
        }
        if !text.is_empty() {
            updated = transform::insert(updated, cursor, text);
        }

        self.selection = Selection::cursor(cursor + text.chars().count());
        self.commit(content, updated)
    }

    /// Wraps the top-level block at the cursor in `wrapper`, or unwraps it if
    /// it already is one.
    pub fn toggle_block(&mut self, wrapper: Wrapper) -> Option<Document> {
        let index = transform::top_level_at(&self.document.content, self.selection.start())?;
        let content = std::mem::take(&mut self.document.content);
        let mut updated = content.clone();
        let target = wrapper.kind();

        let node = updated.remove(index);
        let replacement = match node {
            Node::Block(Block { kind, content, .. }) if kind == target => unwrap_block(content),
            node => vec![wrap_block(target, node)],
        };
        updated.splice(index..index, replacement);

        self.commit(content, updated)
    }

    fn commit(&mut self, before: Vec<Node>, after: Vec<Node>) -> Option<Document> {
        if before == after {
            self.document.content = before;
            return None;
        }
        self.document.content = after;
        tracing::trace!(document = %self.document.to_json_string(), "document changed");
        Some(self.document.clone())
    }

    /// The tooltip modal.
    pub const fn tooltip_modal(&mut self) -> &mut TooltipModal {
        &mut self.tooltip
    }

    /// Applies the tooltip modal's definition to the selection and closes
    /// the modal.
    ///
    /// With a cursor there is nothing to mark: returns `Ok(None)` and the
    /// modal keeps its input.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::EmptyDefinition`] if no definition was
    /// entered; the modal stays open.
    pub fn confirm_tooltip(&mut self) -> Result<Option<Document>, TooltipError> {
        if self.selection.is_empty() {
            return Ok(None);
        }
        let attrs = self.tooltip.confirm()?;
        Ok(self.add_mark(&Mark::Tooltip(attrs)))
    }

    /// The reference picker.
    pub const fn reference_picker(&mut self) -> &mut ReferencePicker {
        &mut self.picker
    }

    /// Opens the reference picker, loading the hierarchy from `source` if
    /// this session has not cached it yet.
    pub fn open_reference_picker(&mut self, source: &impl HierarchySource) {
        self.picker.open(source);
    }

    /// Applies the picked reference to the selection and closes the picker.
    ///
    /// With a cursor there is nothing to mark: returns `Ok(None)` and the
    /// picker keeps its choices.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Incomplete`] unless standard, chapter and
    /// subsection are all chosen.
    pub fn confirm_reference(&mut self) -> Result<Option<Document>, PickerError> {
        if self.selection.is_empty() {
            return Ok(None);
        }
        let reference = self.picker.confirm()?;
        Ok(self.add_mark(&Mark::Reference(reference)))
    }
}

fn wrap_block(kind: BlockKind, node: Node) -> Node {
    match kind {
        BlockKind::BulletList | BlockKind::OrderedList => {
            Node::block(kind, vec![Node::block(BlockKind::ListItem, vec![node])])
        }
        _ => Node::block(kind, vec![node]),
    }
}

fn unwrap_block(children: Vec<Node>) -> Vec<Node> {
    children
        .into_iter()
        .flat_map(|child| match child {
            Node::Block(Block {
                kind: BlockKind::ListItem,
                content,
                ..
            }) => content,
            other => vec![other],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Hierarchy, ReferenceAttrs, TooltipAttrs,
            document::Text,
            marks::LinkAttrs,
        },
        render::{TOOLTIP_CLASS, TooltipOverlay, Rect, VNode, render},
    };

    fn session(text: &str) -> EditorSession {
        EditorSession::new(Content::Document(Document::plain_text(text)))
    }

    fn inline(document: &Document) -> Vec<Node> {
        document.content[0].children().to_vec()
    }

    #[test]
    fn add_mark_needs_a_selection() {
        let mut editor = session("Bank wajib");
        assert_eq!(editor.add_mark(&Mark::Bold), None);
    }

    #[test]
    fn add_mark_emits_full_snapshot() {
        let mut editor = session("Bank wajib");
        editor.select(5, 10).unwrap();
        let snapshot = editor.add_mark(&Mark::Bold).unwrap();

        assert_eq!(&snapshot, editor.document());
        assert_eq!(
            inline(&snapshot),
            vec![
                Node::text("Bank "),
                Node::marked_text("wajib", vec![Mark::Bold])
            ]
        );
    }

    #[test]
    fn added_marks_wrap_outermost() {
        let mut editor = session("ATMR");
        editor.select(0, 4).unwrap();
        editor.add_mark(&Mark::Italic);
        editor.add_mark(&Mark::Bold);
        assert_eq!(
            inline(editor.document()),
            vec![Node::marked_text("ATMR", vec![Mark::Italic, Mark::Bold])]
        );
    }

    #[test]
    fn same_kind_is_replaced_in_place() {
        let mut editor = session("lihat");
        editor.select(0, 5).unwrap();
        editor.add_mark(&Mark::Link(LinkAttrs::new("https://a")));
        editor.add_mark(&Mark::Bold);
        editor.add_mark(&Mark::Link(LinkAttrs::new("https://b")));
        assert_eq!(
            inline(editor.document()),
            vec![Node::marked_text(
                "lihat",
                vec![Mark::Link(LinkAttrs::new("https://b")), Mark::Bold]
            )]
        );
    }

    #[test]
    fn adding_an_existing_mark_is_a_no_op() {
        let mut editor = session("ATMR");
        editor.select(0, 4).unwrap();
        assert!(editor.add_mark(&Mark::Bold).is_some());
        assert_eq!(editor.add_mark(&Mark::Bold), None);
    }

    #[test]
    fn remove_mark_from_selection() {
        let mut editor = session("Bank wajib");
        editor.select(0, 10).unwrap();
        editor.add_mark(&Mark::Bold);
        editor.select(0, 5).unwrap();
        editor.remove_mark(MarkKind::Bold).unwrap();

        assert_eq!(
            inline(editor.document()),
            vec![
                Node::text("Bank "),
                Node::marked_text("wajib", vec![Mark::Bold])
            ]
        );
    }

    #[test]
    fn remove_mark_at_cursor_covers_whole_mark_range() {
        let tooltip = Mark::Tooltip(TooltipAttrs::new("definisi").unwrap());
        let mut editor = EditorSession::new(Content::Document(Document::new(vec![
            Node::paragraph(vec![
                Node::text("a "),
                Node::marked_text("bc", vec![tooltip.clone()]),
                Node::marked_text("de", vec![tooltip.clone(), Mark::Bold]),
                Node::text(" f"),
            ]),
        ])));
        editor.select(3, 3).unwrap();
        editor.remove_mark(MarkKind::Tooltip).unwrap();

        assert_eq!(
            inline(editor.document()),
            vec![
                Node::text("a bc"),
                Node::marked_text("de", vec![Mark::Bold]),
                Node::text(" f"),
            ]
        );
    }

    #[test]
    fn remove_mark_at_cursor_without_mark_is_a_no_op() {
        let mut editor = session("plain");
        editor.select(2, 2).unwrap();
        assert_eq!(editor.remove_mark(MarkKind::Reference), None);
    }

    #[test]
    fn toggle_mark_adds_then_removes() {
        let mut editor = session("ATMR");
        editor.select(0, 4).unwrap();
        editor.toggle_mark(&Mark::Underline).unwrap();
        assert_eq!(
            inline(editor.document()),
            vec![Node::marked_text("ATMR", vec![Mark::Underline])]
        );
        editor.toggle_mark(&Mark::Underline).unwrap();
        assert_eq!(inline(editor.document()), vec![Node::text("ATMR")]);
    }

    #[test]
    fn insert_replaces_selection_and_moves_cursor() {
        let mut editor = session("Bank wajib");
        editor.select(5, 10).unwrap();
        let snapshot = editor.insert_text("umum").unwrap();

        assert_eq!(snapshot.text(), "Bank umum");
        assert_eq!(editor.selection(), Selection::cursor(9));

        editor.insert_text("!").unwrap();
        assert_eq!(editor.document().text(), "Bank umum!");
    }

    #[test]
    fn typing_into_empty_document_creates_paragraph() {
        let mut editor = EditorSession::new(Content::Empty);
        let snapshot = editor.insert_text("Pasal 1").unwrap();
        assert_eq!(snapshot, Document::plain_text("Pasal 1"));
    }

    #[test]
    fn typed_text_inherits_marks() {
        let mut editor = session("ab");
        editor.select(0, 2).unwrap();
        editor.add_mark(&Mark::Bold);
        editor.select(2, 2).unwrap();
        editor.insert_text("c");
        assert_eq!(
            inline(editor.document()),
            vec![Node::marked_text("abc", vec![Mark::Bold])]
        );
    }

    #[test]
    fn selection_past_end_is_rejected() {
        let mut editor = session("ab");
        assert_eq!(
            editor.select(0, 3),
            Err(EditorError::OutOfRange { offset: 3, len: 2 })
        );
        assert_eq!(editor.selection(), Selection::cursor(0));
    }

    #[test]
    fn toggle_block_wraps_and_unwraps() {
        let mut editor = EditorSession::new(Content::Document(Document::new(vec![
            Node::paragraph(vec![Node::text("ab")]),
            Node::paragraph(vec![Node::text("cd")]),
        ])));
        editor.select(3, 3).unwrap();

        let wrapped = editor.toggle_block(Wrapper::BulletList).unwrap();
        assert_eq!(
            wrapped.content[1],
            Node::block(
                BlockKind::BulletList,
                vec![Node::block(
                    BlockKind::ListItem,
                    vec![Node::paragraph(vec![Node::text("cd")])]
                )]
            )
        );

        let unwrapped = editor.toggle_block(Wrapper::BulletList).unwrap();
        assert_eq!(unwrapped.content[1], Node::paragraph(vec![Node::text("cd")]));

        let quoted = editor.toggle_block(Wrapper::Blockquote).unwrap();
        assert_eq!(
            quoted.content[1],
            Node::block(
                BlockKind::Blockquote,
                vec![Node::paragraph(vec![Node::text("cd")])]
            )
        );
    }

    #[test]
    fn toggle_block_on_empty_document_is_a_no_op() {
        let mut editor = EditorSession::new(Content::Empty);
        assert_eq!(editor.toggle_block(Wrapper::OrderedList), None);
    }

    #[test]
    fn set_content_skips_identical_documents() {
        let mut editor = session("Bank wajib");
        editor.select(2, 4).unwrap();

        let echoed = Content::parse(&editor.document().to_json_string());
        assert!(!editor.set_content(echoed));
        assert_eq!(editor.selection(), Selection::new(2, 4));
    }

    #[test]
    fn set_content_compares_structure_not_key_order() {
        let mut editor = session("ab");
        let reordered = r#"{"content":[{"content":[{"text":"ab","type":"text"}],"type":"paragraph"}],"type":"doc"}"#;
        assert!(!editor.set_content(Content::parse(reordered)));
    }

    #[test]
    fn set_content_replaces_different_documents() {
        let mut editor = session("Bank wajib");
        editor.select(2, 4).unwrap();

        assert!(editor.set_content(Content::parse("Subbagian lain")));
        assert_eq!(editor.document(), &Document::plain_text("Subbagian lain"));
        assert_eq!(editor.selection(), Selection::cursor(0));
    }

    #[test]
    fn tooltip_attach_then_hover() {
        let mut editor = session("Bank menghitung ATMR");
        editor.select(16, 20).unwrap();

        editor.tooltip_modal().open();
        assert!(!editor.tooltip_modal().can_confirm());
        editor
            .tooltip_modal()
            .set_definition("Aset Tertimbang Menurut Risiko");
        let snapshot = editor.confirm_tooltip().unwrap().unwrap();
        assert!(!editor.tooltip_modal().is_open());
        assert_eq!(editor.tooltip_modal().definition(), "");

        let nodes = render(&Content::Document(snapshot));
        let trigger = nodes[0]
            .find(&|e: &crate::render::Element| e.has_class(TOOLTIP_CLASS))
            .unwrap();
        assert_eq!(VNode::Element(trigger.clone()).text_content(), "ATMR");

        let mut overlay = TooltipOverlay::new(8);
        overlay.activate(trigger, Rect::default());
        assert_eq!(overlay.visible_text(), Some("Aset Tertimbang Menurut Risiko"));
        overlay.deactivate();
        assert_eq!(overlay.visible_text(), None);
    }

    #[test]
    fn empty_tooltip_is_not_applied() {
        let mut editor = session("ATMR");
        editor.select(0, 4).unwrap();
        editor.tooltip_modal().open();
        assert_eq!(
            editor.confirm_tooltip(),
            Err(TooltipError::EmptyDefinition)
        );
        assert_eq!(inline(editor.document()), vec![Node::text("ATMR")]);
    }

    #[test]
    fn reference_picked_from_hierarchy() {
        let hierarchy = Hierarchy::from_json(
            r#"[{"code": "pojk11", "chapters": [{"code": "02", "subsections": [{"number": "6"}]}]}]"#,
        )
        .unwrap();

        let mut editor = session("lihat Pasal 6");
        editor.select(6, 13).unwrap();
        editor.open_reference_picker(&hierarchy);
        assert_eq!(editor.confirm_reference(), Err(PickerError::Incomplete));

        let picker = editor.reference_picker();
        picker.select_standard("pojk11").unwrap();
        picker.select_chapter("02").unwrap();
        picker.select_subsection("6").unwrap();
        let snapshot = editor.confirm_reference().unwrap().unwrap();

        let expected = ReferenceAttrs::new(Some("pojk11"), Some("02"), Some("6")).unwrap();
        assert_eq!(
            inline(&snapshot)[1],
            Node::Text(Text {
                text: "Pasal 6".to_string(),
                marks: vec![Mark::Reference(expected)],
            })
        );
        assert!(!editor.reference_picker().is_open());
    }

    #[test]
    fn confirm_with_cursor_keeps_modal_input() {
        let mut editor = session("ATMR");
        editor.tooltip_modal().open();
        editor.tooltip_modal().set_definition("Aset Tertimbang Menurut Risiko");

        assert_eq!(editor.confirm_tooltip(), Ok(None));
        assert!(editor.tooltip_modal().is_open());
        assert_eq!(
            editor.tooltip_modal().definition(),
            "Aset Tertimbang Menurut Risiko"
        );

        editor.select(0, 4).unwrap();
        assert!(editor.confirm_tooltip().unwrap().is_some());
        assert!(!editor.tooltip_modal().is_open());
    }

    #[test]
    fn confirm_with_cursor_keeps_picker_choices() {
        let hierarchy = Hierarchy::from_json(
            r#"[{"code": "pojk11", "chapters": [{"code": "02", "subsections": [{"number": "6"}]}]}]"#,
        )
        .unwrap();
        let mut editor = session("Pasal 6");
        editor.open_reference_picker(&hierarchy);
        let picker = editor.reference_picker();
        picker.select_standard("pojk11").unwrap();
        picker.select_chapter("02").unwrap();
        picker.select_subsection("6").unwrap();

        assert_eq!(editor.confirm_reference(), Ok(None));
        assert!(editor.reference_picker().is_open());
        assert_eq!(editor.reference_picker().subsection_number(), Some("6"));
    }

    #[test]
    fn list_start_survives_edits() {
        let stored = r#"{"type":"doc","content":[{"type":"orderedList","attrs":{"start":4},"content":[{"type":"listItem","content":[{"type":"paragraph","content":[{"type":"text","text":"modal"}]}]}]}]}"#;
        let mut editor = EditorSession::new(Content::parse(stored));
        editor.select(0, 5).unwrap();

        let snapshot = editor.add_mark(&Mark::Bold).unwrap();
        let Node::Block(list) = &snapshot.content[0] else {
            panic!("expected a list");
        };
        assert_eq!(list.start(), Some(4));
        assert!(snapshot.to_json_string().contains(r#""start":4"#));
    }
}
