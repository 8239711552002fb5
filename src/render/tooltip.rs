//! Hover state of tooltip overlays.
//!
//! A rendered tooltip mark is a focusable span carrying its definition. The
//! host page drives a [`TooltipOverlay`] from pointer and focus events: it
//! activates the overlay with the span's bounding box when hover or focus
//! starts and deactivates it when they end. At most one overlay is open.

use super::{Element, TOOLTIP_ATTR, TOOLTIP_CLASS};
use crate::domain::Config;

/// A bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Distance from the left edge of the page.
    pub left: f64,
    /// Distance from the top edge of the page.
    pub top: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

/// Where an open overlay is drawn: horizontally centred on its anchor, just
/// below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPosition {
    /// Horizontal centre of the overlay.
    pub left: f64,
    /// Top edge of the overlay.
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Open {
    definition: String,
    position: OverlayPosition,
}

/// Open/closed state of the tooltip overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipOverlay {
    offset: f64,
    open: Option<Open>,
}

impl TooltipOverlay {
    /// Creates a closed overlay drawn `offset` pixels below its anchor.
    #[must_use]
    pub fn new(offset: u32) -> Self {
        Self {
            offset: f64::from(offset),
            open: None,
        }
    }

    /// Creates a closed overlay using the configured `tooltip_offset`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tooltip_offset)
    }

    /// Opens the overlay for a rendered tooltip element.
    ///
    /// The position is computed from `anchor`, the element's bounding box at
    /// the moment of activation. Returns `false`, leaving the state
    /// unchanged, if `element` is not a tooltip.
    pub fn activate(&mut self, element: &Element, anchor: Rect) -> bool {
        if !element.has_class(TOOLTIP_CLASS) {
            return false;
        }
        let Some(definition) = element.get_attr(TOOLTIP_ATTR) else {
            return false;
        };

        self.open = Some(Open {
            definition: definition.to_string(),
            position: OverlayPosition {
                left: anchor.left + anchor.width / 2.0,
                top: anchor.top + anchor.height + self.offset,
            },
        });
        true
    }

    /// Closes the overlay when hover or focus ends.
    pub fn deactivate(&mut self) {
        self.open = None;
    }

    /// Returns `true` while the overlay is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The definition currently shown, if any.
    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.definition.as_str())
    }

    /// Where the open overlay is drawn, if any.
    #[must_use]
    pub fn position(&self) -> Option<OverlayPosition> {
        self.open.as_ref().map(|open| open.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Content, Document,
            document::{Mark, Node},
            marks::TooltipAttrs,
        },
        render::{Renderer, VNode, render},
    };

    const ANCHOR: Rect = Rect {
        left: 100.0,
        top: 40.0,
        width: 60.0,
        height: 20.0,
    };

    fn rendered_tooltip(definition: &str) -> Element {
        let document = Document::new(vec![Node::paragraph(vec![Node::marked_text(
            "ATMR",
            vec![Mark::Tooltip(TooltipAttrs::new(definition).unwrap())],
        )])]);
        let nodes = render(&Content::Document(document));
        nodes[0]
            .find(&|e: &Element| e.has_class(TOOLTIP_CLASS))
            .unwrap()
            .clone()
    }

    #[test]
    fn hover_shows_and_hides_definition() {
        let element = rendered_tooltip("Aset Tertimbang Menurut Risiko");
        let mut overlay = TooltipOverlay::new(8);
        assert_eq!(overlay.visible_text(), None);

        assert!(overlay.activate(
            &element,
            Rect {
                left: 100.0,
                top: 40.0,
                width: 60.0,
                height: 20.0,
            },
        ));
        assert_eq!(overlay.visible_text(), Some("Aset Tertimbang Menurut Risiko"));
        assert_eq!(
            overlay.position(),
            Some(OverlayPosition {
                left: 130.0,
                top: 68.0,
            })
        );

        overlay.deactivate();
        assert!(!overlay.is_open());
        assert_eq!(overlay.visible_text(), None);
        assert_eq!(overlay.position(), None);
    }

    #[test]
    fn configured_offset_moves_overlay() {
        let element = rendered_tooltip("Modal Inti");

        let mut default = TooltipOverlay::from_config(&Config::default());
        default.activate(&element, ANCHOR);
        assert_eq!(default.position().map(|p| p.top), Some(68.0));

        let mut config = Config::default();
        config.tooltip_offset = 24;
        let mut configured = Renderer::new(&config).tooltip_overlay();
        configured.activate(&element, ANCHOR);
        assert_eq!(
            configured.position(),
            Some(OverlayPosition {
                left: 130.0,
                top: 84.0,
            })
        );
    }

    #[test]
    fn other_elements_do_not_open_overlay() {
        let mut overlay = TooltipOverlay::new(8);
        let VNode::Element(paragraph) =
            render(&Content::PlainText("x".to_string())).remove(0)
        else {
            panic!("expected element");
        };
        assert!(!overlay.activate(&paragraph, Rect::default()));
        assert!(!overlay.is_open());
    }

    #[test]
    fn reactivation_moves_overlay() {
        let first = rendered_tooltip("satu");
        let second = rendered_tooltip("dua");
        let mut overlay = TooltipOverlay::new(0);

        overlay.activate(&first, Rect::default());
        overlay.activate(
            &second,
            Rect {
                left: 10.0,
                top: 10.0,
                width: 0.0,
                height: 5.0,
            },
        );
        assert_eq!(overlay.visible_text(), Some("dua"));
        assert_eq!(
            overlay.position(),
            Some(OverlayPosition {
                left: 10.0,
                top: 15.0,
            })
        );
    }
}
