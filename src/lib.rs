//! Rich regulatory content
//!
//! Stored content is a JSON document tree of paragraphs, lists and text runs
//! carrying marks such as tooltips and references into the regulation
//! hierarchy. This crate parses that tree leniently, renders it, and applies
//! editor commands to it.

pub mod domain;
pub use domain::{Config, Content, Document, Hierarchy, Mark, MarkKind, Node, ReferenceAttrs};

/// Rendering documents into element trees and HTML.
pub mod render;

/// Editor commands over a document.
pub mod editor;
pub use editor::{EditorSession, Selection};

/// Health checks for stored content.
pub mod check;

/// Reading stored content from the filesystem.
pub mod storage;
