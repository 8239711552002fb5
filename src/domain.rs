//! Domain models for regulatory content.
//!
//! This module contains the rich document model, the attribute records of
//! its marks, reference resolution, the regulation hierarchy, and
//! configuration.

/// The rich document tree and its stored form.
pub mod document;
pub use document::{Content, Document, Mark, MarkKind, Node};

/// Validated attribute records carried by marks.
pub mod marks;
pub use marks::{ReferenceAttrs, ReferenceError, TooltipAttrs, TooltipError};

/// Reference path resolution.
pub mod reference;

/// The standard/chapter/section/subsection hierarchy.
pub mod hierarchy;
pub use hierarchy::{Hierarchy, HierarchyError};

mod config;
pub use config::Config;
