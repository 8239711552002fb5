//! Turning `reference` marks into navigable paths.

use std::fmt;

use crate::domain::marks::ReferenceAttrs;

/// The path prefix under which the public reader serves standards.
pub const DEFAULT_BASE_PATH: &str = "/regmaps";

/// Builds the in-page anchor of a subsection.
///
/// The anchor is the uppercased standard code, the chapter code, a literal
/// dot and the subsection's local number, e.g. `POJK1102.6`. The reader uses
/// the same scheme for the ids of rendered subsections, so a fragment built
/// here scrolls to the right place.
#[must_use]
pub fn anchor_id(standard_code: &str, chapter_code: &str, subsection_number: &str) -> String {
    format!(
        "{}{chapter_code}.{subsection_number}",
        standard_code.to_uppercase()
    )
}

impl ReferenceAttrs {
    /// Resolves the reference under [`DEFAULT_BASE_PATH`].
    ///
    /// ```
    /// use regmaps::domain::marks::ReferenceAttrs;
    ///
    /// let reference = ReferenceAttrs::new(Some("pojk11"), Some("02"), Some("6")).unwrap();
    /// assert_eq!(reference.path().to_string(), "/regmaps/pojk11/02#POJK1102.6");
    /// ```
    #[must_use]
    pub fn path(&self) -> ReferencePath<'_> {
        self.path_under(DEFAULT_BASE_PATH)
    }

    /// Resolves the reference under a custom base path.
    ///
    /// A trailing slash on `base_path` is ignored.
    #[must_use]
    pub fn path_under<'a>(&'a self, base_path: &'a str) -> ReferencePath<'a> {
        ReferencePath {
            base_path: base_path.trim_end_matches('/'),
            reference: self,
        }
    }
}

/// A resolved reference path.
///
/// Implements [`fmt::Display`]. Resolution is pure: the same attributes always
/// produce the same path.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePath<'a> {
    base_path: &'a str,
    reference: &'a ReferenceAttrs,
}

impl ReferencePath<'_> {
    /// The fragment part of the path, present only for subsection references.
    #[must_use]
    pub fn fragment(&self) -> Option<String> {
        let chapter = self.reference.chapter_code()?;
        let subsection = self.reference.subsection_number()?;
        Some(anchor_id(
            self.reference.standard_code(),
            chapter,
            subsection,
        ))
    }
}

impl fmt::Display for ReferencePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.base_path,
            self.reference.standard_code().to_lowercase()
        )?;
        if let Some(chapter) = self.reference.chapter_code() {
            write!(f, "/{chapter}")?;
        }
        if let Some(fragment) = self.fragment() {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}
