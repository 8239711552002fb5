//! The reference picker.
//!
//! The picker walks the operator down the hierarchy: standard, chapter, an
//! optional section, then a subsection. Changing a level clears every level
//! below it. The section only narrows the subsection list; it is never part
//! of the resulting reference.

use crate::domain::{
    ReferenceAttrs, ReferenceError,
    hierarchy::{Chapter, Hierarchy, HierarchyError, Section, Standard, Subsection},
};

/// Somewhere the hierarchy can be fetched from.
pub trait HierarchySource {
    /// Fetches the whole hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an error if the hierarchy cannot be retrieved.
    fn fetch(&self) -> Result<Hierarchy, HierarchyError>;
}

impl HierarchySource for Hierarchy {
    fn fetch(&self) -> Result<Self, HierarchyError> {
        Ok(self.clone())
    }
}

impl<F> HierarchySource for F
where
    F: Fn() -> Result<Hierarchy, HierarchyError>,
{
    fn fetch(&self) -> Result<Hierarchy, HierarchyError> {
        self()
    }
}

/// Load state of the hierarchy behind the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HierarchyState {
    /// Never requested.
    #[default]
    NotLoaded,
    /// A fetch is in flight; selection is disabled.
    Loading,
    /// Fetched and cached for the rest of the session.
    Ready(Hierarchy),
    /// The last fetch failed; the picker shows no options.
    Failed,
}

/// Errors raised by picker transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PickerError {
    /// The hierarchy has not been loaded.
    #[error("the hierarchy is not loaded")]
    NotReady,

    /// A chapter was chosen before a standard.
    #[error("choose a standard first")]
    NoStandard,

    /// A section or subsection was chosen before a chapter.
    #[error("choose a chapter first")]
    NoChapter,

    /// The standard does not exist.
    #[error("unknown standard '{0}'")]
    UnknownStandard(String),

    /// The chapter does not exist in the chosen standard.
    #[error("unknown chapter '{0}'")]
    UnknownChapter(String),

    /// The section does not exist in the chosen chapter.
    #[error("unknown section '{0}'")]
    UnknownSection(String),

    /// The subsection is not offered for the current choice.
    #[error("unknown subsection '{0}'")]
    UnknownSubsection(String),

    /// Confirm was attempted with an incomplete selection.
    #[error("a standard, chapter and subsection must be chosen")]
    Incomplete,

    /// The chosen parts did not form a valid reference.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// The multi-step reference picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePicker {
    open: bool,
    hierarchy: HierarchyState,
    standard: Option<String>,
    chapter: Option<String>,
    section: Option<String>,
    subsection: Option<String>,
}

impl ReferencePicker {
    /// Creates a closed picker with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the picker, fetching the hierarchy from `source` unless it is
    /// already cached.
    pub fn open(&mut self, source: &impl HierarchySource) {
        if self.open_pending() {
            self.finish_loading(source.fetch());
        }
    }

    /// Opens the picker without fetching.
    ///
    /// Returns `true` if the caller must now fetch the hierarchy and hand
    /// the result to [`ReferencePicker::finish_loading`]. The picker stays in
    /// [`HierarchyState::Loading`] until then.
    pub fn open_pending(&mut self) -> bool {
        self.open = true;
        match self.hierarchy {
            HierarchyState::Ready(_) | HierarchyState::Loading => false,
            HierarchyState::NotLoaded | HierarchyState::Failed => {
                self.hierarchy = HierarchyState::Loading;
                true
            }
        }
    }

    /// Records the outcome of a hierarchy fetch.
    pub fn finish_loading(&mut self, result: Result<Hierarchy, HierarchyError>) {
        self.hierarchy = match result {
            Ok(hierarchy) => {
                tracing::debug!(standards = hierarchy.standards.len(), "hierarchy loaded");
                HierarchyState::Ready(hierarchy)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load hierarchy");
                HierarchyState::Failed
            }
        };
    }

    /// Closes the picker and clears the selection. A loaded hierarchy stays
    /// cached.
    pub fn close(&mut self) {
        self.open = false;
        self.clear_from_standard();
    }

    /// Returns `true` while the picker is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` while the hierarchy is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.hierarchy, HierarchyState::Loading)
    }

    /// The hierarchy load state.
    #[must_use]
    pub const fn hierarchy_state(&self) -> &HierarchyState {
        &self.hierarchy
    }

    fn hierarchy(&self) -> Result<&Hierarchy, PickerError> {
        match &self.hierarchy {
            HierarchyState::Ready(hierarchy) => Ok(hierarchy),
            _ => Err(PickerError::NotReady),
        }
    }

    /// The chosen standard code.
    #[must_use]
    pub fn standard_code(&self) -> Option<&str> {
        self.standard.as_deref()
    }

    /// The chosen chapter code.
    #[must_use]
    pub fn chapter_code(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    /// The chosen section id.
    #[must_use]
    pub fn section_id(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// The chosen subsection number.
    #[must_use]
    pub fn subsection_number(&self) -> Option<&str> {
        self.subsection.as_deref()
    }

    /// Standards on offer; empty unless the hierarchy is ready.
    #[must_use]
    pub fn standards(&self) -> &[Standard] {
        self.hierarchy()
            .map(|hierarchy| hierarchy.standards.as_slice())
            .unwrap_or_default()
    }

    fn current_standard(&self) -> Option<&Standard> {
        let code = self.standard.as_deref()?;
        self.hierarchy().ok()?.standard(code)
    }

    fn current_chapter(&self) -> Option<&Chapter> {
        self.current_standard()?.chapter(self.chapter.as_deref()?)
    }

    fn current_section(&self) -> Option<&Section> {
        self.current_chapter()?.section(self.section.as_deref()?)
    }

    /// Chapters of the chosen standard.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        self.current_standard()
            .map(|standard| standard.chapters.as_slice())
            .unwrap_or_default()
    }

    /// Sections of the chosen chapter; empty when it has none.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        self.current_chapter()
            .map(|chapter| chapter.sections.as_slice())
            .unwrap_or_default()
    }

    /// Subsections on offer.
    ///
    /// With a section chosen, that section's subsections. Otherwise every
    /// subsection of the chapter.
    #[must_use]
    pub fn subsections(&self) -> Vec<&Subsection> {
        if let Some(section) = self.current_section() {
            return section.subsections.iter().collect();
        }
        self.current_chapter()
            .map(|chapter| chapter.all_subsections().collect())
            .unwrap_or_default()
    }

    /// Chooses a standard, clearing chapter, section and subsection if it
    /// changed.
    ///
    /// # Errors
    ///
    /// Fails if the hierarchy is not ready or the standard is unknown.
    pub fn select_standard(&mut self, code: &str) -> Result<(), PickerError> {
        let standard = self
            .hierarchy()?
            .standard(code)
            .ok_or_else(|| PickerError::UnknownStandard(code.to_string()))?;
        let code = standard.code.clone();

        if self.standard.as_deref() != Some(code.as_str()) {
            self.clear_from_standard();
            self.standard = Some(code);
        }
        Ok(())
    }

    /// Chooses a chapter of the chosen standard, clearing section and
    /// subsection if it changed.
    ///
    /// # Errors
    ///
    /// Fails if no standard is chosen or the chapter is unknown.
    pub fn select_chapter(&mut self, code: &str) -> Result<(), PickerError> {
        self.hierarchy()?;
        let standard = self.current_standard().ok_or(PickerError::NoStandard)?;
        if standard.chapter(code).is_none() {
            return Err(PickerError::UnknownChapter(code.to_string()));
        }

        if self.chapter.as_deref() != Some(code) {
            self.clear_from_chapter();
            self.chapter = Some(code.to_string());
        }
        Ok(())
    }

    /// Chooses a section of the chosen chapter, or clears it with `None`.
    /// The subsection is cleared if the section changed.
    ///
    /// # Errors
    ///
    /// Fails if no chapter is chosen or the section is unknown.
    pub fn select_section(&mut self, id: Option<&str>) -> Result<(), PickerError> {
        self.hierarchy()?;
        let chapter = self.current_chapter().ok_or(PickerError::NoChapter)?;
        if let Some(id) = id.filter(|id| chapter.section(id).is_none()) {
            return Err(PickerError::UnknownSection(id.to_string()));
        }

        if self.section.as_deref() != id {
            self.subsection = None;
            self.section = id.map(str::to_string);
        }
        Ok(())
    }

    /// Chooses a subsection from those on offer.
    ///
    /// # Errors
    ///
    /// Fails if no chapter is chosen or the subsection is not on offer.
    pub fn select_subsection(&mut self, number: &str) -> Result<(), PickerError> {
        self.hierarchy()?;
        if self.current_chapter().is_none() {
            return Err(PickerError::NoChapter);
        }
        if !self.subsections().iter().any(|s| s.number == number) {
            return Err(PickerError::UnknownSubsection(number.to_string()));
        }
        self.subsection = Some(number.to_string());
        Ok(())
    }

    /// Returns `true` once standard, chapter and subsection are all chosen.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        [&self.standard, &self.chapter, &self.subsection]
            .iter()
            .all(|part| part.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Builds the reference from the selection and closes the picker.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Incomplete`] unless [`Self::can_confirm`].
    pub fn confirm(&mut self) -> Result<ReferenceAttrs, PickerError> {
        if !self.can_confirm() {
            return Err(PickerError::Incomplete);
        }
        let reference = ReferenceAttrs::new(
            self.standard.as_deref(),
            self.chapter.as_deref(),
            self.subsection.as_deref(),
        )?;
        self.close();
        Ok(reference)
    }

    fn clear_from_standard(&mut self) {
        self.standard = None;
        self.clear_from_chapter();
    }

    fn clear_from_chapter(&mut self) {
        self.chapter = None;
        self.section = None;
        self.subsection = None;
    }
}
