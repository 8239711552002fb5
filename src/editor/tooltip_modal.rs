//! The modal used to attach a tooltip to the selection.

use crate::domain::{TooltipAttrs, TooltipError};

/// Open/closed state and input of the tooltip modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TooltipModal {
    open: bool,
    definition: String,
}

impl TooltipModal {
    /// Shows the modal with an empty input.
    pub fn open(&mut self) {
        self.open = true;
        self.definition.clear();
    }

    /// Hides the modal and clears the input.
    pub fn close(&mut self) {
        self.open = false;
        self.definition.clear();
    }

    /// Returns `true` while the modal is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Replaces the definition input.
    pub fn set_definition(&mut self, definition: impl Into<String>) {
        self.definition = definition.into();
    }

    /// The current definition input.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Returns `true` once a non-blank definition has been entered.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        !self.definition.trim().is_empty()
    }

    /// Takes the entered definition, closing the modal and clearing the
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::EmptyDefinition`], leaving the modal open, if
    /// the definition is blank.
    pub fn confirm(&mut self) -> Result<TooltipAttrs, TooltipError> {
        let attrs = TooltipAttrs::new(self.definition.as_str())?;
        self.close();
        Ok(attrs)
    }
}
