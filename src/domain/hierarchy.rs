//! The regulation hierarchy used to pick reference targets.
//!
//! Standards contain chapters; a chapter holds subsections either directly
//! or grouped into sections. The backend serves the whole tree in one
//! response, which deserialises into [`Hierarchy`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::reference::anchor_id;

/// Every standard with its chapters, sections and subsections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hierarchy {
    /// Standards in display order.
    pub standards: Vec<Standard>,
}

impl Hierarchy {
    /// Creates a hierarchy from its standards.
    #[must_use]
    pub const fn new(standards: Vec<Standard>) -> Self {
        Self { standards }
    }

    /// Finds a standard by code, ignoring ASCII case.
    #[must_use]
    pub fn standard(&self, code: &str) -> Option<&Standard> {
        self.standards
            .iter()
            .find(|standard| standard.code.eq_ignore_ascii_case(code))
    }

    /// Returns `true` if there are no standards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }
}

/// A regulatory standard, e.g. `POJK11`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    /// Backend identifier.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Short code used in paths and anchors.
    pub code: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Chapters in display order.
    #[serde(default, deserialize_with = "list_or_null")]
    pub chapters: Vec<Chapter>,
}

impl Standard {
    /// Finds a chapter by code.
    #[must_use]
    pub fn chapter(&self, code: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.code == code)
    }
}

/// A chapter of a standard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Backend identifier.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Chapter code, e.g. `02`.
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    /// Chapter title.
    #[serde(default)]
    pub title: String,
    /// Optional grouping of subsections.
    #[serde(default, deserialize_with = "list_or_null")]
    pub sections: Vec<Section>,
    /// Subsections that belong to no section.
    #[serde(default, deserialize_with = "list_or_null")]
    pub subsections: Vec<Subsection>,
}

impl Chapter {
    /// Finds a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Every subsection of the chapter: ungrouped ones first, then those of
    /// each section in order.
    pub fn all_subsections(&self) -> impl Iterator<Item = &Subsection> {
        self.subsections
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.subsections.iter()))
    }

    /// Returns `true` if a subsection with this local number exists anywhere
    /// in the chapter.
    #[must_use]
    pub fn has_subsection(&self, number: &str) -> bool {
        self.all_subsections().any(|s| s.number == number)
    }
}

/// A grouping of subsections inside a chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Backend identifier.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Section title.
    #[serde(default)]
    pub title: String,
    /// Subsections in display order.
    #[serde(default, deserialize_with = "list_or_null")]
    pub subsections: Vec<Subsection>,
}

/// The smallest addressable unit of a standard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    /// Backend identifier.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Local number within the chapter, e.g. `6`.
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
}

impl Subsection {
    /// The subsection's in-page anchor, given where it lives.
    #[must_use]
    pub fn anchor(&self, standard: &Standard, chapter: &Chapter) -> String {
        anchor_id(&standard.code, &chapter.code, &self.number)
    }
}

/// Errors raised while fetching the hierarchy.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// The hierarchy could not be read.
    #[error("failed to read hierarchy: {0}")]
    Io(#[from] std::io::Error),

    /// The hierarchy was not valid JSON of the expected shape.
    #[error("failed to parse hierarchy: {0}")]
    Parse(#[from] serde_json::Error),

    /// The source reported a failure of its own.
    #[error("hierarchy source failed: {0}")]
    Source(String),
}

impl Hierarchy {
    /// Parses the backend's JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Parse`] if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, HierarchyError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

fn list_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
