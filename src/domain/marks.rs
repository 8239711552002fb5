//! Validated attribute records carried by marks.
//!
//! Stored content is loosely typed, so every record here has a strict
//! constructor (used by the editor) and a lenient decoder (used when reading
//! stored values). The lenient decoder returns `None` when the stored
//! attributes cannot form a valid record; the caller then keeps the raw mark
//! around so it still round-trips.

use std::fmt;

use non_empty_string::NonEmptyString;
use serde_json::{Map, Value};

/// Attributes of a `link` mark.
///
/// The href is kept verbatim. No URL validation happens here or at render
/// time. Other stored attributes, such as `target` or `rel`, are carried
/// along untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAttrs {
    href: String,
    extra: Map<String, Value>,
}

impl LinkAttrs {
    /// Creates link attributes pointing at `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            extra: Map::new(),
        }
    }

    /// Returns the stored href.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Stored attributes other than `href`.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn decode(attrs: Option<&Map<String, Value>>) -> Option<Self> {
        let attrs = attrs?;
        let href = attrs.get("href")?.as_str()?.to_string();
        let extra = attrs
            .iter()
            .filter(|(key, _)| key.as_str() != "href")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Some(Self { href, extra })
    }

    pub(crate) fn encode(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("href".to_string(), Value::String(self.href.clone()));
        map.extend(self.extra.clone());
        map
    }
}

/// Attributes of a `tooltip` mark: the definition revealed on hover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipAttrs {
    definition: NonEmptyString,
}

impl TooltipAttrs {
    /// Creates tooltip attributes.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::EmptyDefinition`] if the definition is empty or
    /// only whitespace.
    pub fn new(definition: impl Into<String>) -> Result<Self, TooltipError> {
        let definition = definition.into();
        if definition.trim().is_empty() {
            return Err(TooltipError::EmptyDefinition);
        }
        NonEmptyString::new(definition)
            .map(|definition| Self { definition })
            .map_err(|_| TooltipError::EmptyDefinition)
    }

    /// Returns the definition text.
    #[must_use]
    pub fn definition(&self) -> &str {
        self.definition.as_str()
    }

    pub(crate) fn decode(attrs: Option<&Map<String, Value>>) -> Option<Self> {
        let definition = attrs?.get("definition")?.as_str()?;
        Self::new(definition).ok()
    }

    pub(crate) fn encode(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "definition".to_string(),
            Value::String(self.definition().to_string()),
        );
        map
    }
}

/// Errors raised when building a [`TooltipAttrs`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TooltipError {
    /// The definition was empty or blank.
    #[error("tooltip definition must not be empty")]
    EmptyDefinition,
}

/// Attributes of a `reference` mark.
///
/// A reference targets a standard, optionally narrowed to one of its
/// chapters, optionally narrowed again to a subsection of that chapter. The
/// three parts always form a prefix chain: there is never a subsection
/// without a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAttrs {
    standard_code: NonEmptyString,
    target: Option<(NonEmptyString, Option<NonEmptyString>)>,
}

impl ReferenceAttrs {
    /// A reference to a whole standard.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::MissingStandard`] if `standard_code` is empty.
    pub fn standard(standard_code: impl Into<String>) -> Result<Self, ReferenceError> {
        Ok(Self {
            standard_code: required(standard_code.into())?,
            target: None,
        })
    }

    /// Builds a reference from its three optional parts.
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard code is missing, or if a subsection
    /// is given without a chapter.
    pub fn new(
        standard_code: Option<&str>,
        chapter_code: Option<&str>,
        subsection_number: Option<&str>,
    ) -> Result<Self, ReferenceError> {
        let standard_code = present(standard_code).ok_or(ReferenceError::MissingStandard)?;
        let chapter = present(chapter_code);
        let subsection = present(subsection_number);

        let target = match (chapter, subsection) {
            (None, None) => None,
            (None, Some(_)) => return Err(ReferenceError::SubsectionWithoutChapter),
            (Some(chapter), subsection) => Some((chapter, subsection)),
        };

        Ok(Self {
            standard_code,
            target,
        })
    }

    /// Narrows the reference to a chapter, dropping any subsection.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::EmptyChapter`] if `chapter_code` is empty.
    pub fn with_chapter(mut self, chapter_code: impl Into<String>) -> Result<Self, ReferenceError> {
        let chapter =
            NonEmptyString::new(chapter_code.into()).map_err(|_| ReferenceError::EmptyChapter)?;
        self.target = Some((chapter, None));
        Ok(self)
    }

    /// Narrows the reference to a subsection of its chapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference has no chapter yet or the
    /// subsection number is empty.
    pub fn with_subsection(
        mut self,
        subsection_number: impl Into<String>,
    ) -> Result<Self, ReferenceError> {
        let number = NonEmptyString::new(subsection_number.into())
            .map_err(|_| ReferenceError::EmptySubsection)?;
        match self.target.as_mut() {
            Some((_, subsection)) => *subsection = Some(number),
            None => return Err(ReferenceError::SubsectionWithoutChapter),
        }
        Ok(self)
    }

    /// Returns the standard code as stored.
    #[must_use]
    pub fn standard_code(&self) -> &str {
        self.standard_code.as_str()
    }

    /// Returns the chapter code, if the reference targets a chapter.
    #[must_use]
    pub fn chapter_code(&self) -> Option<&str> {
        self.target.as_ref().map(|(chapter, _)| chapter.as_str())
    }

    /// Returns the subsection number, if the reference targets a subsection.
    #[must_use]
    pub fn subsection_number(&self) -> Option<&str> {
        self.target
            .as_ref()
            .and_then(|(_, subsection)| subsection.as_ref())
            .map(NonEmptyString::as_str)
    }

    /// Decodes stored attributes.
    ///
    /// Stored values sometimes carry a subsection without a chapter. Such a
    /// chain is cut back to its longest valid prefix, which is also the part
    /// the link target is built from.
    pub(crate) fn decode(attrs: Option<&Map<String, Value>>) -> Option<Self> {
        let attrs = attrs?;
        let field = |name: &str| attrs.get(name).and_then(Value::as_str);

        let standard = field("standardCode");
        let chapter = field("chapterCode").filter(|c| !c.trim().is_empty());
        let subsection = chapter.and(field("subsectionNumber"));
        Self::new(standard, chapter, subsection).ok()
    }

    pub(crate) fn encode(&self) -> Map<String, Value> {
        let optional = |value: Option<&str>| value.map_or(Value::Null, |v| Value::String(v.into()));

        let mut map = Map::new();
        map.insert(
            "standardCode".to_string(),
            Value::String(self.standard_code().to_string()),
        );
        map.insert("chapterCode".to_string(), optional(self.chapter_code()));
        map.insert(
            "subsectionNumber".to_string(),
            optional(self.subsection_number()),
        );
        map
    }
}

impl fmt::Display for ReferenceAttrs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.standard_code.as_str().to_uppercase())?;
        if let Some(chapter) = self.chapter_code() {
            write!(f, " {chapter}")?;
        }
        if let Some(subsection) = self.subsection_number() {
            write!(f, ".{subsection}")?;
        }
        Ok(())
    }
}

/// Errors raised when building a [`ReferenceAttrs`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// No standard code was given.
    #[error("a reference needs a standard code")]
    MissingStandard,

    /// A subsection was given without the chapter that contains it.
    #[error("a subsection reference needs a chapter code")]
    SubsectionWithoutChapter,

    /// The chapter code was empty.
    #[error("chapter code must not be empty")]
    EmptyChapter,

    /// The subsection number was empty.
    #[error("subsection number must not be empty")]
    EmptySubsection,
}

fn present(value: Option<&str>) -> Option<NonEmptyString> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| NonEmptyString::new(v.to_string()).ok())
}

fn required(value: String) -> Result<NonEmptyString, ReferenceError> {
    present(Some(&value)).ok_or(ReferenceError::MissingStandard)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attrs(value: &Value) -> Option<&Map<String, Value>> {
        value.as_object()
    }

    #[test]
    fn link_keeps_attributes_besides_href() {
        let stored = json!({"href": "https://ojk.go.id", "target": "_self", "rel": null, "class": "ext"});
        let link = LinkAttrs::decode(attrs(&stored)).unwrap();
        assert_eq!(link.href(), "https://ojk.go.id");
        assert_eq!(link.extra().get("target"), Some(&json!("_self")));
        assert_eq!(Value::Object(link.encode()), stored);
    }

    #[test]
    fn full_chain_is_accepted() {
        let reference = ReferenceAttrs::new(Some("pojk11"), Some("02"), Some("6")).unwrap();
        assert_eq!(reference.standard_code(), "pojk11");
        assert_eq!(reference.chapter_code(), Some("02"));
        assert_eq!(reference.subsection_number(), Some("6"));
    }

    #[test]
    fn subsection_without_chapter_is_rejected() {
        let error = ReferenceAttrs::new(Some("pojk11"), None, Some("6")).unwrap_err();
        assert_eq!(error, ReferenceError::SubsectionWithoutChapter);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(
            ReferenceAttrs::new(Some(""), Some("02"), None).unwrap_err(),
            ReferenceError::MissingStandard
        );

        let reference = ReferenceAttrs::new(Some("pojk11"), Some(""), Some("")).unwrap();
        assert_eq!(reference.chapter_code(), None);
        assert_eq!(reference.subsection_number(), None);
    }

    #[test]
    fn builder_enforces_chain() {
        let error = ReferenceAttrs::standard("pojk11")
            .unwrap()
            .with_subsection("6")
            .unwrap_err();
        assert_eq!(error, ReferenceError::SubsectionWithoutChapter);

        let reference = ReferenceAttrs::standard("pojk11")
            .unwrap()
            .with_chapter("02")
            .unwrap()
            .with_subsection("6")
            .unwrap();
        assert_eq!(reference.to_string(), "POJK11 02.6");
    }

    #[test]
    fn decode_truncates_broken_chain() {
        let stored = json!({"standardCode": "pojk11", "chapterCode": null, "subsectionNumber": "6"});
        let reference = ReferenceAttrs::decode(attrs(&stored)).unwrap();
        assert_eq!(reference.chapter_code(), None);
        assert_eq!(reference.subsection_number(), None);
    }

    #[test]
    fn decode_without_standard_fails() {
        let stored = json!({"standardCode": null, "chapterCode": "02", "subsectionNumber": "6"});
        assert!(ReferenceAttrs::decode(attrs(&stored)).is_none());
        assert!(ReferenceAttrs::decode(None).is_none());
    }

    #[test]
    fn encode_writes_nulls_for_absent_parts() {
        let reference = ReferenceAttrs::standard("pojk11").unwrap();
        assert_eq!(
            Value::Object(reference.encode()),
            json!({"standardCode": "pojk11", "chapterCode": null, "subsectionNumber": null})
        );
    }

    #[test]
    fn blank_tooltip_is_rejected() {
        assert_eq!(
            TooltipAttrs::new("   ").unwrap_err(),
            TooltipError::EmptyDefinition
        );
        assert!(TooltipAttrs::decode(attrs(&json!({"definition": ""}))).is_none());
    }

    #[test]
    fn tooltip_keeps_definition_verbatim() {
        let tooltip = TooltipAttrs::new("Aset Tertimbang Menurut Risiko").unwrap();
        assert_eq!(tooltip.definition(), "Aset Tertimbang Menurut Risiko");
    }

    #[test]
    fn link_without_href_fails_to_decode() {
        assert!(LinkAttrs::decode(attrs(&json!({}))).is_none());
        let link = LinkAttrs::decode(attrs(&json!({"href": "not a url"}))).unwrap();
        assert_eq!(link.href(), "not a url");
    }
}
