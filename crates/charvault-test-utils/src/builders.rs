//! Builder patterns for constructing test objects.

use charvault_snapshot::{CharacterDocument, SectionId, SectionValue};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Builder for character documents with a fixed id and creation time.
///
/// # Example
///
/// ```rust
/// use charvault_test_utils::builders::CharacterBuilder;
///
/// let doc = CharacterBuilder::new("chr_test", "Aldric")
///     .description("A tall knight.")
///     .tags(["knight", "hero"])
///     .build();
///
/// assert_eq!(doc.name(), Some("Aldric"));
/// ```
pub struct CharacterBuilder {
    document: CharacterDocument,
}

impl CharacterBuilder {
    /// Start a character with a name. Created at 2024-01-01 00:00 UTC.
    pub fn new(id: &str, name: &str) -> Self {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            document: CharacterDocument::with_id(id, created)
                .with_section(SectionId::Name, SectionValue::text(name)),
        }
    }

    /// Override the creation time.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.document.created_at = at;
        self.document.updated_at = at;
        self
    }

    /// Set any text section.
    pub fn text(mut self, section: SectionId, text: &str) -> Self {
        self.document.set_section(section, SectionValue::text(text));
        self
    }

    pub fn description(self, text: &str) -> Self {
        self.text(SectionId::Description, text)
    }

    pub fn personality(self, text: &str) -> Self {
        self.text(SectionId::Personality, text)
    }

    pub fn scenario(self, text: &str) -> Self {
        self.text(SectionId::Scenario, text)
    }

    pub fn first_message(self, text: &str) -> Self {
        self.text(SectionId::FirstMessage, text)
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document
            .set_section(SectionId::Tags, SectionValue::list(tags));
        self
    }

    pub fn greetings<I, S>(mut self, greetings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document
            .set_section(SectionId::AlternateGreetings, SectionValue::list(greetings));
        self
    }

    pub fn lorebook(mut self, record: Value) -> Self {
        self.document
            .set_section(SectionId::Lorebook, SectionValue::Record(record));
        self
    }

    pub fn image(mut self, reference: &str) -> Self {
        self.document
            .set_section(SectionId::Image, SectionValue::image(reference));
        self
    }

    /// Set a raw value, including ones that would not pass validation.
    pub fn raw(mut self, section: SectionId, value: SectionValue) -> Self {
        self.document.set_section(section, value);
        self
    }

    pub fn build(self) -> CharacterDocument {
        self.document
    }
}
