//! The character document and its sections.

use crate::error::{SnapshotError, SnapshotResult};
use charvault_util::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Shape of the value a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Text,
    List,
    Record,
    Image,
}

/// Identifier of one logical section of a character.
///
/// Declaration order is the order sections appear in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Name,
    Description,
    Personality,
    Scenario,
    FirstMessage,
    AlternateGreetings,
    ExampleMessages,
    SystemPrompt,
    PostHistoryInstructions,
    CreatorNotes,
    Tags,
    Creator,
    CharacterVersion,
    Lorebook,
    Image,
}

impl SectionId {
    /// Every section, in diff order.
    pub const ALL: [SectionId; 15] = [
        SectionId::Name,
        SectionId::Description,
        SectionId::Personality,
        SectionId::Scenario,
        SectionId::FirstMessage,
        SectionId::AlternateGreetings,
        SectionId::ExampleMessages,
        SectionId::SystemPrompt,
        SectionId::PostHistoryInstructions,
        SectionId::CreatorNotes,
        SectionId::Tags,
        SectionId::Creator,
        SectionId::CharacterVersion,
        SectionId::Lorebook,
        SectionId::Image,
    ];

    /// Stable identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Name => "name",
            SectionId::Description => "description",
            SectionId::Personality => "personality",
            SectionId::Scenario => "scenario",
            SectionId::FirstMessage => "first_message",
            SectionId::AlternateGreetings => "alternate_greetings",
            SectionId::ExampleMessages => "example_messages",
            SectionId::SystemPrompt => "system_prompt",
            SectionId::PostHistoryInstructions => "post_history_instructions",
            SectionId::CreatorNotes => "creator_notes",
            SectionId::Tags => "tags",
            SectionId::Creator => "creator",
            SectionId::CharacterVersion => "character_version",
            SectionId::Lorebook => "lorebook",
            SectionId::Image => "image",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Name => "Name",
            SectionId::Description => "Description",
            SectionId::Personality => "Personality",
            SectionId::Scenario => "Scenario",
            SectionId::FirstMessage => "First Message",
            SectionId::AlternateGreetings => "Alternate Greetings",
            SectionId::ExampleMessages => "Example Messages",
            SectionId::SystemPrompt => "System Prompt",
            SectionId::PostHistoryInstructions => "Post-History Instructions",
            SectionId::CreatorNotes => "Creator Notes",
            SectionId::Tags => "Tags",
            SectionId::Creator => "Creator",
            SectionId::CharacterVersion => "Character Version",
            SectionId::Lorebook => "Lorebook",
            SectionId::Image => "Image",
        }
    }

    /// The kind of value this section holds.
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionId::AlternateGreetings | SectionId::Tags => SectionKind::List,
            SectionId::Lorebook => SectionKind::Record,
            SectionId::Image => SectionKind::Image,
            _ => SectionKind::Text,
        }
    }

    /// Parse a section identifier. Accepts `-` in place of `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|id| id.as_str() == wanted)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of one section.
///
/// Persisted as `{"kind": "...", "value": ...}`. A persisted kind this
/// build does not know becomes [`SectionValue::Unrecognized`] instead of
/// failing the whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSectionValue", into = "RawSectionValue")]
pub enum SectionValue {
    #[default]
    Empty,
    Text(String),
    List(Vec<String>),
    /// Structured sub-record such as a lorebook.
    Record(Value),
    /// Reference to an image (path, URL or data URI).
    Image(String),
    Unrecognized { kind: String, raw: Value },
}

impl SectionValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn image(reference: impl Into<String>) -> Self {
        Self::Image(reference.into())
    }

    /// Whether the value satisfies the section's kind. `Empty` fits every kind.
    pub fn fits(&self, kind: SectionKind) -> bool {
        matches!(
            (self, kind),
            (SectionValue::Empty, _)
                | (SectionValue::Text(_), SectionKind::Text)
                | (SectionValue::List(_), SectionKind::List)
                | (SectionValue::Record(_), SectionKind::Record)
                | (SectionValue::Image(_), SectionKind::Image)
        )
    }

    fn kind_name(&self) -> &str {
        match self {
            SectionValue::Empty => "empty",
            SectionValue::Text(_) => "text",
            SectionValue::List(_) => "list",
            SectionValue::Record(_) => "record",
            SectionValue::Image(_) => "image",
            SectionValue::Unrecognized { kind, .. } => kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawSectionValue {
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    value: Value,
}

impl From<RawSectionValue> for SectionValue {
    fn from(raw: RawSectionValue) -> Self {
        let RawSectionValue { kind, value } = raw;
        match (kind.as_str(), value) {
            ("empty", _) => SectionValue::Empty,
            ("text", Value::String(s)) => SectionValue::Text(s),
            ("list", Value::Array(items)) if items.iter().all(Value::is_string) => {
                SectionValue::List(
                    items
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            ("record", value) => SectionValue::Record(value),
            ("image", Value::String(s)) => SectionValue::Image(s),
            (_, value) => SectionValue::Unrecognized {
                kind: kind.clone(),
                raw: value,
            },
        }
    }
}

impl From<SectionValue> for RawSectionValue {
    fn from(value: SectionValue) -> Self {
        let (kind, value) = match value {
            SectionValue::Empty => ("empty".to_string(), Value::Null),
            SectionValue::Text(s) => ("text".to_string(), Value::String(s)),
            SectionValue::List(items) => (
                "list".to_string(),
                Value::Array(items.into_iter().map(Value::String).collect()),
            ),
            SectionValue::Record(v) => ("record".to_string(), v),
            SectionValue::Image(s) => ("image".to_string(), Value::String(s)),
            SectionValue::Unrecognized { kind, raw } => (kind, raw),
        };
        RawSectionValue { kind, value }
    }
}

static EMPTY: SectionValue = SectionValue::Empty;

/// A character record: identity fields plus one value per section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDocument {
    /// Document id. Never touched by restore.
    pub id: String,

    /// When the character was created. Never touched by restore.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    sections: BTreeMap<SectionId, SectionValue>,
}

impl CharacterDocument {
    /// Create a new character with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Identifier::character(), Utc::now())
            .with_section(SectionId::Name, SectionValue::text(name))
    }

    /// Create an empty document with a given id and creation time.
    pub fn with_id(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            updated_at: created_at,
            sections: BTreeMap::new(),
        }
    }

    /// Builder-style section setter.
    pub fn with_section(mut self, id: SectionId, value: SectionValue) -> Self {
        self.set_section(id, value);
        self
    }

    /// Value of a section. Missing sections read as [`SectionValue::Empty`].
    pub fn section(&self, id: SectionId) -> &SectionValue {
        self.sections.get(&id).unwrap_or(&EMPTY)
    }

    /// Replace a section's value. Setting `Empty` drops the section.
    pub fn set_section(&mut self, id: SectionId, value: SectionValue) {
        if value == SectionValue::Empty {
            self.sections.remove(&id);
        } else {
            self.sections.insert(id, value);
        }
    }

    /// Display name, if the name section holds text.
    pub fn name(&self) -> Option<&str> {
        match self.section(SectionId::Name) {
            SectionValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Check the document is fit to be persisted.
    pub fn validate(&self) -> SnapshotResult<()> {
        if self.id.trim().is_empty() {
            return Err(SnapshotError::validation("document id is empty"));
        }

        match self.name() {
            Some(name) if !name.trim().is_empty() => {}
            _ => return Err(SnapshotError::validation("name must be non-empty text")),
        }

        for (id, value) in &self.sections {
            if !value.fits(id.kind()) {
                return Err(SnapshotError::validation(format!(
                    "section {} cannot hold a {} value",
                    id,
                    value.kind_name()
                )));
            }
        }

        Ok(())
    }
}
