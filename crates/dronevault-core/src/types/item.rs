//! Secret store records as returned by the REST API

use serde::{Deserialize, Serialize};

/// A vault as returned by the vault listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Vault {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Lightweight item handle returned by a title search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl ItemSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A fully loaded item: fields, sections and notes
///
/// Decoded once per resolution and never mutated afterwards. Any array or
/// string the store omits decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes_plain: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Item {
    /// Create an empty item with the given title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a section
    pub fn with_section(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.sections.push(Section {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    /// Set the plain-text notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes_plain = notes.into();
        self
    }
}

/// A single labeled value within an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    /// Semantic purpose, e.g. `PASSWORD`; empty when untagged
    #[serde(default)]
    pub purpose: String,
    #[serde(default, rename = "type")]
    pub field_type: String,
    /// Owning section, by id only
    #[serde(default)]
    pub section: Option<SectionRef>,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Tag the field as the item's password
    pub fn password(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value).with_purpose("PASSWORD")
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section = Some(SectionRef {
            id: section_id.into(),
        });
        self
    }

    /// Fields without a value are treated as unset and never match
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Id of the section this field belongs to, if any
    pub fn section_id(&self) -> Option<&str> {
        self.section.as_ref().map(|s| s.id.as_str())
    }
}

/// Back-reference from a field to its section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    pub id: String,
}

/// A named grouping of fields; labels are not unique within an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub label: String,
}
