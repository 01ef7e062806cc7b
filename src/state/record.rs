/// Idea record definitions
///
/// An idea record is an ordered mapping from output key to extracted text.
/// Key order is insertion order and survives serialization, so JSON objects
/// and CSV columns come out in the order fields were extracted.
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Named fields an extractor can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Idea title (required)
    Title,
    /// Link to the idea's detail page
    Url,
    /// Current state of the idea in the evaluation workflow
    State,
    /// Department the idea was submitted to
    Department,
    /// Demand the idea answers
    Demand,
    /// Team members listed on the detail page
    Team,
    /// Comments region of the detail page
    Comments,
    /// Supplementary material region of the detail page
    Supplements,
}

impl Field {
    /// Returns the key this field is stored under in records and output files
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "idea_titulo",
            Self::Url => "idea_url",
            Self::State => "idea_estado",
            Self::Department => "idea_departamento",
            Self::Demand => "idea_demanda",
            Self::Team => "idea_equipe",
            Self::Comments => "idea_comentarios",
            Self::Supplements => "idea_complementos",
        }
    }

    /// Parses a field from its output key
    ///
    /// Returns None if the key doesn't match any known field.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|field| field.key() == key)
    }

    /// Returns all known fields
    pub fn all() -> Vec<Self> {
        vec![
            Self::Title,
            Self::Url,
            Self::State,
            Self::Department,
            Self::Demand,
            Self::Team,
            Self::Comments,
            Self::Supplements,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One extracted idea
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaRecord {
    fields: Vec<(String, String)>,
}

impl IdeaRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the key's original position if present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Sets a named field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.insert(field.key(), value);
    }

    /// Builder-style `set`
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of a named field
    pub fn field(&self, field: Field) -> Option<&str> {
        self.get(field.key())
    }

    /// Returns the idea title, if extracted
    pub fn title(&self) -> Option<&str> {
        self.field(Field::Title)
    }

    /// Returns the idea URL, if extracted
    pub fn url(&self) -> Option<&str> {
        self.field(Field::Url)
    }

    /// Iterates keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for IdeaRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IdeaRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = IdeaRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of idea fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut record = IdeaRecord::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(text) => record.insert(key, text),
                other => record.insert(key, other.to_string()),
            }
        }
        Ok(record)
    }
}
