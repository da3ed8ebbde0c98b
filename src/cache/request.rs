//! Requested attributes and their resolutions.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::error::ContentError;

/// Ordered list of attribute names, each with an optional default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRequest {
    entries: Vec<(String, Option<String>)>,
}

impl AttributeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `name` without a default; an undeclared attribute resolves to
    /// [`Attribute::Missing`].
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.insert(name, Some(default.into()));
        self
    }

    /// Add or replace a request; a repeated name keeps its first position.
    pub fn insert(&mut self, name: impl Into<String>, default: Option<String>) {
        let name = name.into();
        match self.entries.iter().position(|(existing, _)| *existing == name) {
            Some(index) => self.entries[index].1 = default,
            None => self.entries.push((name, default)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, default)| (name.as_str(), default.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every requested name against `lookup`, falling back to defaults.
    pub(crate) fn resolve<F>(&self, mut lookup: F) -> AttributeSet
    where
        F: FnMut(&str) -> Option<String>,
    {
        let entries = self
            .entries
            .iter()
            .map(|(name, default)| {
                let resolution = match (lookup(name), default) {
                    (Some(value), _) => Resolution::Found(value),
                    (None, Some(default)) => Resolution::Defaulted(default.clone()),
                    (None, None) => Resolution::Missing,
                };
                (name.clone(), resolution)
            })
            .collect();
        AttributeSet { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    Defaulted(String),
    Missing,
}

/// Per-name outcome of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute<'a> {
    /// The document declares the attribute.
    Found(&'a str),
    /// The document does not declare it; the caller's default was used.
    Defaulted(&'a str),
    /// Requested without a default and not declared.
    Missing,
    /// Never requested.
    NotRequested,
}

impl<'a> Attribute<'a> {
    pub fn value(self) -> Option<&'a str> {
        match self {
            Attribute::Found(value) | Attribute::Defaulted(value) => Some(value),
            Attribute::Missing | Attribute::NotRequested => None,
        }
    }
}

/// Resolved attributes, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: Vec<(String, Resolution)>,
}

impl AttributeSet {
    pub fn lookup(&self, name: &str) -> Attribute<'_> {
        match self.entries.iter().find(|(existing, _)| existing == name) {
            Some((_, Resolution::Found(value))) => Attribute::Found(value),
            Some((_, Resolution::Defaulted(value))) => Attribute::Defaulted(value),
            Some((_, Resolution::Missing)) => Attribute::Missing,
            None => Attribute::NotRequested,
        }
    }

    /// Declared value or the caller's default.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.lookup(name).value()
    }

    /// Declared value only.
    pub fn found(&self, name: &str) -> Option<&str> {
        match self.lookup(name) {
            Attribute::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn require(&self, name: &str) -> Result<&str, ContentError> {
        self.value(name).ok_or_else(|| ContentError::MissingRequired {
            name: name.to_string(),
        })
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Resolution> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Attribute<'_>)> {
        self.entries.iter().map(|(name, resolution)| {
            let attribute = match resolution {
                Resolution::Found(value) => Attribute::Found(value),
                Resolution::Defaulted(value) => Attribute::Defaulted(value),
                Resolution::Missing => Attribute::Missing,
            };
            (name.as_str(), attribute)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as a map of name to value, with `null` for missing attributes.
impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, attribute) in self.iter() {
            map.serialize_entry(name, &attribute.value())?;
        }
        map.end()
    }
}
