use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use crate::schema::{AttributeKey, ATTRIBUTE_COUNT};

/// One parsed bulk-upload row, keyed by whatever header names the source had.
pub type RawRow = HashMap<String, String>;

/// A partially filled-in planet description.
///
/// Holds exactly one text slot per [`AttributeKey`]; an empty (or
/// whitespace-only) slot means "unspecified" and is never compared. The
/// record is built up front and is read-only once handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRecord {
    values: [String; ATTRIBUTE_COUNT],
}

impl QueryRecord {
    /// A query with every attribute unspecified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the updated record.
    pub fn with(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.values[key.index()] = value.into();
        self
    }

    /// Build a query from `(key, value)` pairs. Later pairs win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (AttributeKey, S)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |query, (key, value)| query.with(key, value))
    }

    /// Project a raw bulk row onto the schema.
    ///
    /// Every schema key is looked up by its exact wire name; missing keys
    /// become empty strings and columns outside the schema are dropped.
    pub fn from_raw_row(row: &RawRow) -> Self {
        let mut query = Self::new();
        for key in AttributeKey::ALL {
            if let Some(value) = row.get(key.as_str()) {
                query.values[key.index()] = value.clone();
            }
        }
        query
    }

    /// Build a query from a form-style JSON object.
    ///
    /// Strings are kept verbatim, numbers and booleans are rendered as text,
    /// and `null` or nested values leave the attribute unspecified.
    pub fn from_json_object(object: &Map<String, JsonValue>) -> Self {
        let mut query = Self::new();
        for key in AttributeKey::ALL {
            if let Some(text) = object.get(key.as_str()).and_then(value_text) {
                query.values[key.index()] = text.into_owned();
            }
        }
        query
    }

    /// Raw value for `key` (empty when unspecified).
    pub fn get(&self, key: AttributeKey) -> &str {
        &self.values[key.index()]
    }

    /// `true` when `key` carries a non-blank value.
    pub fn is_specified(&self, key: AttributeKey) -> bool {
        !self.get(key).trim().is_empty()
    }

    /// Number of attributes carrying a non-blank value.
    pub fn specified_count(&self) -> usize {
        AttributeKey::ALL
            .iter()
            .filter(|key| self.is_specified(**key))
            .count()
    }

    /// `true` when no attribute is specified.
    pub fn is_blank(&self) -> bool {
        self.specified_count() == 0
    }

    /// All `(key, value)` slots in schema order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> + '_ {
        AttributeKey::ALL
            .iter()
            .map(move |key| (*key, self.values[key.index()].as_str()))
    }
}

impl Serialize for QueryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ATTRIBUTE_COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueryRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, JsonValue>::deserialize(deserializer)?;
        Ok(Self::from_json_object(&object))
    }
}

/// One reference entry from the catalog.
///
/// Wraps the original JSON object, including keys outside the schema. The
/// object sits behind an `Arc` so results can hand out the matched record
/// without copying it, and nothing can mutate it after load.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord(Arc<Map<String, JsonValue>>);

impl CatalogRecord {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(Arc::new(fields))
    }

    /// Wrap a JSON value, or `None` if it is not an object.
    pub fn from_value(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// The full underlying object.
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    /// Raw value for an arbitrary field name.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// Text form of a schema attribute, if the record carries a scalar for it.
    pub fn text(&self, key: AttributeKey) -> Option<Cow<'_, str>> {
        self.0.get(key.as_str()).and_then(value_text)
    }

    /// Display label: `planetName`, falling back to `name`.
    pub fn display_name(&self) -> Option<&str> {
        self.0
            .get(AttributeKey::PlanetName.as_str())
            .or_else(|| self.0.get("name"))
            .and_then(JsonValue::as_str)
    }
}

impl Serialize for CatalogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CatalogRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, JsonValue>::deserialize(deserializer).map(Self::new)
    }
}

/// Ordered, read-only set of catalog records.
///
/// Order is load order and doubles as the tie-break order when two records
/// score the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }
}

impl Deref for Catalog {
    type Target = [CatalogRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<CatalogRecord>> for Catalog {
    fn from(records: Vec<CatalogRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<CatalogRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogRecord;
    type IntoIter = std::slice::Iter<'a, CatalogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Why a selection produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum MatchFailure {
    /// The catalog was empty when the match ran.
    #[serde(rename = "no catalog data")]
    #[error("no catalog data")]
    NoCatalogData,
    /// No candidate was accepted.
    ///
    /// With the default configuration a non-empty catalog always yields a
    /// candidate, so this only appears when `MatchConfig::min_score` is set.
    #[serde(rename = "no match found")]
    #[error("no match found")]
    NoMatchFound,
}

/// Outcome of matching one query against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchResult {
    Matched {
        #[serde(rename = "matchedRecord")]
        matched_record: CatalogRecord,
        score: u32,
    },
    Failed {
        error: MatchFailure,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn score(&self) -> Option<u32> {
        match self {
            MatchResult::Matched { score, .. } => Some(*score),
            MatchResult::Failed { .. } => None,
        }
    }

    pub fn matched_record(&self) -> Option<&CatalogRecord> {
        match self {
            MatchResult::Matched { matched_record, .. } => Some(matched_record),
            MatchResult::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<MatchFailure> {
        match self {
            MatchResult::Matched { .. } => None,
            MatchResult::Failed { error } => Some(*error),
        }
    }
}

impl From<MatchFailure> for MatchResult {
    fn from(error: MatchFailure) -> Self {
        MatchResult::Failed { error }
    }
}

/// Result for one bulk row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    /// 1-based position of the row in the input.
    pub row_index: usize,
    /// The row after projection onto the schema.
    pub input: QueryRecord,
    pub result: MatchResult,
}

/// Engine configuration.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: String,
    /// Strip surrounding whitespace from both sides before comparing.
    #[serde(default = "MatchConfig::default_trim_values")]
    pub trim_values: bool,
    /// Minimum score a best candidate needs to count as a match.
    ///
    /// `None` accepts the best candidate whatever it scores, including 0.
    #[serde(default)]
    pub min_score: Option<u32>,
    /// Score bulk rows on the rayon pool. Output order is unaffected.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_version() -> String {
        "v1".to_string()
    }

    pub(crate) fn default_trim_values() -> bool {
        true
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version.trim().is_empty() {
            return Err(MatchError::InvalidConfig(
                "config.version must not be empty".into(),
            ));
        }
        if let Some(min) = self.min_score {
            if min as usize > ATTRIBUTE_COUNT {
                return Err(MatchError::InvalidConfig(format!(
                    "min_score must be <= {ATTRIBUTE_COUNT}, got {min}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            trim_values: Self::default_trim_values(),
            min_score: None,
            use_parallel: false,
        }
    }
}

/// Errors produced by the matching layer.
///
/// Per-row outcomes are reported through [`MatchResult`]; these errors abort
/// the whole call.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid engine configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Bulk input is not an ordered collection of row mappings.
    #[error("malformed bulk input: {0}")]
    MalformedBulkInput(String),
}

/// Validate a JSON bulk payload and turn it into raw rows.
///
/// The payload must be an array of objects. Scalar fields are rendered as
/// text, `null` and nested fields are dropped.
pub fn rows_from_json(value: &JsonValue) -> Result<Vec<RawRow>, MatchError> {
    let items = value.as_array().ok_or_else(|| {
        MatchError::MalformedBulkInput(format!("expected an array of rows, got {}", kind(value)))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let object = item.as_object().ok_or_else(|| {
                MatchError::MalformedBulkInput(format!(
                    "row {} is {}, expected an object",
                    idx + 1,
                    kind(item)
                ))
            })?;
            Ok(object
                .iter()
                .filter_map(|(k, v)| value_text(v).map(|text| (k.clone(), text.into_owned())))
                .collect())
        })
        .collect()
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Render a scalar JSON value as comparable text.
///
/// Whole floats print without a fraction (`1.0` -> `"1"`) so numeric catalog
/// values line up with what a user types.
pub(crate) fn value_text(value: &JsonValue) -> Option<Cow<'_, str>> {
    match value {
        JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
        JsonValue::Number(n) => Some(Cow::Owned(number_text(n))),
        JsonValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
