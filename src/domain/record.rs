//! Record set model
//!
//! Records arrive from the source as flat JSON objects whose fields vary per
//! table. A [`RecordSet`] keeps them as rows aligned to one ordered column
//! list, with null and empty-string values normalized to [`FieldValue::Absent`].

use super::errors::AtsError;
use super::result::Result;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A single raw record as returned by the source
pub type Record = Map<String, Value>;

/// Scalar field value after normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// The source sent null, an empty string, or did not send the field at all
    #[default]
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    /// Normalizes a JSON value
    ///
    /// Nested arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::String(s) if s.is_empty() => FieldValue::Absent,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map_or(FieldValue::Absent, FieldValue::Number),
            Value::Bool(b) => FieldValue::Bool(*b),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Text rendering of a present value, `None` when absent
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            other => Some(other.to_string()),
        }
    }

    /// Reads the value as a quantity
    ///
    /// Absent stays `None`; numeric text is parsed. Anything else, including
    /// text such as "NaN" or "inf", is an error message naming the value.
    pub fn to_quantity(&self) -> std::result::Result<Option<f64>, String> {
        match self {
            FieldValue::Absent => Ok(None),
            FieldValue::Number(n) => Ok(Some(*n)),
            FieldValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(format!("'{s}' is not a number")),
            },
            FieldValue::Bool(b) => Err(format!("'{b}' is not a number")),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => Ok(()),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Absent => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// What to do when two records produce the same index key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`AtsError::DuplicateKey`]
    #[default]
    Reject,
    /// Keep every row, but the key resolves to the last row carrying it
    LastWins,
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [FieldValue],
}

impl<'a> Row<'a> {
    /// Value of the named field, `None` if the column does not exist
    pub fn get(&self, name: &str) -> Option<&'a FieldValue> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| &values[i])
    }

    pub fn values(&self) -> &'a [FieldValue] {
        self.values
    }
}

impl Serialize for Row<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Tabular result of a fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl RecordSet {
    /// Creates an empty record set with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a record set from raw records
    ///
    /// Columns are the union of all field names in first-seen order. Records
    /// that lack a field get [`FieldValue::Absent`] for it.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in &records {
            for key in record.keys() {
                if !positions.contains_key(key) {
                    positions.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![FieldValue::Absent; columns.len()];
                for (key, value) in record {
                    row[positions[key]] = FieldValue::from_json(value);
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Row at `index`, if any
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Value at (`row`, `column`)
    pub fn get(&self, row: usize, column: &str) -> Option<&FieldValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[col])
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Restricts and reorders the columns to exactly `fields`
    ///
    /// An empty record set yields an empty set with those columns. A field
    /// missing from a non-empty set is a [`AtsError::Shape`] error.
    pub fn project(&self, fields: &[String]) -> Result<RecordSet> {
        if self.rows.is_empty() {
            return Ok(RecordSet::new(fields.to_vec()));
        }

        let indices = fields
            .iter()
            .map(|field| {
                self.column_index(field).ok_or_else(|| {
                    AtsError::Shape(format!(
                        "field '{field}' not present in result set (available: {})",
                        self.columns.join(", ")
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(RecordSet {
            columns: fields.to_vec(),
            rows,
        })
    }

    /// Renames columns positionally
    ///
    /// `names` must have exactly as many entries as there are columns.
    pub fn rename_columns(mut self, names: &[&str]) -> Result<RecordSet> {
        if names.len() != self.columns.len() {
            return Err(AtsError::Shape(format!(
                "cannot rename {} columns ({}) to {} names ({})",
                self.columns.len(),
                self.columns.join(", "),
                names.len(),
                names.join(", ")
            )));
        }
        self.columns = names.iter().map(|n| n.to_string()).collect();
        Ok(self)
    }

    /// Keys the record set by a field combination
    ///
    /// An empty set yields an empty index whatever its columns.
    pub fn index_by(self, fields: &[String], policy: DuplicateKeys) -> Result<IndexedRecordSet> {
        if self.rows.is_empty() {
            return Ok(IndexedRecordSet {
                records: self,
                key_fields: fields.to_vec(),
                index: HashMap::new(),
            });
        }

        let indices = fields
            .iter()
            .map(|field| {
                self.column_index(field).ok_or_else(|| {
                    AtsError::Shape(format!("index field '{field}' not present in result set"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut index = HashMap::with_capacity(self.rows.len());
        for (position, row) in self.rows.iter().enumerate() {
            let key: Vec<String> = indices.iter().map(|&i| row[i].to_string()).collect();
            if let Some(previous) = index.insert(key.clone(), position) {
                match policy {
                    DuplicateKeys::Reject => {
                        return Err(AtsError::DuplicateKey(format!(
                            "[{}] at rows {previous} and {position}",
                            key.join(", ")
                        )))
                    }
                    DuplicateKeys::LastWins => {
                        tracing::debug!(key = ?key, previous, position, "Index key overwritten");
                    }
                }
            }
        }

        Ok(IndexedRecordSet {
            records: self,
            key_fields: fields.to_vec(),
            index,
        })
    }
}

impl Serialize for RecordSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.iter() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

/// A record set keyed by a field combination
///
/// Key parts are the text rendering of each field and absent values render
/// as "". Keys are compared as text, so `Number(10.0)` and `Text("10")` are
/// the same key. Numbers arrive as `f64`, so integer codes above 2^53 may
/// not round-trip exactly; such codes should be sent as text.
#[derive(Debug, Clone)]
pub struct IndexedRecordSet {
    records: RecordSet,
    key_fields: Vec<String>,
    index: HashMap<Vec<String>, usize>,
}

impl IndexedRecordSet {
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn into_records(self) -> RecordSet {
        self.records
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Restricts the columns to `fields` and keeps every key
    ///
    /// Row positions are unchanged, so lookups still resolve.
    pub fn project(self, fields: &[String]) -> Result<IndexedRecordSet> {
        Ok(IndexedRecordSet {
            records: self.records.project(fields)?,
            key_fields: self.key_fields,
            index: self.index,
        })
    }

    /// Looks up the row for a key, one part per key field
    pub fn get<K: AsRef<str>>(&self, key: &[K]) -> Option<Row<'_>> {
        let key: Vec<String> = key.iter().map(|k| k.as_ref().to_string()).collect();
        self.index.get(&key).and_then(|&i| self.records.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Value) -> Vec<Record> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_null_and_empty_string_become_absent() {
        let set = RecordSet::from_records(records(json!([
            {"number": "1896-S", "locationCode": "", "outstandingQuantity": null}
        ])));

        assert_eq!(
            set.get(0, "number"),
            Some(&FieldValue::Text("1896-S".to_string()))
        );
        assert!(set.get(0, "locationCode").unwrap().is_absent());
        assert!(set.get(0, "outstandingQuantity").unwrap().is_absent());
    }

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let set = RecordSet::from_records(records(json!([
            {"b": 1, "a": 2},
            {"a": 3, "c": 4}
        ])));

        assert_eq!(set.columns(), &fields(&["b", "a", "c"])[..]);
        assert!(set.get(0, "c").unwrap().is_absent());
        assert!(set.get(1, "b").unwrap().is_absent());
        assert_eq!(set.get(1, "c"), Some(&FieldValue::Number(4.0)));
    }

    #[test]
    fn test_project_restricts_and_reorders() {
        let set = RecordSet::from_records(records(json!([
            {"qty": 3, "warehouse": "EAST", "sku": "A"}
        ])));

        let projected = set.project(&fields(&["sku", "warehouse"])).unwrap();
        assert_eq!(projected.columns(), &fields(&["sku", "warehouse"])[..]);
        assert_eq!(
            projected.row(0).unwrap().values(),
            &[
                FieldValue::Text("A".to_string()),
                FieldValue::Text("EAST".to_string())
            ]
        );
    }

    #[test]
    fn test_project_empty_set_keeps_requested_columns() {
        let set = RecordSet::from_records(Vec::new());
        let projected = set.project(&fields(&["sku", "warehouse", "PO"])).unwrap();
        assert!(projected.is_empty());
        assert_eq!(projected.columns(), &fields(&["sku", "warehouse", "PO"])[..]);
    }

    #[test]
    fn test_project_missing_field_is_shape_error() {
        let set = RecordSet::from_records(records(json!([{"sku": "A"}])));
        let result = set.project(&fields(&["sku", "warehouse"]));
        assert!(matches!(result, Err(AtsError::Shape(_))));
    }

    #[test]
    fn test_rename_columns_requires_matching_arity() {
        let set = RecordSet::new(fields(&["number", "locationCode"]));
        assert!(set.clone().rename_columns(&["sku"]).is_err());
        let renamed = set.rename_columns(&["sku", "warehouse"]).unwrap();
        assert_eq!(renamed.columns(), &fields(&["sku", "warehouse"])[..]);
    }

    #[test]
    fn test_index_by_rejects_duplicates_by_default() {
        let set = RecordSet::from_records(records(json!([
            {"sku": "A", "warehouse": "EAST"},
            {"sku": "A", "warehouse": "EAST"}
        ])));

        let result = set.index_by(&fields(&["sku", "warehouse"]), DuplicateKeys::default());
        assert!(matches!(result, Err(AtsError::DuplicateKey(_))));
    }

    #[test]
    fn test_index_by_last_wins() {
        let set = RecordSet::from_records(records(json!([
            {"sku": "A", "qty": 1},
            {"sku": "B", "qty": 2},
            {"sku": "A", "qty": 3}
        ])));

        let indexed = set
            .index_by(&fields(&["sku"]), DuplicateKeys::LastWins)
            .unwrap();
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed.records().len(), 3);
        assert_eq!(
            indexed.get(&["A"]).unwrap().get("qty"),
            Some(&FieldValue::Number(3.0))
        );
        assert!(indexed.get(&["C"]).is_none());
    }

    #[test]
    fn test_to_quantity() {
        assert_eq!(FieldValue::Absent.to_quantity(), Ok(None));
        assert_eq!(FieldValue::Number(2.5).to_quantity(), Ok(Some(2.5)));
        assert_eq!(
            FieldValue::Text(" 7 ".to_string()).to_quantity(),
            Ok(Some(7.0))
        );
        assert!(FieldValue::Text("seven".to_string()).to_quantity().is_err());
    }

    #[test]
    fn test_to_quantity_rejects_non_finite_text() {
        for text in ["NaN", "inf", "-infinity", "Infinity"] {
            let err = FieldValue::Text(text.to_string()).to_quantity().unwrap_err();
            assert!(err.contains(text));
        }
    }

    #[test]
    fn test_index_keys_compare_as_text() {
        let set = RecordSet::from_records(records(json!([
            {"code": 10, "qty": 1},
            {"code": "10", "qty": 2}
        ])));

        let result = set.clone().index_by(&fields(&["code"]), DuplicateKeys::Reject);
        assert!(matches!(result, Err(AtsError::DuplicateKey(_))));

        let indexed = set
            .index_by(&fields(&["code"]), DuplicateKeys::LastWins)
            .unwrap();
        assert_eq!(indexed.len(), 1);
        assert_eq!(
            indexed.get(&["10"]).unwrap().get("qty"),
            Some(&FieldValue::Number(2.0))
        );
    }

    #[test]
    fn test_index_by_empty_set() {
        let indexed = RecordSet::from_records(Vec::new())
            .index_by(&fields(&["sku"]), DuplicateKeys::Reject)
            .unwrap();
        assert!(indexed.is_empty());
        assert_eq!(indexed.key_fields(), &fields(&["sku"])[..]);
    }

    #[test]
    fn test_indexed_projection_keeps_lookups() {
        let set = RecordSet::from_records(records(json!([
            {"sku": "A", "warehouse": "EAST", "qty": 1},
            {"sku": "B", "warehouse": "WEST", "qty": 2}
        ])));

        let indexed = set
            .index_by(&fields(&["sku"]), DuplicateKeys::Reject)
            .unwrap()
            .project(&fields(&["sku", "qty"]))
            .unwrap();

        let row = indexed.get(&["B"]).unwrap();
        assert_eq!(row.get("qty"), Some(&FieldValue::Number(2.0)));
        assert!(row.get("warehouse").is_none());
    }

    #[test]
    fn test_serialize_rows_as_objects() {
        let set = RecordSet::from_records(records(json!([
            {"sku": "A", "note": ""}
        ])));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, json!([{"sku": "A", "note": null}]));
    }
}
