//! Column-to-field mapping handed from the mapper to the validator.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::field::TargetField;

/// Mapping from spreadsheet header to target field, in column order.
///
/// Each header maps to at most one field. Several headers may target the
/// same field; the validator processes columns left to right, so the last
/// such column wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<(String, Option<TargetField>)>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every header unmapped.
    pub fn unmapped(headers: &[String]) -> Self {
        Self {
            entries: headers.iter().map(|header| (header.clone(), None)).collect(),
        }
    }

    /// Set or clear the field for `header`, appending unknown headers.
    pub fn set(&mut self, header: &str, field: Option<TargetField>) {
        match self.entries.iter_mut().find(|(known, _)| known == header) {
            Some(entry) => entry.1 = field,
            None => self.entries.push((header.to_string(), field)),
        }
    }

    pub fn get(&self, header: &str) -> Option<TargetField> {
        self.entries
            .iter()
            .find(|(known, _)| known == header)
            .and_then(|(_, field)| *field)
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.entries.iter().any(|(known, _)| known == header)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<TargetField>)> {
        self.entries
            .iter()
            .map(|(header, field)| (header.as_str(), *field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|(_, field)| field.is_some()).count()
    }

    pub fn is_mapped(&self, field: TargetField) -> bool {
        self.entries.iter().any(|(_, target)| *target == Some(field))
    }

    /// Required fields with no column mapped to them, in schema order.
    pub fn missing_required(&self) -> Vec<TargetField> {
        TargetField::required()
            .filter(|field| !self.is_mapped(*field))
            .collect()
    }

    /// Fields targeted by more than one column, with those columns in order.
    pub fn duplicate_targets(&self) -> BTreeMap<TargetField, Vec<String>> {
        let mut by_field: BTreeMap<TargetField, Vec<String>> = BTreeMap::new();
        for (header, field) in &self.entries {
            if let Some(field) = field {
                by_field.entry(*field).or_default().push(header.clone());
            }
        }
        by_field.retain(|_, headers| headers.len() > 1);
        by_field
    }
}

impl Serialize for FieldMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (header, field) in &self.entries {
            map.serialize_entry(header, field)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut mapping = FieldMapping::unmapped(&["A".into(), "B".into()]);
        mapping.set("B", Some(TargetField::Email));
        mapping.set("A", Some(TargetField::FullName));
        mapping.set("B", None);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("A"), Some(TargetField::FullName));
        assert_eq!(mapping.get("B"), None);
    }

    #[test]
    fn missing_required_in_schema_order() {
        let mut mapping = FieldMapping::new();
        mapping.set("Họ tên", Some(TargetField::FullName));
        mapping.set("Giới tính", Some(TargetField::Gender));
        assert_eq!(
            mapping.missing_required(),
            vec![
                TargetField::PhoneNumber,
                TargetField::Address,
                TargetField::Dob
            ]
        );
    }

    #[test]
    fn reports_duplicate_targets() {
        let mut mapping = FieldMapping::new();
        mapping.set("SĐT", Some(TargetField::PhoneNumber));
        mapping.set("Di động", Some(TargetField::PhoneNumber));
        mapping.set("Email", Some(TargetField::Email));
        let duplicates = mapping.duplicate_targets();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[&TargetField::PhoneNumber], vec!["SĐT", "Di động"]);
    }

    #[test]
    fn serializes_as_object_with_nulls() {
        let mut mapping = FieldMapping::new();
        mapping.set("Họ tên", Some(TargetField::FullName));
        mapping.set("STT", None);
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Họ tên":"fullName","STT":null}"#);
    }
}
