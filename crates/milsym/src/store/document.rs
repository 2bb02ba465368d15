use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

use crate::convert::FieldDictionary;
use crate::error::{MilsymError, Result};
use crate::model::AttributeSet;
use crate::standard::StandardVersion;

const FAVORITE_ID: &str = "favoriteId";
const STANDARD_VERSION: &str = "standardVersion";
const SYMBOL_TAGS: &str = "symbolTags";

/// One favorite as it appears in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_id: Option<String>,
    pub standard_version: String,
    #[serde(default)]
    pub symbol_tags: String,
    #[serde(flatten)]
    pub fields: FieldDictionary,
}

impl FavoriteRecord {
    pub fn from_set(set: &AttributeSet) -> Self {
        Self {
            favorite_id: set.favorite_id.clone(),
            standard_version: set.standard.as_str().to_string(),
            symbol_tags: set.symbol_tags.clone(),
            fields: set.to_dictionary(),
        }
    }

    /// Read one record from its JSON object.
    ///
    /// Null members are dropped and scalar members are kept as their text;
    /// a nested array or object fails the record.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(MilsymError::Store("favorite is not an object".into()));
        };
        let mut favorite_id = None;
        let mut standard_version = None;
        let mut symbol_tags = String::new();
        let mut fields = FieldDictionary::new();

        for (key, member) in object {
            let Some(text) = scalar_text(&key, member)? else {
                continue;
            };
            match key.as_str() {
                FAVORITE_ID => favorite_id = Some(text),
                STANDARD_VERSION => standard_version = Some(text),
                SYMBOL_TAGS => symbol_tags = text,
                _ => {
                    fields.insert(key, text);
                }
            }
        }

        let standard_version = standard_version
            .ok_or_else(|| MilsymError::Store(format!("favorite has no {STANDARD_VERSION}")))?;
        Ok(Self {
            favorite_id,
            standard_version,
            symbol_tags,
            fields,
        })
    }

    /// Rebuild the attribute set.
    ///
    /// Fails with `UnknownStandard` when the standard tag is not recognized,
    /// or `Coercion` when a field value does not fit its type.
    pub fn to_set(&self) -> Result<AttributeSet> {
        let standard: StandardVersion = self.standard_version.parse()?;
        let mut set = AttributeSet::from_dictionary(&self.fields, standard)?;
        set.favorite_id = self.favorite_id.clone();
        set.symbol_tags = self.symbol_tags.clone();
        Ok(set)
    }
}

fn scalar_text(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(MilsymError::Store(format!("{key} is not a scalar value")))
        }
    }
}

/// Decode records, skipping any that do not rebuild into a set.
pub fn decode_records(records: &[FavoriteRecord]) -> Vec<AttributeSet> {
    let mut sets = Vec::with_capacity(records.len());
    for record in records {
        match record.to_set() {
            Ok(set) => sets.push(set),
            Err(MilsymError::UnknownStandard(standard)) => {
                warn!(
                    favorite_id = record.favorite_id.as_deref().unwrap_or(""),
                    %standard,
                    "skipping favorite with unknown standard"
                );
            }
            Err(e) => {
                warn!(
                    favorite_id = record.favorite_id.as_deref().unwrap_or(""),
                    error = %e,
                    "skipping unreadable favorite"
                );
            }
        }
    }
    sets
}

pub fn encode_sets<'a>(sets: impl IntoIterator<Item = &'a AttributeSet>) -> Vec<FavoriteRecord> {
    sets.into_iter().map(FavoriteRecord::from_set).collect()
}

pub fn from_json(text: &str) -> Result<Vec<FavoriteRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<Value> = serde_json::from_str(text)?;
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match FavoriteRecord::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "skipping malformed favorite"),
        }
    }
    Ok(records)
}

pub fn to_json(records: &[FavoriteRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Read a favorites document; a missing file is an empty list.
pub fn read_document(path: &Path) -> Result<Vec<FavoriteRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    from_json(&content)
}

/// Write a favorites document atomically, creating parent directories.
pub fn write_document(path: &Path, records: &[FavoriteRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| MilsymError::Store(format!("not a file path: {}", path.display())))?;
    let content = to_json(records)?;

    let tmp_file = dir.join(format!(".{}-{}.tmp", file_name.to_string_lossy(), Uuid::new_v4()));
    fs::write(&tmp_file, content)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Field;

    #[test]
    fn record_is_flat_camel_case_json() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525CB2);
        set.favorite_id = Some("fav-1".into());
        set.symbol_tags = "a;b;POINT;x;10121100".into();
        set.set_field(Field::Identity, "3").unwrap();

        let json = to_json(&[FavoriteRecord::from_set(&set)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = &value[0];
        assert_eq!(object["favoriteId"], "fav-1");
        assert_eq!(object["standardVersion"], "2525C_B2");
        assert_eq!(object["symbolTags"], "a;b;POINT;x;10121100");
        assert_eq!(object["affiliation"], "3");
        assert!(object.get("identity").is_none());
    }

    #[test]
    fn record_decodes_back_to_the_same_set() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525D);
        set.favorite_id = Some("fav-2".into());
        set.set_field(Field::SymbolSet, "10").unwrap();
        set.set_field(Field::Speed, "30").unwrap();
        set.set_field(Field::DateTimeValid, "2024-05-01T12:00:00.250Z").unwrap();

        let records = from_json(&to_json(&encode_sets([&set])).unwrap()).unwrap();
        let decoded = decode_records(&records);
        assert_eq!(decoded, vec![set]);
    }

    #[test]
    fn missing_id_and_tags_are_allowed() {
        let records =
            from_json(r#"[{"standardVersion":"2525D","symbolset":"25","echelon":"13"}]"#).unwrap();
        let sets = decode_records(&records);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].favorite_id, None);
        assert_eq!(sets[0].symbol_tags, "");
        assert_eq!(sets[0].display().echelon.as_deref(), Some("13"));
    }

    #[test]
    fn unknown_standard_is_skipped() {
        let records = from_json(
            r#"[
                {"standardVersion":"APP6","favoriteId":"a"},
                {"standardVersion":"2525d","favoriteId":"b"}
            ]"#,
        )
        .unwrap();
        let sets = decode_records(&records);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].favorite_id.as_deref(), Some("b"));
    }

    #[test]
    fn bad_value_skips_only_that_favorite() {
        let records = from_json(
            r#"[
                {"standardVersion":"2525D","favoriteId":"a","symbolset":"air"},
                {"standardVersion":"2525D","favoriteId":"b","symbolset":"10"}
            ]"#,
        )
        .unwrap();
        let sets = decode_records(&records);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].favorite_id.as_deref(), Some("b"));
    }

    #[test]
    fn null_values_are_unset() {
        let records = from_json(
            r#"[{"standardVersion":"2525D","favoriteId":null,"echelon":null,"symbolset":"10"}]"#,
        )
        .unwrap();
        let sets = decode_records(&records);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].favorite_id, None);
        assert_eq!(sets[0].display().echelon, None);
        assert_eq!(sets[0].display().symbol_set.as_deref(), Some("10"));
    }

    #[test]
    fn numeric_values_are_read_as_text() {
        let records = from_json(r#"[{"standardVersion":"2525D","speed":30}]"#).unwrap();
        assert_eq!(records[0].fields.get("speed").map(String::as_str), Some("30"));

        let sets = decode_records(&records);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].to_dictionary().get("speed").map(String::as_str), Some("30"));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let records = from_json(
            r#"[
                "not a favorite",
                {"favoriteId":"no-standard"},
                {"standardVersion":"2525D","favoriteId":"nested","speed":[30]},
                {"standardVersion":"2525D","favoriteId":"kept"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].favorite_id.as_deref(), Some("kept"));
    }

    #[test]
    fn non_array_document_is_an_error() {
        assert!(matches!(
            from_json(r#"{"standardVersion":"2525D"}"#),
            Err(MilsymError::Serialization(_))
        ));
    }

    #[test]
    fn blank_document_is_empty() {
        assert!(from_json("  \n").unwrap().is_empty());
    }
}
