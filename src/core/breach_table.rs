use crate::domain::model::{BreachName, BreachRecord};
use crate::domain::ports::Storage;
use crate::utils::codec::serialize_pretty;
use crate::utils::error::{HimayaError, Result};
use std::collections::HashMap;

/// Breach name -> breach metadata, precomputed from the breach catalogue so a
/// lookup result can be enriched without another API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreachTable {
    entries: HashMap<String, BreachRecord>,
}

impl BreachTable {
    /// Reshapes the catalogue array into a name-keyed table. Entries without a
    /// string `Name` are skipped; a later duplicate replaces an earlier one.
    pub fn from_catalogue(catalogue: Vec<BreachRecord>) -> Self {
        let mut entries = HashMap::with_capacity(catalogue.len());

        for breach in catalogue {
            match breach.get("Name").and_then(|n| n.as_str()) {
                Some(name) => {
                    entries.insert(name.to_string(), breach.clone());
                }
                None => tracing::warn!("⚠️ Skipping catalogue entry without a Name"),
            }
        }

        Self { entries }
    }

    /// 解析已轉換好的 JSON 物件 (`{ "Adobe": {...}, ... }`)
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(data)?;

        match value {
            serde_json::Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(HimayaError::ConfigError {
                message: format!(
                    "Breach table must be a JSON object keyed by breach name, found {}",
                    json_kind(&other)
                ),
            }),
        }
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let data = storage.read_file(path).await?;
        let table = Self::from_json(&data)?;
        tracing::info!("📚 Loaded {} breaches from {}", table.len(), path);
        Ok(table)
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let json = self.to_pretty_json()?;
        storage.write_file(path, json.as_bytes()).await?;
        tracing::info!("💾 Wrote {} breaches to {}", self.len(), path);
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        serialize_pretty(&self.entries)
    }

    pub fn get(&self, name: &str) -> Option<&BreachRecord> {
        self.entries.get(name)
    }

    /// Joins lookup results against the table. A name the table does not know
    /// is reported with the object the API returned.
    pub fn enrich(&self, names: Vec<BreachName>) -> Vec<BreachRecord> {
        names
            .into_iter()
            .map(|breach| match self.get(&breach.name) {
                Some(record) => record.clone(),
                None => {
                    tracing::debug!("Breach {} not in lookup table", breach.name);
                    breach.into_record()
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                HimayaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn catalogue() -> Vec<BreachRecord> {
        vec![
            json!({"Name": "Adobe", "Domain": "adobe.com", "BreachDate": "2013-10-04"}),
            json!({"Name": "Canva", "Domain": "canva.com", "BreachDate": "2019-05-24"}),
            json!({"Title": "No name"}),
        ]
    }

    #[test]
    fn test_from_catalogue_keys_by_name() {
        let table = BreachTable::from_catalogue(catalogue());

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Adobe").unwrap()["Domain"], "adobe.com");
        assert!(table.get("No name").is_none());
    }

    #[test]
    fn test_pretty_json_round_trip_is_sorted() {
        let table = BreachTable::from_catalogue(catalogue());
        let text = table.to_pretty_json().unwrap();

        assert!(text.find("\"Adobe\"").unwrap() < text.find("\"Canva\"").unwrap());
        assert!(text.contains("\n    \"Adobe\": {\n        \"BreachDate\""));
        assert_eq!(BreachTable::from_json(text.as_bytes()).unwrap(), table);
    }

    #[test]
    fn test_from_json_rejects_arrays() {
        let err = BreachTable::from_json(b"[]").unwrap_err();
        assert!(err.to_string().contains("found an array"));
    }

    #[test]
    fn test_enrich_joins_and_falls_back() {
        let table = BreachTable::from_catalogue(catalogue());
        let enriched = table.enrich(vec![BreachName::new("Canva"), BreachName::new("Unknown")]);

        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0]["BreachDate"], "2019-05-24");
        assert_eq!(enriched[1], json!({"Name": "Unknown"}));
    }

    #[test]
    fn test_enrich_empty() {
        assert!(BreachTable::default().enrich(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_through_storage() {
        let storage = MockStorage::new();
        let table = BreachTable::from_catalogue(catalogue());

        table.save(&storage, "tables/breaches.json").await.unwrap();

        let written = storage.get_file("tables/breaches.json").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), table.to_pretty_json().unwrap());

        let loaded = BreachTable::load(&storage, "tables/breaches.json").await.unwrap();
        assert_eq!(loaded, table);
    }

    #[tokio::test]
    async fn test_load_missing_table_is_io_error() {
        let storage = MockStorage::new();

        let err = BreachTable::load(&storage, "missing.json").await.unwrap_err();
        assert!(matches!(err, HimayaError::IoError(_)));
        assert_eq!(err.status_code(), 500);
    }
}
