use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An order as submitted by the website. Unknown fields are kept so the
/// enriched order echoes everything the client sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    #[serde(default)]
    pub email_addresses: Vec<String>,

    #[serde(default)]
    pub phone_numbers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Order {
    pub fn identifier_count(&self) -> usize {
        self.email_addresses.len() + self.phone_numbers.len()
    }
}

/// 促銷碼 -> 折扣係數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromoTable(BTreeMap<String, f64>);

impl PromoTable {
    pub fn new(promos: BTreeMap<String, f64>) -> Self {
        Self(promos)
    }

    pub fn factor(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

impl Default for PromoTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("10OFF".to_string(), 0.9),
            ("15OFF".to_string(), 0.85),
            ("25OFF".to_string(), 0.75),
        ]))
    }
}

/// Descriptive metadata of one breach (domain, date, data classes, ...),
/// kept exactly as the breach database publishes it.
pub type BreachRecord = serde_json::Value;

/// Identifier -> matching breaches, in the order the breach API returned them.
pub type BreachReport = BTreeMap<String, Vec<BreachRecord>>;

/// One entry of a `breachedaccount` response. Only the name is needed for the
/// table join; the rest of the object is kept as a fallback record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachName {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BreachName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn into_record(self) -> BreachRecord {
        serde_json::to_value(&self).unwrap_or(serde_json::Value::Null)
    }
}
