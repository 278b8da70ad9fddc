use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The JSON document persisted for one user.
///
/// Stores treat it as opaque. The empty object `{}` stands for
/// "nothing saved yet".
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRecord(Value);

impl LedgerRecord {
    pub fn new(value: Value) -> LedgerRecord {
        LedgerRecord(value)
    }

    pub fn empty() -> LedgerRecord {
        LedgerRecord(Value::Object(Map::new()))
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for LedgerRecord {
    fn default() -> Self {
        LedgerRecord::empty()
    }
}

impl From<Value> for LedgerRecord {
    fn from(value: Value) -> Self {
        LedgerRecord(value)
    }
}

impl fmt::Display for LedgerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
