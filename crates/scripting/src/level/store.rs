use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Key/value structure shared by every listener during a save or load
/// pass. Shaped like a JSON object; each behavior owns a namespaced path
/// inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveStore {
    root: Map<String, Value>,
}

impl SaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value. Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Stores `value` at `path`, creating empty mappings for every missing
    /// parent segment. Sibling keys along the path are left untouched; a
    /// parent segment holding a non-object value is replaced by an empty
    /// mapping. An empty path stores nothing.
    pub fn insert_at(&mut self, path: &[&str], value: Value) {
        insert_nested(&mut self.root, path, value);
    }

    /// Looks up the value at `path`. Any missing or non-object segment
    /// yields `None`.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.root;
        for key in parents {
            current = current.get(*key)?.as_object()?;
        }
        current.get(*last)
    }

    pub fn get_bool(&self, path: &[&str]) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }
}

fn insert_nested(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            let slot = map
                .entry((*first).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                warn!(key = *first, found = %slot, "store_path_not_an_object_replaced");
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(next) = slot {
                insert_nested(next, rest, value);
            }
        }
    }
}
