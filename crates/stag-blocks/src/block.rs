//! The block record stored and rendered by the aggregator.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Key holding a block's unique name.
pub const NAME_KEY: &str = "name";
/// Key holding a block's ordering position.
pub const SORT_ORDER_KEY: &str = "sort_order";

/// One named status fragment.
///
/// The block keeps every attribute the producer supplied, in the order it was
/// supplied, and serialises back to exactly that object. `name` and
/// `sort_order` are mirrored into typed fields so the store can key and order
/// blocks without re-reading the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
    sort_order: i64,
    fields: Map<String, Value>,
}

impl Block {
    /// Builds a block holding only its name and sort order.
    #[must_use]
    pub fn new(name: impl Into<String>, sort_order: i64) -> Self {
        let name = name.into();
        let mut fields = Map::new();
        fields.insert(NAME_KEY.to_owned(), Value::String(name.clone()));
        fields.insert(SORT_ORDER_KEY.to_owned(), Value::from(sort_order));
        Self {
            name,
            sort_order,
            fields,
        }
    }

    /// Adds a display attribute. `name` and `sort_order` cannot be changed
    /// this way and are left untouched.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != NAME_KEY && key != SORT_ORDER_KEY {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Assembles a block from a validated attribute map.
    ///
    /// Callers guarantee that `fields` already carries `name` and `sort_order`
    /// matching the typed arguments.
    pub(crate) fn from_fields(name: String, sort_order: i64, fields: Map<String, Value>) -> Self {
        Self {
            name,
            sort_order,
            fields,
        }
    }

    /// The block's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The block's ordering key; lower values render further left.
    #[must_use]
    pub const fn sort_order(&self) -> i64 {
        self.sort_order
    }

    /// Looks up a stored attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All stored attributes in producer order.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.fields.serialize(serializer)
    }
}
