use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered key/value mapping. Serialized as a JSON object whose entries
/// keep their order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<V>(pub Vec<(String, V)>);

impl<V> Ranked<V> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn truncate(mut self, top: Option<usize>) -> Self {
        if let Some(top) = top {
            self.0.truncate(top);
        }
        self
    }
}

impl Ranked<Option<f64>> {
    /// Highest value first, missing values last. Ties keep their order.
    pub fn descending(mut entries: Vec<(String, Option<f64>)>) -> Self {
        entries.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(a), Some(b)) => b.total_cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ranked(entries)
    }
}

impl<V: Serialize> Serialize for Ranked<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
