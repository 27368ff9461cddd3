use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Name-keyed storage that remembers insertion order.
///
/// Sequences and files are reported in the order the document first mentions
/// them, so lookups go through a `HashMap` index while iteration walks the
/// entry vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Return the entry for `name`, creating it with `make` on first use.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> &mut T {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((name.to_string(), make()));
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for Registry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_first_insertion() {
        let mut reg: Registry<u32> = Registry::new();
        *reg.get_or_insert_with("b", || 0) += 1;
        *reg.get_or_insert_with("a", || 0) += 1;
        *reg.get_or_insert_with("b", || 0) += 1;

        let names: Vec<&str> = reg.names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(reg.get("b"), Some(&2));
        assert_eq!(reg.get("a"), Some(&1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn missing_names_are_not_created_by_lookup() {
        let mut reg: Registry<String> = Registry::new();
        assert!(reg.get("x").is_none());
        assert!(reg.get_mut("x").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut reg: Registry<&str> = Registry::new();
        reg.get_or_insert_with("zeta", || "z");
        reg.get_or_insert_with("alpha", || "a");
        let json = serde_json::to_string(&reg).expect("serialize");
        assert_eq!(json, r#"{"zeta":"z","alpha":"a"}"#);
    }
}
