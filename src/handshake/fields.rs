//! Ordered header field storage.

/// Field names the legacy handshake cares about.
pub mod names {
    /// `Host`
    pub const HOST: &str = "Host";
    /// `Origin`
    pub const ORIGIN: &str = "Origin";
    /// `Upgrade`
    pub const UPGRADE: &str = "Upgrade";
    /// `Connection`
    pub const CONNECTION: &str = "Connection";
    /// `Cookie`
    pub const COOKIE: &str = "Cookie";
    /// `Sec-WebSocket-Key1`
    pub const KEY1: &str = "Sec-WebSocket-Key1";
    /// `Sec-WebSocket-Key2`
    pub const KEY2: &str = "Sec-WebSocket-Key2";
}

/// An ordered, case-sensitive map of header names to values.
///
/// Inserting a name that is already present replaces its value in place, so
/// the map never holds duplicate names and keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Creates an empty field store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`, compared case-sensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Stores `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Removes and returns the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no field is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Fields;

    #[test]
    fn last_write_wins_in_place() {
        let mut fields = Fields::new();
        assert_eq!(fields.insert("Host", "a.test"), None);
        fields.insert("Origin", "http://a.test");
        assert_eq!(fields.insert("Host", "b.test"), Some("a.test".to_owned()));

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("Host"), Some("b.test"));
        let names: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["Host", "Origin"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut fields = Fields::new();
        fields.insert("Upgrade", "WebSocket");
        assert!(fields.get("upgrade").is_none());
        assert!(fields.contains("Upgrade"));

        fields.insert("upgrade", "other");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.remove("upgrade").as_deref(), Some("other"));
        assert_eq!(fields.get("Upgrade"), Some("WebSocket"));
    }
}
