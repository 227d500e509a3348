//! Lookup of dataset columns by normalized name.

use crate::utils::normalize_name;

/// Dataset columns keyed by normalized name, in first-seen order.
///
/// When several columns normalize to the same key, the last one is kept but
/// the key stays at the position of the first.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    entries: Vec<(String, String)>,
}

impl ColumnIndex {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for column in columns {
            let column = column.as_ref();
            let key = normalize_name(column);
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, original)) => *original = column.to_string(),
                None => entries.push((key, column.to_string())),
            }
        }
        Self { entries }
    }

    /// Original column name for a normalized key.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == normalized)
            .map(|(_, original)| original.as_str())
    }

    /// `(normalized, original)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, original)| (key.as_str(), original.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_duplicate_wins_at_first_position() {
        let index = ColumnIndex::new(["Wait_Time", "Age", "wait time"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("waittime"), Some("wait time"));
        let keys: Vec<&str> = index.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["waittime", "age"]);
    }
}
