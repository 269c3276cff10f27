//! Submitted key/value data.
//!
//! The coercer only needs "every value submitted under key K, in submission
//! order". [`FieldSource`] is that contract; [`FormData`] is an owned
//! implementation that also keeps binary (file) entries and parses
//! `application/x-www-form-urlencoded` bodies and query strings.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

/// One submitted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Text(&'a str),
    /// File upload or other non-text payload. Never coerced.
    Binary(&'a [u8]),
}

impl<'a> Entry<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Entry::Text(s) => Some(s),
            Entry::Binary(_) => None,
        }
    }
}

pub trait FieldSource {
    /// All values submitted for `key`, in submission order; empty if none.
    fn get_all(&self, key: &str) -> Vec<Entry<'_>>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        (**self).get_all(key)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FORM DATA
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
enum OwnedEntry {
    Text(String),
    Binary(Vec<u8>),
}

/// Ordered multimap of submitted entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, OwnedEntry)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a url-encoded body or query string (no leading `?`).
    pub fn from_urlencoded(input: &str) -> Self {
        let entries = form_urlencoded::parse(input.as_bytes())
            .map(|(k, v)| (k.into_owned(), OwnedEntry::Text(v.into_owned())))
            .collect();
        FormData { entries }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((key.into(), OwnedEntry::Text(value.into())));
        self
    }

    pub fn append_binary(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.push((key.into(), OwnedEntry::Binary(bytes.into())));
        self
    }
}

impl FieldSource for FormData {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| match v {
                OwnedEntry::Text(s) => Entry::Text(s),
                OwnedEntry::Binary(b) => Entry::Binary(b),
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), OwnedEntry::Text(v.into())))
            .collect();
        FormData { entries }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONTAINER IMPLS
// ————————————————————————————————————————————————————————————————————————————

fn texts<S: AsRef<str>>(values: &[S]) -> Vec<Entry<'_>> {
    values.iter().map(|s| Entry::Text(s.as_ref())).collect()
}

impl<S: AsRef<str>> FieldSource for [(S, S)] {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.iter()
            .filter(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| Entry::Text(v.as_ref()))
            .collect()
    }
}

impl<S: AsRef<str>> FieldSource for Vec<(S, S)> {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.as_slice().get_all(key)
    }
}

impl<S: AsRef<str>> FieldSource for IndexMap<String, Vec<S>> {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.get(key).map(|vs| texts(vs)).unwrap_or_default()
    }
}

impl<S: AsRef<str>> FieldSource for HashMap<String, Vec<S>> {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.get(key).map(|vs| texts(vs)).unwrap_or_default()
    }
}

impl<S: AsRef<str>> FieldSource for BTreeMap<String, Vec<S>> {
    fn get_all(&self, key: &str) -> Vec<Entry<'_>> {
        self.get(key).map(|vs| texts(vs)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_submission_order_and_duplicates() {
        let form = FormData::from_urlencoded("tag=b&name=x&tag=a&tag=b");
        assert_eq!(
            form.get_all("tag"),
            [Entry::Text("b"), Entry::Text("a"), Entry::Text("b")],
        );
        assert!(form.get_all("missing").is_empty());
    }

    #[test]
    fn decodes_urlencoded_values() {
        let form = FormData::from_urlencoded("email=jane%40example.com&name=Jane+Doe&empty=");
        assert_eq!(form.get_all("email"), [Entry::Text("jane@example.com")]);
        assert_eq!(form.get_all("name"), [Entry::Text("Jane Doe")]);
        assert_eq!(form.get_all("empty"), [Entry::Text("")]);
    }

    #[test]
    fn binary_entries_are_not_text() {
        let mut form = FormData::new();
        form.append_binary("upload", b"\x89PNG".to_vec()).append("upload", "note");
        let entries = form.get_all("upload");
        assert_eq!(entries[0].as_text(), None);
        assert_eq!(entries[1].as_text(), Some("note"));
    }

    #[test]
    fn pair_lists_and_maps_are_sources() {
        let pairs = vec![("a", "1"), ("b", "2"), ("a", "3")];
        assert_eq!(pairs.get_all("a"), [Entry::Text("1"), Entry::Text("3")]);

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        map.insert("a".into(), vec!["x".into(), "y".into()]);
        assert_eq!(map.get_all("a"), [Entry::Text("x"), Entry::Text("y")]);
        assert!(map.get_all("b").is_empty());
    }
}
