//! Insert rows as data: keyed [`Record`]s and typed [`InsertRow`]s.
//!
//! Both reach the INSERT builder as a column list plus one value list per
//! row; there is no runtime reflection.

use crate::value::Value;

/// A column-name → value map that remembers insertion order.
///
/// ```
/// use sqldialect::Record;
///
/// let r = Record::new().set("name", "alice").set("age", 30);
/// assert_eq!(r.keys().collect::<Vec<_>>(), vec!["name", "age"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing an earlier value for the same column.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// In-place form of [`Record::set`].
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == column) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k.as_ref(), v);
        }
        record
    }
}

/// A typed insert row: fixed columns, values in the same order.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(InsertRow)]
/// struct NewUser {
///     name: String,
///     #[sqldialect(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// `Option<T>` fields produce NULL when `None`, so every row of a type has
/// the same arity.
pub trait InsertRow {
    /// Column names, in value order.
    fn columns() -> &'static [&'static str];

    /// Values for this row, one per column.
    fn values(&self) -> Vec<Value>;
}
