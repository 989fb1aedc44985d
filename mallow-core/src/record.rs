//! A small container for step and episode diagnostics.
//!
//! A [`Record`] travels next to every [`Step`](crate::Step) emitted by
//! an environment and carries named values an orchestrator may want to
//! log: episode returns, lengths, timestamps.
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};
use thiserror::Error;

/// Errors when accessing a [`Record`].
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record has no entry for the key.
    #[error("record key error: {0}")]
    KeyError(String),

    /// The entry exists but has a different type of value.
    #[error("record value type error: {0}")]
    ValueTypeError(String),
}

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single value, typically a metric.
    Scalar(f32),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A key-value store of diagnostic values.
#[derive(Debug, Clone)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns a consuming iterator over the key-value pairs.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record contains no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges the values of two records, the right-hand side winning on
    /// key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value of the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32, RecordError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(RecordError::ValueTypeError(k.into())),
            None => Err(RecordError::KeyError(k.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordValue};

    #[test]
    fn merge_prefers_right_hand_side() {
        let a = Record::from_scalar("reward", 1.0);
        let mut b = Record::from_scalar("reward", 2.0);
        b.insert("episode", RecordValue::Scalar(3.0));

        let merged = a.merge(b);
        assert_eq!(merged.get_scalar("reward").unwrap(), 2.0);
        assert_eq!(merged.get_scalar("episode").unwrap(), 3.0);
    }

    #[test]
    fn get_scalar_rejects_missing_key() {
        let r = Record::empty();
        assert!(r.get_scalar("reward").is_err());
    }
}
