//! The store contract consumed by the queue layer.

use std::fmt;

use crate::error::Result;

/// Storage representation currently held by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// The key does not exist.
    None,
    /// Ordered sequence, append at tail and remove at head.
    List,
    /// Members ordered by an integer score, unique per member.
    SortedSet,
    /// Unordered set of unique members.
    Set,
}

impl KeyType {
    /// Returns the conventional lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::None => "none",
            KeyType::List => "list",
            KeyType::SortedSet => "zset",
            KeyType::Set => "set",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations an ordered key-value store must supply.
///
/// Every method is a single round trip and must be atomic on its own.
/// Reading the head of a sorted set and removing it are separate calls;
/// callers that need "pop" semantics compose them with the conditional
/// form of [`sorted_remove`](OrderedStore::sorted_remove).
///
/// Ranges are index based: `start` is the zero-based offset and `count`
/// the maximum number of elements returned.
pub trait OrderedStore: Send + Sync {
    /// Reports the representation held by `key`.
    fn key_type(&self, key: &str) -> Result<KeyType>;

    /// Inserts `member` with `score`, replacing the score of an existing member.
    ///
    /// Returns `true` when the member was newly added.
    fn sorted_insert(&self, key: &str, member: &str, score: i64) -> Result<bool>;

    /// Returns members with their scores in ascending score order.
    ///
    /// Members sharing a score are ordered by a store-defined tie-break.
    fn sorted_range(&self, key: &str, start: usize, count: usize) -> Result<Vec<(String, i64)>>;

    /// Returns the score of `member`, if present.
    fn sorted_score(&self, key: &str, member: &str) -> Result<Option<i64>>;

    /// Removes `member`.
    ///
    /// With `expected_score` set, the member is only removed while it still
    /// carries exactly that score. Returns `true` if this call removed it.
    ///
    /// Removing the last member leaves an empty sorted set behind; the key
    /// keeps reporting [`KeyType::SortedSet`] until it is deleted.
    fn sorted_remove(&self, key: &str, member: &str, expected_score: Option<i64>) -> Result<bool>;

    /// Number of members in the sorted set.
    fn sorted_len(&self, key: &str) -> Result<usize>;

    /// Appends `value` at the tail of the list, returning the new length.
    fn list_push(&self, key: &str, value: &str) -> Result<usize>;

    /// Removes and returns the head of the list.
    fn list_pop_front(&self, key: &str) -> Result<Option<String>>;

    /// Length of the list.
    fn list_len(&self, key: &str) -> Result<usize>;

    /// Returns list elements in insertion order.
    fn list_range(&self, key: &str, start: usize, count: usize) -> Result<Vec<String>>;

    /// Adds `member` to a plain set. Returns `true` when newly added.
    fn set_add(&self, key: &str, member: &str) -> Result<bool>;

    /// Removes `member` from a plain set. Returns `true` when it was present.
    fn set_remove(&self, key: &str, member: &str) -> Result<bool>;

    /// Membership check against a plain set.
    fn set_contains(&self, key: &str, member: &str) -> Result<bool>;

    /// All members of a plain set, sorted.
    fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Deletes `key` regardless of type. Returns `true` when it existed.
    fn delete(&self, key: &str) -> Result<bool>;
}
