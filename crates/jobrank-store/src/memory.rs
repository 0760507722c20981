//! MemoryStore - thread-safe in-process ordered key-value store.
//!
//! Uses a single `Arc<Mutex<T>>` around the keyspace, so every trait method
//! is atomic with respect to every other caller sharing the store.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::error::{Result, StoreError};
use crate::traits::{KeyType, OrderedStore};

/// Sorted set with a score index.
///
/// `index` orders by `(score, member)`, so members sharing a score come out
/// in lexicographic member order.
#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    index: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn insert(&mut self, member: &str, score: i64) -> bool {
        match self.scores.insert(member.to_string(), score) {
            Some(old) => {
                self.index.remove(&(old, member.to_string()));
                self.index.insert((score, member.to_string()));
                false
            }
            None => {
                self.index.insert((score, member.to_string()));
                true
            }
        }
    }

    fn remove(&mut self, member: &str, expected_score: Option<i64>) -> bool {
        let Some(&score) = self.scores.get(member) else {
            return false;
        };
        if expected_score.is_some_and(|expected| expected != score) {
            return false;
        }
        self.scores.remove(member);
        self.index.remove(&(score, member.to_string()));
        true
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}

/// A value stored under one key.
#[derive(Debug)]
enum Entry {
    List(VecDeque<String>),
    Sorted(SortedSet),
    Set(BTreeSet<String>),
}

impl Entry {
    fn key_type(&self) -> KeyType {
        match self {
            Entry::List(_) => KeyType::List,
            Entry::Sorted(_) => KeyType::SortedSet,
            Entry::Set(_) => KeyType::Set,
        }
    }

    /// True for an emptied list or plain set. A sorted set is never
    /// reported empty, so a drained priority queue keeps its representation
    /// until the key is deleted.
    fn is_prunable(&self) -> bool {
        match self {
            Entry::List(list) => list.is_empty(),
            Entry::Sorted(_) => false,
            Entry::Set(set) => set.is_empty(),
        }
    }
}

type Keyspace = HashMap<String, Entry>;

fn wrong_type(key: &str, expected: KeyType, found: &Entry) -> StoreError {
    StoreError::WrongType {
        key: key.to_string(),
        expected,
        found: found.key_type(),
    }
}

/// Drops `key` once its list or plain set has no elements left, so an
/// emptied FIFO queue reports [`KeyType::None`] again.
fn prune(keys: &mut Keyspace, key: &str) {
    if keys.get(key).is_some_and(Entry::is_prunable) {
        keys.remove(key);
    }
}

/// Thread-safe in-memory implementation of [`OrderedStore`].
///
/// Cloning a `MemoryStore` yields another handle onto the same keyspace.
///
/// # Example
///
/// ```no_run
/// use jobrank_store::{MemoryStore, OrderedStore};
///
/// let store = MemoryStore::new();
/// store.list_push("queue:mail", "a").unwrap();
/// store.list_push("queue:mail", "b").unwrap();
/// assert_eq!(store.list_pop_front("queue:mail").unwrap().as_deref(), Some("a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keys: Arc<Mutex<Keyspace>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Keyspace>> {
        self.keys
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl OrderedStore for MemoryStore {
    fn key_type(&self, key: &str) -> Result<KeyType> {
        let keys = self.lock()?;
        Ok(keys.get(key).map(Entry::key_type).unwrap_or(KeyType::None))
    }

    fn sorted_insert(&self, key: &str, member: &str, score: i64) -> Result<bool> {
        let mut keys = self.lock()?;
        let entry = keys
            .entry(key.to_string())
            .or_insert_with(|| Entry::Sorted(SortedSet::default()));
        match entry {
            Entry::Sorted(set) => {
                trace!(key, score, "sorted insert");
                Ok(set.insert(member, score))
            }
            other => Err(wrong_type(key, KeyType::SortedSet, other)),
        }
    }

    fn sorted_range(&self, key: &str, start: usize, count: usize) -> Result<Vec<(String, i64)>> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Sorted(set)) => Ok(set
                .index
                .iter()
                .skip(start)
                .take(count)
                .map(|(score, member)| (member.clone(), *score))
                .collect()),
            Some(other) => Err(wrong_type(key, KeyType::SortedSet, other)),
        }
    }

    fn sorted_score(&self, key: &str, member: &str) -> Result<Option<i64>> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(None),
            Some(Entry::Sorted(set)) => Ok(set.scores.get(member).copied()),
            Some(other) => Err(wrong_type(key, KeyType::SortedSet, other)),
        }
    }

    fn sorted_remove(&self, key: &str, member: &str, expected_score: Option<i64>) -> Result<bool> {
        let mut keys = self.lock()?;
        let removed = match keys.get_mut(key) {
            None => false,
            Some(Entry::Sorted(set)) => set.remove(member, expected_score),
            Some(other) => return Err(wrong_type(key, KeyType::SortedSet, other)),
        };
        Ok(removed)
    }

    fn sorted_len(&self, key: &str) -> Result<usize> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(0),
            Some(Entry::Sorted(set)) => Ok(set.len()),
            Some(other) => Err(wrong_type(key, KeyType::SortedSet, other)),
        }
    }

    fn list_push(&self, key: &str, value: &str) -> Result<usize> {
        let mut keys = self.lock()?;
        let entry = keys
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(VecDeque::new()));
        match entry {
            Entry::List(list) => {
                list.push_back(value.to_string());
                Ok(list.len())
            }
            other => Err(wrong_type(key, KeyType::List, other)),
        }
    }

    fn list_pop_front(&self, key: &str) -> Result<Option<String>> {
        let mut keys = self.lock()?;
        let head = match keys.get_mut(key) {
            None => None,
            Some(Entry::List(list)) => list.pop_front(),
            Some(other) => return Err(wrong_type(key, KeyType::List, other)),
        };
        prune(&mut keys, key);
        Ok(head)
    }

    fn list_len(&self, key: &str) -> Result<usize> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(0),
            Some(Entry::List(list)) => Ok(list.len()),
            Some(other) => Err(wrong_type(key, KeyType::List, other)),
        }
    }

    fn list_range(&self, key: &str, start: usize, count: usize) -> Result<Vec<String>> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(list)) => Ok(list.iter().skip(start).take(count).cloned().collect()),
            Some(other) => Err(wrong_type(key, KeyType::List, other)),
        }
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool> {
        let mut keys = self.lock()?;
        let entry = keys
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry {
            Entry::Set(set) => Ok(set.insert(member.to_string())),
            other => Err(wrong_type(key, KeyType::Set, other)),
        }
    }

    fn set_remove(&self, key: &str, member: &str) -> Result<bool> {
        let mut keys = self.lock()?;
        let removed = match keys.get_mut(key) {
            None => false,
            Some(Entry::Set(set)) => set.remove(member),
            Some(other) => return Err(wrong_type(key, KeyType::Set, other)),
        };
        prune(&mut keys, key);
        Ok(removed)
    }

    fn set_contains(&self, key: &str, member: &str) -> Result<bool> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(false),
            Some(Entry::Set(set)) => Ok(set.contains(member)),
            Some(other) => Err(wrong_type(key, KeyType::Set, other)),
        }
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>> {
        let keys = self.lock()?;
        match keys.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(other) => Err(wrong_type(key, KeyType::Set, other)),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut keys = self.lock()?;
        Ok(keys.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_missing_key_reports_none() {
        let store = MemoryStore::new();
        assert_eq!(store.key_type("queue:missing").unwrap(), KeyType::None);
        assert_eq!(store.list_len("queue:missing").unwrap(), 0);
        assert_eq!(store.sorted_len("queue:missing").unwrap(), 0);
    }

    #[test]
    fn test_sorted_range_orders_by_score() {
        let store = MemoryStore::new();
        store.sorted_insert("z", "c", 30).unwrap();
        store.sorted_insert("z", "a", 10).unwrap();
        store.sorted_insert("z", "b", 20).unwrap();

        let all = store.sorted_range("z", 0, 10).unwrap();
        let members: Vec<_> = all.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(members, vec!["a", "b", "c"]);

        let middle = store.sorted_range("z", 1, 1).unwrap();
        assert_eq!(middle, vec![("b".to_string(), 20)]);
    }

    #[test]
    fn test_sorted_insert_replaces_score() {
        let store = MemoryStore::new();
        assert!(store.sorted_insert("z", "a", 10).unwrap());
        assert!(!store.sorted_insert("z", "a", 5).unwrap());

        assert_eq!(store.sorted_len("z").unwrap(), 1);
        assert_eq!(store.sorted_score("z", "a").unwrap(), Some(5));
    }

    #[test]
    fn test_sorted_remove_with_expected_score() {
        let store = MemoryStore::new();
        store.sorted_insert("z", "a", 10).unwrap();

        assert!(!store.sorted_remove("z", "a", Some(11)).unwrap());
        assert!(store.sorted_remove("z", "a", Some(10)).unwrap());
        assert!(!store.sorted_remove("z", "a", None).unwrap());
    }

    #[test]
    fn test_emptied_sorted_set_keeps_its_type() {
        let store = MemoryStore::new();
        store.sorted_insert("z", "a", 1).unwrap();
        store.sorted_remove("z", "a", None).unwrap();

        assert_eq!(store.key_type("z").unwrap(), KeyType::SortedSet);
        assert_eq!(store.sorted_len("z").unwrap(), 0);
        assert!(store.sorted_range("z", 0, 1).unwrap().is_empty());
        assert!(store.list_push("z", "b").is_err());

        assert!(store.delete("z").unwrap());
        assert_eq!(store.key_type("z").unwrap(), KeyType::None);
    }

    #[test]
    fn test_emptied_lists_and_sets_are_dropped() {
        let store = MemoryStore::new();
        store.set_add("s", "a").unwrap();
        store.set_remove("s", "a").unwrap();
        assert_eq!(store.key_type("s").unwrap(), KeyType::None);

        store.list_push("l", "x").unwrap();
        store.list_pop_front("l").unwrap();
        assert_eq!(store.key_type("l").unwrap(), KeyType::None);
    }

    #[test]
    fn test_list_is_fifo() {
        let store = MemoryStore::new();
        for value in ["a", "b", "c"] {
            store.list_push("l", value).unwrap();
        }

        assert_eq!(store.list_range("l", 1, 5).unwrap(), vec!["b", "c"]);
        assert_eq!(store.list_pop_front("l").unwrap().as_deref(), Some("a"));
        assert_eq!(store.list_len("l").unwrap(), 2);
    }

    #[test]
    fn test_wrong_type() {
        let store = MemoryStore::new();
        store.list_push("q", "a").unwrap();

        let result = store.sorted_insert("q", "b", 1);
        assert!(matches!(
            result,
            Err(StoreError::WrongType {
                expected: KeyType::SortedSet,
                found: KeyType::List,
                ..
            })
        ));
    }

    #[test]
    fn test_sets() {
        let store = MemoryStore::new();
        assert!(store.set_add("s", "b").unwrap());
        assert!(store.set_add("s", "a").unwrap());
        assert!(!store.set_add("s", "a").unwrap());

        assert!(store.set_contains("s", "a").unwrap());
        assert_eq!(store.set_members("s").unwrap(), vec!["a", "b"]);

        assert!(store.set_remove("s", "a").unwrap());
        assert!(!store.set_contains("s", "a").unwrap());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        store.sorted_insert("z", "a", 1).unwrap();

        assert!(store.delete("z").unwrap());
        assert!(!store.delete("z").unwrap());
        assert_eq!(store.key_type("z").unwrap(), KeyType::None);
    }

    #[test]
    fn test_clones_share_keyspace() {
        let store = MemoryStore::new();
        let handle = store.clone();

        let writer = thread::spawn(move || {
            for i in 0..50 {
                handle.list_push("l", &i.to_string()).unwrap();
            }
        });
        writer.join().unwrap();

        assert_eq!(store.list_len("l").unwrap(), 50);
    }
}
