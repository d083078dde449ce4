use std::ptr;

use crate::memory::grow_capacity;
use crate::objects::object_string::ObjectString;
use crate::value::{is_nil, make_bool_value, make_nil_value, Value};

const TABLE_MAX_LOAD: f64 = 0.75;

/// One bucket. Three states: empty (`key` null, `value` nil), tombstone
/// (`key` null, `value` true), live (`key` non-null).
#[derive(Clone, Copy)]
pub struct Entry {
    pub key: *mut ObjectString,
    pub value: Value,
}

impl Entry {
    fn empty() -> Entry {
        Entry {
            key: ptr::null_mut(),
            value: make_nil_value(),
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.key.is_null() && !is_nil(&self.value)
    }
}

/// Open-addressed, linear-probed map from interned string keys to values.
/// Keys compare by pointer; the interner guarantees that equal contents
/// share one canonical `ObjectString`. `count` includes tombstones so the
/// load factor keeps probe chains terminating.
pub struct Table {
    count: usize,
    entries: Box<[Entry]>,
}

impl Table {
    pub fn new() -> Table {
        Table {
            count: 0,
            entries: Vec::new().into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Inserts or updates. Returns true iff the key had no live entry
    /// before the call; a reclaimed tombstone still counts as new.
    pub fn insert(&mut self, key: *mut ObjectString, value: Value) -> bool {
        if self.count + 1 > (self.capacity() as f64 * TABLE_MAX_LOAD) as usize {
            let capacity = grow_capacity!(self.capacity());
            self.adjust_capacity(capacity);
        }

        let index = Self::find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        let is_new_key = entry.key.is_null();
        if is_new_key && is_nil(&entry.value) {
            self.count += 1;
        }

        entry.key = key;
        entry.value = value;
        is_new_key
    }

    pub fn find(&self, key: *mut ObjectString) -> Option<Value> {
        if self.count == 0 {
            return None;
        }

        let index = Self::find_entry(&self.entries, key);
        let entry = &self.entries[index];
        if entry.key.is_null() {
            None
        } else {
            Some(entry.value)
        }
    }

    /// Replaces the live entry with a tombstone. The slot stays occupied
    /// so probe chains through it keep working.
    pub fn remove(&mut self, key: *mut ObjectString) -> bool {
        if self.count == 0 {
            return false;
        }

        let index = Self::find_entry(&self.entries, key);
        let entry = &mut self.entries[index];
        if entry.key.is_null() {
            return false;
        }

        entry.key = ptr::null_mut();
        entry.value = make_bool_value(true);
        true
    }

    pub fn add_all(&mut self, from: &Table) {
        for entry in from.entries.iter() {
            if !entry.key.is_null() {
                self.insert(entry.key, entry.value);
            }
        }
    }

    /// Intern-pool lookup by content, for callers that do not have an
    /// `ObjectString` yet. Compares length and hash before bytes.
    pub fn find_string(&self, content: &str, hash: u32) -> *mut ObjectString {
        if self.count == 0 {
            return ptr::null_mut();
        }

        let capacity = self.capacity();
        let mut index = hash as usize % capacity;
        loop {
            let entry = &self.entries[index];
            if entry.key.is_null() {
                // A fully empty slot ends the probe chain; tombstones do not.
                if is_nil(&entry.value) {
                    return ptr::null_mut();
                }
            } else {
                let key = unsafe { &*entry.key };
                if key.content.len() == content.len()
                    && key.hash == hash
                    && key.content == content
                {
                    return entry.key;
                }
            }

            index = (index + 1) % capacity;
        }
    }

    /// Drops every entry whose key is unmarked. Run between tracing and
    /// sweeping so the intern pool behaves as a weak set.
    pub fn remove_white(&mut self) {
        for entry in self.entries.iter_mut() {
            if !entry.key.is_null() && !unsafe { (*entry.key).object.is_marked } {
                entry.key = ptr::null_mut();
                entry.value = make_bool_value(true);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (*mut ObjectString, Value)> + '_ {
        self.entries
            .iter()
            .filter(|entry| !entry.key.is_null())
            .map(|entry| (entry.key, entry.value))
    }

    pub fn deep_size(&self) -> usize {
        self.entries.len() * std::mem::size_of::<Entry>()
    }

    /// Index of the live entry for `key`, or of the slot an insert should
    /// use: the first tombstone on the probe chain if any, else the first
    /// empty slot. Termination relies on the load-factor cap.
    fn find_entry(entries: &[Entry], key: *mut ObjectString) -> usize {
        let capacity = entries.len();
        let hash = unsafe { (*key).hash };
        let mut index = hash as usize % capacity;
        let mut tombstone: Option<usize> = None;

        loop {
            let entry = &entries[index];
            if entry.key.is_null() {
                if is_nil(&entry.value) {
                    return tombstone.unwrap_or(index);
                }
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            } else if ptr::eq(entry.key, key) {
                return index;
            }

            index = (index + 1) % capacity;
        }
    }

    /// Rehashes into a fresh array, dropping tombstones and recounting
    /// live entries.
    fn adjust_capacity(&mut self, new_capacity: usize) {
        let mut new_entries = vec![Entry::empty(); new_capacity].into_boxed_slice();

        let mut count = 0;
        for entry in self.entries.iter() {
            if entry.key.is_null() {
                continue;
            }
            let index = Self::find_entry(&new_entries, entry.key);
            new_entries[index] = *entry;
            count += 1;
        }

        self.entries = new_entries;
        self.count = count;
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::object_string::hash_string;
    use crate::value::{make_number_value, Value};

    fn new_key(content: &str) -> *mut ObjectString {
        Box::into_raw(Box::new(ObjectString::new(
            content.to_string(),
            hash_string(content),
        )))
    }

    fn free_key(key: *mut ObjectString) {
        unsafe { drop(Box::from_raw(key)) };
    }

    #[test]
    fn insert_reports_new_keys_only_once() {
        let mut table = Table::new();
        let key = new_key("answer");
        assert!(table.insert(key, make_number_value(42.0)));
        assert!(!table.insert(key, make_number_value(43.0)));
        assert_eq!(table.find(key), Some(make_number_value(43.0)));
        free_key(key);
    }

    #[test]
    fn missing_keys_are_not_found() {
        let mut table = Table::new();
        let present = new_key("present");
        let absent = new_key("absent");
        table.insert(present, make_nil_value());
        assert_eq!(table.find(absent), None);
        assert!(!table.remove(absent));
        free_key(present);
        free_key(absent);
    }

    #[test]
    fn removal_leaves_a_tombstone_and_insert_reclaims_it() {
        let mut table = Table::new();
        let key = new_key("ghost");
        table.insert(key, make_number_value(1.0));
        assert!(table.remove(key));
        assert_eq!(table.find(key), None);

        // The key was not live, so reinsertion counts as new again.
        assert!(table.insert(key, make_number_value(2.0)));
        assert_eq!(table.find(key), Some(make_number_value(2.0)));
        free_key(key);
    }

    #[test]
    fn probe_chains_survive_tombstones() {
        let mut table = Table::new();
        let keys: Vec<_> = (0..16).map(|i| new_key(&format!("key{}", i))).collect();
        for (i, &key) in keys.iter().enumerate() {
            table.insert(key, make_number_value(i as f64));
        }
        // Punch holes, then verify every survivor is still reachable.
        for &key in keys.iter().step_by(2) {
            assert!(table.remove(key));
        }
        for (i, &key) in keys.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(table.find(key), None);
            } else {
                assert_eq!(table.find(key), Some(make_number_value(i as f64)));
            }
        }
        for key in keys {
            free_key(key);
        }
    }

    #[test]
    fn growth_rehashes_all_live_entries() {
        let mut table = Table::new();
        let keys: Vec<_> = (0..100).map(|i| new_key(&format!("entry{}", i))).collect();
        for (i, &key) in keys.iter().enumerate() {
            table.insert(key, make_number_value(i as f64));
        }
        assert!(table.capacity() >= 100);
        for (i, &key) in keys.iter().enumerate() {
            assert_eq!(table.find(key), Some(make_number_value(i as f64)));
        }
        for key in keys {
            free_key(key);
        }
    }

    #[test]
    fn add_all_copies_live_entries_only() {
        let mut from = Table::new();
        let kept = new_key("kept");
        let dropped = new_key("dropped");
        from.insert(kept, make_number_value(1.0));
        from.insert(dropped, make_number_value(2.0));
        from.remove(dropped);

        let mut to = Table::new();
        to.add_all(&from);
        assert_eq!(to.find(kept), Some(make_number_value(1.0)));
        assert_eq!(to.find(dropped), None);
        free_key(kept);
        free_key(dropped);
    }

    #[test]
    fn find_string_compares_by_content() {
        let mut table = Table::new();
        let key = new_key("interned");
        table.insert(key, make_nil_value());

        let hash = hash_string("interned");
        assert_eq!(table.find_string("interned", hash), key);
        assert!(table.find_string("other", hash_string("other")).is_null());
        assert!(table.find_string("", hash_string("")).is_null());
        free_key(key);
    }

    #[test]
    fn tombstone_state_is_distinct_from_empty() {
        let entry = Entry::empty();
        assert!(!entry.is_tombstone());
        let tombstone = Entry {
            key: std::ptr::null_mut(),
            value: Value::Bool(true),
        };
        assert!(tombstone.is_tombstone());
    }
}
