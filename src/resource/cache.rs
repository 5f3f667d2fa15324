// Reference counted resource cache keyed by handle and de-duplicated by name

use super::ResourceHandle;
use std::collections::BTreeMap;

#[derive(Debug)]
struct CacheEntry<T> {
    resource: T,
    name: String,
    ref_count: u32,
    /// Permanent entries survive a zero reference count
    permanent: bool,
}

/// Outcome of releasing one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    /// No entry with that handle
    Unknown,
    /// Entry still resident with the given reference count
    Retained(u32),
    /// Entry reached zero references and was removed
    Freed(String),
}

/// Map of handle to reference counted resource
#[derive(Debug)]
pub struct ResourceCache<T> {
    entries: BTreeMap<ResourceHandle, CacheEntry<T>>,
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Find the handle of a cached resource by name
    pub fn find_by_name(&self, name: &str) -> Option<ResourceHandle> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.name == name)
            .map(|(&handle, _)| handle)
    }

    /// Insert a resource under a fresh handle
    pub fn insert(
        &mut self,
        handle: ResourceHandle,
        name: &str,
        resource: T,
        ref_count: u32,
        permanent: bool,
    ) {
        let previous = self.entries.insert(
            handle,
            CacheEntry {
                resource,
                name: name.to_string(),
                ref_count,
                permanent,
            },
        );
        debug_assert!(previous.is_none(), "resource handle {} reused", handle);
    }

    /// Add one reference, returning the new count
    ///
    /// # Panics
    /// Panics if the handle is not cached
    pub fn acquire(&mut self, handle: ResourceHandle) -> u32 {
        let entry = self
            .entries
            .get_mut(&handle)
            .unwrap_or_else(|| panic!("acquiring unknown resource handle {}", handle));
        entry.ref_count += 1;
        entry.ref_count
    }

    /// Drop one reference, removing the entry when none remain
    pub fn release(&mut self, handle: ResourceHandle) -> Release {
        let Some(entry) = self.entries.get_mut(&handle) else {
            return Release::Unknown;
        };

        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count > 0 || entry.permanent {
            return Release::Retained(entry.ref_count);
        }

        match self.entries.remove(&handle) {
            Some(entry) => Release::Freed(entry.name),
            None => Release::Unknown,
        }
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        self.entries.get(&handle).map(|entry| &entry.resource)
    }

    pub fn ref_count(&self, handle: ResourceHandle) -> Option<u32> {
        self.entries.get(&handle).map(|entry| entry.ref_count)
    }

    pub fn name(&self, handle: ResourceHandle) -> Option<&str> {
        self.entries.get(&handle).map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry that is not permanent
    pub fn clear_transient(&mut self) {
        self.entries.retain(|_, entry| entry.permanent);
    }
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release() {
        let mut cache = ResourceCache::new();
        let handle = ResourceHandle(7);
        cache.insert(handle, "alien", 42u32, 1, false);

        assert_eq!(cache.find_by_name("alien"), Some(handle));
        assert_eq!(cache.acquire(handle), 2);
        assert_eq!(cache.release(handle), Release::Retained(1));
        assert_eq!(cache.get(handle), Some(&42));
        assert_eq!(cache.release(handle), Release::Freed("alien".to_string()));
        assert!(!cache.contains(handle));
        assert_eq!(cache.release(handle), Release::Unknown);
    }

    #[test]
    fn test_permanent_entry_survives_zero() {
        let mut cache = ResourceCache::new();
        let handle = ResourceHandle(0);
        cache.insert(handle, "error", (), 0, true);

        assert_eq!(cache.release(handle), Release::Retained(0));
        assert_eq!(cache.ref_count(handle), Some(0));
        assert!(cache.contains(handle));
    }

    #[test]
    fn test_clear_transient() {
        let mut cache = ResourceCache::new();
        cache.insert(ResourceHandle(0), "error", (), 0, true);
        cache.insert(ResourceHandle(1), "alien", (), 3, false);
        cache.clear_transient();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.name(ResourceHandle(0)), Some("error"));
    }
}
