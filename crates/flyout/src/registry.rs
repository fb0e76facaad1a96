//! Per-class registry of open surfaces
//!
//! Insertion order is stacking order: the last registered surface is topmost.

use crate::surface::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub handle: SurfaceId,
    /// Monotonic open counter, unique within the registry
    pub order_opened: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    entries: Vec<RegistryEntry>,
    next_order: u64,
    /// Set when a surface is removed while others remain open
    removed: bool,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a surface; registering twice is a no-op. Returns whether it was added.
    pub fn register(&mut self, handle: SurfaceId) -> bool {
        if self.contains(handle) {
            return false;
        }
        self.entries.push(RegistryEntry {
            handle,
            order_opened: self.next_order,
        });
        self.next_order += 1;
        true
    }

    /// Remove a surface. Returns whether it was registered.
    ///
    /// If other surfaces remain, the `removed` flag is raised so the click
    /// that caused this removal does not also dismiss the next surface down.
    pub fn unregister(&mut self, handle: SurfaceId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.handle == handle) else {
            return false;
        };
        self.entries.remove(index);
        if !self.entries.is_empty() {
            self.removed = true;
        }
        true
    }

    /// Most recently registered surface
    pub fn topmost(&self) -> Option<SurfaceId> {
        self.entries.last().map(|e| e.handle)
    }

    pub fn contains(&self, handle: SurfaceId) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Handles in registration order
    pub fn handles(&self) -> Vec<SurfaceId> {
        self.entries.iter().map(|e| e.handle).collect()
    }

    /// Consume the `removed` flag
    pub fn take_removed(&mut self) -> bool {
        std::mem::take(&mut self.removed)
    }

    pub fn clear_removed(&mut self) {
        self.removed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> SurfaceId {
        SurfaceId::from_raw(raw)
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = SurfaceRegistry::new();
        assert!(registry.register(id(1)));
        assert!(!registry.register(id(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_topmost_is_last_registered() {
        let mut registry = SurfaceRegistry::new();
        registry.register(id(1));
        registry.register(id(2));
        registry.register(id(3));
        assert_eq!(registry.topmost(), Some(id(3)));

        registry.unregister(id(3));
        assert_eq!(registry.topmost(), Some(id(2)));
        assert_eq!(registry.handles(), vec![id(1), id(2)]);
    }

    #[test]
    fn test_order_opened_is_monotonic() {
        let mut registry = SurfaceRegistry::new();
        registry.register(id(5));
        registry.register(id(2));
        registry.unregister(id(5));
        registry.register(id(5));

        let orders: Vec<u64> = registry.iter().map(|e| e.order_opened).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_removed_flag() {
        let mut registry = SurfaceRegistry::new();
        registry.register(id(1));
        registry.register(id(2));

        registry.unregister(id(2));
        assert!(registry.take_removed());
        assert!(!registry.take_removed());

        // Removing the last entry leaves nothing to protect
        registry.unregister(id(1));
        assert!(!registry.take_removed());
    }

    #[test]
    fn test_unregister_unknown() {
        let mut registry = SurfaceRegistry::new();
        assert!(!registry.unregister(id(9)));
    }
}
