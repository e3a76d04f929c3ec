//! Allocation registry
//!
//! An append-only log of every object of one kind created since the last
//! teardown. Objects are addressed by generation-stamped handles: the index is
//! the object's position in allocation order, and the generation records which
//! teardown epoch it belongs to. Releasing the log bumps the generation, so any
//! handle that survives a teardown is rejected instead of aliasing a newer object.
//!
//! ```text
//! Registry<T>
//! ┌──────────────────────────────────────────────┐
//! │ generation: 2                                │
//! │ entries: [ obj0 | obj1 | obj2 | ... ]        │
//! │            ↑ Handle { index: 0, gen: 2 }      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! There is no per-object free. `release` hands the whole log back to the
//! caller (or drops it) in allocation order.

use crate::error::{Result, RuntimeError};
use serde::Serialize;

/// Which kind of object a registry tracks (used in diagnostics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    String,
    List,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::String => write!(f, "string"),
            ObjectKind::List => write!(f, "list"),
        }
    }
}

/// Untyped handle into a [`Registry`]
///
/// Packs into a single `u64` (generation in the high half, index in the low
/// half) so it can cross the C ABI inside a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle {
    index: u32,
    generation: u32,
}

impl RawHandle {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    pub fn from_bits(bits: u64) -> Self {
        RawHandle {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

/// Append-only allocation log for one object kind
#[derive(Debug)]
pub struct Registry<T> {
    kind: ObjectKind,
    entries: Vec<T>,
    generation: u32,
    /// Maximum live entries; `None` means unbounded
    limit: Option<usize>,
    /// Lifetime counter, survives releases
    allocated: u64,
    releases: u64,
}

impl<T> Registry<T> {
    pub fn new(kind: ObjectKind, limit: Option<usize>) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            generation: 0,
            limit,
            allocated: 0,
            releases: 0,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Append an object, returning its handle
    ///
    /// Fails with `CapacityExhausted` when the configured ceiling (or the
    /// 32-bit index space) is already used up. The object is dropped in that case.
    pub fn register(&mut self, value: T) -> Result<RawHandle> {
        let full = match self.limit {
            Some(limit) => self.entries.len() >= limit,
            None => false,
        };
        let Ok(index) = u32::try_from(self.entries.len()) else {
            return Err(RuntimeError::CapacityExhausted { kind: self.kind });
        };
        if full {
            return Err(RuntimeError::CapacityExhausted { kind: self.kind });
        }

        self.entries.push(value);
        self.allocated += 1;
        Ok(RawHandle {
            index,
            generation: self.generation,
        })
    }

    fn check(&self, handle: RawHandle) -> Result<usize> {
        if handle.generation != self.generation || handle.index() >= self.entries.len() {
            return Err(RuntimeError::StaleHandle { kind: self.kind });
        }
        Ok(handle.index())
    }

    pub fn get(&self, handle: RawHandle) -> Result<&T> {
        let idx = self.check(handle)?;
        Ok(&self.entries[idx])
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Result<&mut T> {
        let idx = self.check(handle)?;
        Ok(&mut self.entries[idx])
    }

    /// Number of live (unreleased) objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Objects registered over the registry's whole lifetime
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    pub fn releases(&self) -> u64 {
        self.releases
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Transfer every live object out of the registry, in allocation order
    ///
    /// Every handle issued so far becomes stale. Calling this on an empty
    /// registry still advances the generation but returns nothing, so a second
    /// teardown is a harmless no-op.
    pub fn release(&mut self) -> Vec<T> {
        self.generation = self.generation.wrapping_add(1);
        self.releases += 1;
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_follow_allocation_order() {
        let mut reg = Registry::new(ObjectKind::String, None);
        let a = reg.register("a").unwrap();
        let b = reg.register("b").unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(*reg.get(b).unwrap(), "b");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_limit_reports_exhaustion() {
        let mut reg = Registry::new(ObjectKind::List, Some(2));
        reg.register(1).unwrap();
        reg.register(2).unwrap();
        assert_eq!(
            reg.register(3),
            Err(RuntimeError::CapacityExhausted {
                kind: ObjectKind::List
            })
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_release_returns_entries_in_order() {
        let mut reg = Registry::new(ObjectKind::String, None);
        for n in 0..5 {
            reg.register(n).unwrap();
        }
        assert_eq!(reg.release(), vec![0, 1, 2, 3, 4]);
        assert!(reg.is_empty());
        assert_eq!(reg.allocated(), 5);
    }

    #[test]
    fn test_second_release_is_noop() {
        let mut reg = Registry::new(ObjectKind::String, None);
        reg.register("x").unwrap();
        assert_eq!(reg.release().len(), 1);
        assert!(reg.release().is_empty());
        assert_eq!(reg.releases(), 2);
    }

    #[test]
    fn test_stale_handle_rejected_after_release() {
        let mut reg = Registry::new(ObjectKind::List, None);
        let old = reg.register("old").unwrap();
        reg.release();
        let new = reg.register("new").unwrap();

        // Same slot index, different epoch
        assert_eq!(old.index(), new.index());
        assert_eq!(
            reg.get(old),
            Err(RuntimeError::StaleHandle {
                kind: ObjectKind::List
            })
        );
        assert_eq!(*reg.get(new).unwrap(), "new");
    }

    #[test]
    fn test_release_frees_room_under_limit() {
        let mut reg = Registry::new(ObjectKind::String, Some(1));
        reg.register(1).unwrap();
        assert!(reg.register(2).is_err());
        reg.release();
        assert!(reg.register(3).is_ok());
    }

    #[test]
    fn test_handle_bits_roundtrip() {
        let mut reg = Registry::new(ObjectKind::String, None);
        reg.release();
        reg.release();
        reg.register(()).unwrap();
        let h = reg.register(()).unwrap();
        let back = RawHandle::from_bits(h.to_bits());
        assert_eq!(back, h);
        assert_eq!(back.index(), 1);
        assert_eq!(back.generation(), 2);
    }
}
