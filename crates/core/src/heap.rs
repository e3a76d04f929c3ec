//! Heap: the process-scoped owner of every string and list
//!
//! A `Heap` bundles the two allocation registries (strings, lists). String
//! and list operations live in `string_pool` and `list` as `impl Heap`
//! blocks; this module owns construction, teardown and statistics.
//!
//! Heaps are ordinary values. Generated programs use the single instance the
//! runtime crate keeps behind its C ABI, while tests build as many independent
//! heaps as they like.

use crate::list::List;
use crate::registry::{ObjectKind, Registry};
use crate::string_pool::PoolString;
use serde::Serialize;
use tracing::debug;

/// Owner of every pooled string and list
#[derive(Debug)]
pub struct Heap {
    pub(crate) strings: Registry<PoolString>,
    pub(crate) lists: Registry<List>,
}

/// Snapshot of heap usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    /// Strings currently registered
    pub strings_live: usize,
    /// Lists currently registered
    pub lists_live: usize,
    /// Strings created since the heap was built
    pub strings_allocated: u64,
    /// Lists created since the heap was built
    pub lists_allocated: u64,
    /// Payload bytes held by live strings (terminators excluded)
    pub string_bytes: usize,
    /// Elements held by live lists
    pub list_elements: usize,
    /// Completed teardowns
    pub releases: u64,
}

impl Heap {
    /// Create a heap with no ceiling on the number of objects
    pub fn new() -> Self {
        Self::with_object_limit(None)
    }

    /// Create a heap that refuses to track more than `limit` strings (and,
    /// separately, `limit` lists) between teardowns
    pub fn with_object_limit(limit: Option<usize>) -> Self {
        Heap {
            strings: Registry::new(ObjectKind::String, limit),
            lists: Registry::new(ObjectKind::List, limit),
        }
    }

    /// Release every pooled string, in allocation order
    ///
    /// Returns how many strings were freed. Handles to them become stale.
    pub fn release_strings(&mut self) -> usize {
        let released = self.strings.release();
        let count = released.len();
        // Dropping the Vec frees front to back, i.e. in allocation order
        drop(released);
        debug!(count, "released pooled strings");
        count
    }

    /// Release every list, in allocation order
    pub fn release_lists(&mut self) -> usize {
        let released = self.lists.release();
        let count = released.len();
        drop(released);
        debug!(count, "released lists");
        count
    }

    /// Bulk teardown: strings first, then lists
    ///
    /// Safe to call more than once; later calls find empty logs and free nothing.
    pub fn release_all(&mut self) -> (usize, usize) {
        let strings = self.release_strings();
        let lists = self.release_lists();
        (strings, lists)
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            strings_live: self.strings.len(),
            lists_live: self.lists.len(),
            strings_allocated: self.strings.allocated(),
            lists_allocated: self.lists.allocated(),
            string_bytes: self.strings.iter().map(|s| s.len()).sum(),
            list_elements: self.lists.iter().map(|l| l.len()).sum(),
            releases: self.strings.releases().min(self.lists.releases()),
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
