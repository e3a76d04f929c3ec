//! List container
//!
//! Lists are built in two phases. A list literal of known size is created with
//! all of its slots allocated up front and then filled in order, one
//! `fill_next` per slot. Once the last slot is written the list is *ready*:
//! from then on it can be read, sliced and grown with `append`, and can no
//! longer be filled.
//!
//! ```text
//!   list_new(3)        fill   fill   fill
//!  ┌─────────────┐   ┌──────────────────────┐   append   ┌───────────┐
//!  │Constructing │──▶│ pending 3 → 2 → 1 → 0│──────────▶ │  Ready    │──┐
//!  └─────────────┘   └──────────────────────┘            └───────────┘◀─┘
//! ```
//!
//! Indices are `i64` because that is what the language computes with.
//! Negative indices are never wrapped around; they are out of bounds.
//! Slice endpoints are both inclusive.

use crate::error::{Result, RuntimeError};
use crate::heap::Heap;
use crate::registry::ObjectKind;
use crate::value::{ListHandle, Value};
use tracing::trace;

/// Lifecycle phase of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// Initial slots still awaiting `fill_next`
    Constructing,
    /// Fully initialised
    Ready,
}

/// Growable sequence of values with a two-phase construction protocol
///
/// # Invariants
/// - `items.len() == length - pending`
/// - `pending > 0` only before the first append
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    items: Vec<Value>,
    length: usize,
    pending: usize,
}

impl List {
    /// A list with `capacity` slots awaiting initialisation
    ///
    /// The slots are reserved up front; a size the allocator cannot satisfy is
    /// `CapacityExhausted` rather than an abort.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| RuntimeError::CapacityExhausted {
                kind: ObjectKind::List,
            })?;
        Ok(List {
            items,
            length: capacity,
            pending: capacity,
        })
    }

    pub fn state(&self) -> ListState {
        if self.pending == 0 {
            ListState::Ready
        } else {
            ListState::Constructing
        }
    }

    pub fn is_ready(&self) -> bool {
        self.pending == 0
    }

    /// Logical length (the full size, even while still constructing)
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Slots still waiting for `fill_next`
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.pending != 0 {
            return Err(RuntimeError::InitIncomplete {
                length: self.length,
                pending: self.pending,
            });
        }
        Ok(())
    }

    /// Write the next uninitialised slot
    pub fn fill_next(&mut self, value: Value) -> Result<()> {
        if self.pending == 0 {
            return Err(RuntimeError::InitOverflow {
                length: self.length,
            });
        }
        // Slot `length - pending` is always the next one to push
        self.items.push(value);
        self.pending -= 1;
        Ok(())
    }

    /// Grow a ready list by one element
    pub fn append(&mut self, value: Value) -> Result<()> {
        self.ensure_ready()?;
        self.items.push(value);
        self.length += 1;
        Ok(())
    }

    /// Copy of the element at `index`
    pub fn get(&self, index: i64) -> Result<Value> {
        self.ensure_ready()?;
        let out_of_bounds = RuntimeError::IndexOutOfBounds {
            index,
            length: self.length,
        };
        let Ok(idx) = usize::try_from(index) else {
            return Err(out_of_bounds);
        };
        self.items.get(idx).copied().ok_or(out_of_bounds)
    }

    /// Elements `start..=end`, after validating both endpoints
    ///
    /// Checks run in a fixed order: initialisation, start, end, then ordering.
    pub fn range(&self, start: i64, end: i64) -> Result<&[Value]> {
        self.ensure_ready()?;
        let in_bounds = |i: i64| usize::try_from(i).ok().filter(|&i| i < self.length);

        let Some(lo) = in_bounds(start) else {
            return Err(RuntimeError::SliceStartOutOfBounds {
                start,
                length: self.length,
            });
        };
        let Some(hi) = in_bounds(end) else {
            return Err(RuntimeError::SliceEndOutOfBounds {
                end,
                length: self.length,
            });
        };
        if lo > hi {
            return Err(RuntimeError::SliceReversed { start, end });
        }
        Ok(&self.items[lo..=hi])
    }

    /// All elements of a ready list
    pub fn as_slice(&self) -> Result<&[Value]> {
        self.ensure_ready()?;
        Ok(&self.items)
    }
}

impl Heap {
    /// Allocate and register a list with `capacity` slots awaiting `fill_next`
    ///
    /// A zero-capacity list is ready immediately.
    pub fn list_new(&mut self, capacity: usize) -> Result<ListHandle> {
        let handle = self.lists.register(List::with_capacity(capacity)?)?;
        trace!(index = handle.index(), capacity, "registered list");
        Ok(ListHandle(handle))
    }

    /// Like [`Heap::list_new`] but for a size computed by the program
    pub fn list_new_checked(&mut self, capacity: i64) -> Result<ListHandle> {
        let Ok(capacity) = usize::try_from(capacity) else {
            return Err(RuntimeError::NegativeLength(capacity));
        };
        self.list_new(capacity)
    }

    pub fn list_get_ref(&self, list: ListHandle) -> Result<&List> {
        self.lists.get(list.0)
    }

    pub fn list_fill_next(&mut self, list: ListHandle, value: Value) -> Result<()> {
        self.lists.get_mut(list.0)?.fill_next(value)
    }

    pub fn list_append(&mut self, list: ListHandle, value: Value) -> Result<()> {
        self.lists.get_mut(list.0)?.append(value)
    }

    pub fn list_get(&self, list: ListHandle, index: i64) -> Result<Value> {
        self.lists.get(list.0)?.get(index)
    }

    pub fn list_len(&self, list: ListHandle) -> Result<usize> {
        Ok(self.lists.get(list.0)?.len())
    }

    pub fn list_state(&self, list: ListHandle) -> Result<ListState> {
        Ok(self.lists.get(list.0)?.state())
    }

    /// Build a brand-new ready list holding copies of `start..=end`
    ///
    /// The copy goes through the ordinary construction path, so the new list is
    /// registered like any other.
    pub fn list_slice(&mut self, list: ListHandle, start: i64, end: i64) -> Result<ListHandle> {
        let elements = self.lists.get(list.0)?.range(start, end)?.to_vec();
        let out = self.list_new(elements.len())?;
        for value in elements {
            self.list_fill_next(out, value)?;
        }
        Ok(out)
    }

    /// Build a ready list from `values` in one step
    pub fn list_from_values(&mut self, values: &[Value]) -> Result<ListHandle> {
        let out = self.list_new(values.len())?;
        for value in values {
            self.list_fill_next(out, *value)?;
        }
        Ok(out)
    }
}
