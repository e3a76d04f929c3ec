//! String pool
//!
//! Every string a program creates (literals, concatenations, input tokens) is
//! copied into a fresh NUL-terminated buffer owned by the heap. Handles are
//! plain aliases with no reference count; the bytes live until the next
//! `release_strings`/`release_all`.
//!
//! Strings are byte strings, not `str`: the generated code hands us C strings
//! and reads them back as C strings. Construction follows C semantics and stops
//! at the first NUL byte, so a pooled string never contains an interior NUL.

use crate::error::Result;
use crate::heap::Heap;
use crate::value::StrHandle;
use std::borrow::Cow;
use std::ffi::{CStr, c_char};
use tracing::trace;

/// Owned, immutable, NUL-terminated byte buffer
///
/// # Invariants
/// - `buf` ends with exactly one `0` byte
/// - no other byte of `buf` is `0`
#[derive(Clone, PartialEq, Eq)]
pub struct PoolString {
    buf: Box<[u8]>,
}

impl PoolString {
    /// Copy `bytes` up to (not including) the first NUL
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::from_parts(&[&bytes[..end]])
    }

    /// Build a buffer holding `parts` back to back plus the terminator
    ///
    /// Each part must already be NUL-free.
    fn from_parts(parts: &[&[u8]]) -> Self {
        let len: usize = parts.iter().map(|p| p.len()).sum();
        let mut buf = Vec::with_capacity(len + 1);
        for part in parts {
            buf.extend_from_slice(part);
        }
        buf.push(0);
        PoolString {
            buf: buf.into_boxed_slice(),
        }
    }

    /// Content without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.buf.len() - 1]
    }

    /// Content including the terminator
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// Pointer to the NUL-terminated content, valid until the owning heap
    /// releases its strings
    pub fn as_ptr(&self) -> *const c_char {
        self.buf.as_ptr() as *const c_char
    }

    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(&self.buf).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Length in bytes, terminator excluded
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PoolString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PoolString({:?})", self.to_string_lossy())
    }
}

impl Heap {
    /// Create a pooled copy of `bytes`
    ///
    /// Fails with `CapacityExhausted` if the string log is full.
    pub fn create_str(&mut self, bytes: &[u8]) -> Result<StrHandle> {
        let s = PoolString::from_bytes(bytes);
        let len = s.len();
        let handle = self.strings.register(s)?;
        trace!(index = handle.index(), len, "pooled string");
        Ok(StrHandle(handle))
    }

    /// Create a new pooled string holding `a` followed by `b`
    ///
    /// Neither input is modified.
    pub fn concat_str(&mut self, a: StrHandle, b: StrHandle) -> Result<StrHandle> {
        let joined = {
            let left = self.strings.get(a.0)?;
            let right = self.strings.get(b.0)?;
            PoolString::from_parts(&[left.as_bytes(), right.as_bytes()])
        };
        let len = joined.len();
        let handle = self.strings.register(joined)?;
        trace!(index = handle.index(), len, "pooled concatenation");
        Ok(StrHandle(handle))
    }

    pub fn str_get(&self, h: StrHandle) -> Result<&PoolString> {
        self.strings.get(h.0)
    }

    /// Read a string back as bytes (terminator excluded)
    pub fn str_bytes(&self, h: StrHandle) -> Result<&[u8]> {
        Ok(self.strings.get(h.0)?.as_bytes())
    }

    /// Read a string back as text, replacing invalid UTF-8
    pub fn str_lossy(&self, h: StrHandle) -> Result<Cow<'_, str>> {
        Ok(self.strings.get(h.0)?.to_string_lossy())
    }

    /// C pointer to a pooled string, for handing back across the ABI
    pub fn str_ptr(&self, h: StrHandle) -> Result<*const c_char> {
        Ok(self.strings.get(h.0)?.as_ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reads_back() {
        let mut heap = Heap::new();
        let h = heap.create_str(b"hello world").unwrap();
        assert_eq!(heap.str_bytes(h).unwrap(), b"hello world");
        assert_eq!(heap.str_lossy(h).unwrap(), "hello world");
    }

    #[test]
    fn test_concat() {
        let mut heap = Heap::new();
        let a = heap.create_str(b"ab").unwrap();
        let b = heap.create_str(b"cd").unwrap();
        let ab = heap.concat_str(a, b).unwrap();

        assert_eq!(heap.str_bytes(ab).unwrap(), b"abcd");
        // Inputs untouched
        assert_eq!(heap.str_bytes(a).unwrap(), b"ab");
        assert_eq!(heap.str_bytes(b).unwrap(), b"cd");
    }

    #[test]
    fn test_concat_with_self() {
        let mut heap = Heap::new();
        let a = heap.create_str(b"na").unwrap();
        let aa = heap.concat_str(a, a).unwrap();
        assert_eq!(heap.str_bytes(aa).unwrap(), b"nana");
    }

    #[test]
    fn test_every_string_is_registered() {
        let mut heap = Heap::new();
        let a = heap.create_str(b"x").unwrap();
        let b = heap.create_str(b"y").unwrap();
        heap.concat_str(a, b).unwrap();
        assert_eq!(heap.stats().strings_live, 3);
    }

    #[test]
    fn test_empty_string() {
        let mut heap = Heap::new();
        let h = heap.create_str(b"").unwrap();
        let s = heap.str_get(h).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn test_stops_at_interior_nul() {
        let s = PoolString::from_bytes(b"abc\0def");
        assert_eq!(s.as_bytes(), b"abc");
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_c_pointer_is_nul_terminated() {
        let mut heap = Heap::new();
        let h = heap.create_str("héllo".as_bytes()).unwrap();
        let ptr = heap.str_ptr(h).unwrap();
        let back = unsafe { CStr::from_ptr(ptr) };
        assert_eq!(back.to_str().unwrap(), "héllo");
        assert_eq!(heap.str_get(h).unwrap().as_c_str(), Some(back));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut heap = Heap::new();
        let h = heap.create_str(&[b'o', b'k', 0xff]).unwrap();
        assert_eq!(heap.str_bytes(h).unwrap(), &[b'o', b'k', 0xff]);
        assert_eq!(heap.str_lossy(h).unwrap(), "ok\u{fffd}");
    }

    #[test]
    fn test_debug_format() {
        let s = PoolString::from_bytes(b"dbg");
        assert_eq!(format!("{:?}", s), "PoolString(\"dbg\")");
    }
}
