//! RawValue: the C ABI representation of a [`Value`]
//!
//! Generated code passes values around as a 16-byte `{ tag, bits }` pair.
//! The tag is the same ASCII character the code generator already uses for
//! type dispatch, so a raw value can be built with a constant store and
//! inspected without calling into the runtime.
//!
//! ```text
//! ┌────────────┬───────────────┬───────────────────────────────────────┐
//! │ tag (u8)   │ padding (7)   │ bits (u64)                            │
//! ├────────────┼───────────────┼───────────────────────────────────────┤
//! │ 'i'        │               │ i64, two's complement                 │
//! │ 'f'        │               │ f64::to_bits                          │
//! │ 'b'        │               │ 0 or 1 (any non-zero reads as true)   │
//! │ 'n'        │               │ ignored                               │
//! │ 's' / 'l'  │               │ handle: generation << 32 | index      │
//! │ 'c'        │               │ Unicode scalar value (print only)     │
//! └────────────┴───────────────┴───────────────────────────────────────┘
//! ```

use crate::error::{Result, RuntimeError};
use crate::value::{ListHandle, StrHandle, TypeTag, Value};

/// C-compatible tagged value
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawValue {
    pub tag: u8,
    pub bits: u64,
}

const _: () = assert!(std::mem::size_of::<RawValue>() == 16);

impl RawValue {
    pub fn new(tag: TypeTag, bits: u64) -> Self {
        RawValue {
            tag: tag.as_char() as u8,
            bits,
        }
    }

    pub fn tag(&self) -> Result<TypeTag> {
        TypeTag::from_byte(self.tag)
    }

    pub fn char(c: char) -> Self {
        RawValue::new(TypeTag::Char, c as u64)
    }

    /// Decode into a [`Value`]
    ///
    /// `c` has no value counterpart and is reported as a mismatch against `int`,
    /// which is how a character is carried once it is stored.
    pub fn to_value(&self) -> Result<Value> {
        match self.tag()? {
            TypeTag::Int => Ok(Value::Int(self.bits as i64)),
            TypeTag::Float => Ok(Value::Float(f64::from_bits(self.bits))),
            TypeTag::Bool => Ok(Value::Bool(self.bits != 0)),
            TypeTag::None => Ok(Value::None),
            TypeTag::Str => Ok(Value::Str(StrHandle::from_bits(self.bits))),
            TypeTag::List => Ok(Value::List(ListHandle::from_bits(self.bits))),
            TypeTag::Char => Err(RuntimeError::TagMismatch {
                expected: TypeTag::Int,
                found: TypeTag::Char,
            }),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(n) => RawValue::new(TypeTag::Int, n as u64),
            Value::Float(x) => RawValue::new(TypeTag::Float, x.to_bits()),
            Value::Bool(b) => RawValue::new(TypeTag::Bool, b as u64),
            Value::None => RawValue::new(TypeTag::None, 0),
            Value::Str(h) => RawValue::new(TypeTag::Str, h.to_bits()),
            Value::List(h) => RawValue::new(TypeTag::List, h.to_bits()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    #[test]
    fn test_scalar_encoding() {
        let raw = RawValue::from(Value::Int(-2));
        assert_eq!(raw.tag, b'i');
        assert_eq!(raw.bits, u64::MAX - 1);
        assert_eq!(raw.to_value().unwrap(), Value::Int(-2));

        let raw = RawValue::from(Value::Float(2.5));
        assert_eq!(raw.tag, b'f');
        assert_eq!(raw.to_value().unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_bool_accepts_any_nonzero() {
        let raw = RawValue { tag: b'b', bits: 42 };
        assert_eq!(raw.to_value().unwrap(), Value::Bool(true));
        let raw = RawValue { tag: b'b', bits: 0 };
        assert_eq!(raw.to_value().unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_handles_survive_the_boundary() {
        let mut heap = Heap::new();
        let s = heap.create_str(b"abi").unwrap();
        let l = heap.list_from_values(&[Value::Str(s)]).unwrap();

        let back = RawValue::from(Value::List(l)).to_value().unwrap();
        let l2 = back.as_list().unwrap();
        let first = heap.list_get(l2, 0).unwrap();
        let s2 = RawValue::from(first).to_value().unwrap().as_str().unwrap();
        assert_eq!(heap.str_bytes(s2).unwrap(), b"abi");
    }

    #[test]
    fn test_unknown_and_char_tags() {
        let raw = RawValue { tag: b'z', bits: 0 };
        assert_eq!(raw.to_value(), Err(RuntimeError::UnknownTag('z')));

        let raw = RawValue::char('A');
        assert_eq!(raw.tag().unwrap(), TypeTag::Char);
        assert!(raw.to_value().is_err());
    }
}
