use crate::error::{Result, RuntimeError};
use crate::registry::RawHandle;

/// Handle to a string owned by the heap's string pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrHandle(pub(crate) RawHandle);

/// Handle to a list owned by the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListHandle(pub(crate) RawHandle);

impl StrHandle {
    pub fn to_bits(self) -> u64 {
        self.0.to_bits()
    }

    pub fn from_bits(bits: u64) -> Self {
        StrHandle(RawHandle::from_bits(bits))
    }
}

impl ListHandle {
    pub fn to_bits(self) -> u64 {
        self.0.to_bits()
    }

    pub fn from_bits(bits: u64) -> Self {
        ListHandle(RawHandle::from_bits(bits))
    }
}

/// TypeTag: the single-character discriminator generated code passes around
///
/// `Char` only exists for printing; there is no character value variant, a
/// character travels as an `Int` code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    Str,
    Bool,
    Char,
    None,
    List,
}

impl TypeTag {
    /// Parse a tag character (`i f s b c n l`)
    pub fn from_char(c: char) -> Result<TypeTag> {
        match c {
            'i' => Ok(TypeTag::Int),
            'f' => Ok(TypeTag::Float),
            's' => Ok(TypeTag::Str),
            'b' => Ok(TypeTag::Bool),
            'c' => Ok(TypeTag::Char),
            'n' => Ok(TypeTag::None),
            'l' => Ok(TypeTag::List),
            other => Err(RuntimeError::UnknownTag(other)),
        }
    }

    /// Parse a tag from a raw ABI byte
    pub fn from_byte(b: u8) -> Result<TypeTag> {
        Self::from_char(b as char)
    }

    pub fn as_char(self) -> char {
        match self {
            TypeTag::Int => 'i',
            TypeTag::Float => 'f',
            TypeTag::Str => 's',
            TypeTag::Bool => 'b',
            TypeTag::Char => 'c',
            TypeTag::None => 'n',
            TypeTag::List => 'l',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "string",
            TypeTag::Bool => "bool",
            TypeTag::Char => "char",
            TypeTag::None => "none",
            TypeTag::List => "list",
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value: everything a pylite program can hold in a variable or list slot
///
/// Strings and lists are stored as handles into a [`crate::Heap`], so a
/// `Value` is always `Copy`: copying a `Str` or `List` aliases the same heap
/// object, exactly like the generated code expects. Lists may therefore nest,
/// and the same inner list may appear in several places.
///
/// Reads go through the checked `as_*` accessors; asking for the wrong variant
/// is a `TagMismatch` rather than a reinterpretation of the payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),

    /// IEEE 754 double
    Float(f64),

    /// Pooled, NUL-terminated string
    Str(StrHandle),

    Bool(bool),

    /// Absence of a meaningful scalar
    None,

    /// Nested list
    List(ListHandle),
}

impl Value {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::Bool(_) => TypeTag::Bool,
            Value::None => TypeTag::None,
            Value::List(_) => TypeTag::List,
        }
    }

    fn mismatch(&self, expected: TypeTag) -> RuntimeError {
        RuntimeError::TagMismatch {
            expected,
            found: self.tag(),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(other.mismatch(TypeTag::Int)),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Float(x) => Ok(*x),
            other => Err(other.mismatch(TypeTag::Float)),
        }
    }

    pub fn as_str(&self) -> Result<StrHandle> {
        match self {
            Value::Str(h) => Ok(*h),
            other => Err(other.mismatch(TypeTag::Str)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(TypeTag::Bool)),
        }
    }

    pub fn as_list(&self) -> Result<ListHandle> {
        match self {
            Value::List(h) => Ok(*h),
            other => Err(other.mismatch(TypeTag::List)),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<StrHandle> for Value {
    fn from(h: StrHandle) -> Self {
        Value::Str(h)
    }
}

impl From<ListHandle> for Value {
    fn from(h: ListHandle) -> Self {
        Value::List(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_chars_roundtrip() {
        for c in ['i', 'f', 's', 'b', 'c', 'n', 'l'] {
            assert_eq!(TypeTag::from_char(c).unwrap().as_char(), c);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(TypeTag::from_char('x'), Err(RuntimeError::UnknownTag('x')));
        assert_eq!(TypeTag::from_byte(0), Err(RuntimeError::UnknownTag('\0')));
    }

    #[test]
    fn test_checked_accessors() {
        assert_eq!(Value::Int(7).as_int(), Ok(7));
        assert_eq!(Value::Float(1.5).as_float(), Ok(1.5));
        assert_eq!(Value::Bool(true).as_bool(), Ok(true));
        assert!(Value::None.is_none());
        assert!(!Value::Int(0).is_none());
    }

    #[test]
    fn test_wrong_variant_is_tag_mismatch() {
        assert_eq!(
            Value::Int(1).as_float(),
            Err(RuntimeError::TagMismatch {
                expected: TypeTag::Float,
                found: TypeTag::Int,
            })
        );
        assert_eq!(
            Value::None.as_bool(),
            Err(RuntimeError::TagMismatch {
                expected: TypeTag::Bool,
                found: TypeTag::None,
            })
        );
    }

    #[test]
    fn test_value_is_small_and_copy() {
        // Handles keep the enum at two words no matter how deep lists nest
        assert_eq!(std::mem::size_of::<Value>(), 16);
        let v = Value::Int(3);
        let w = v;
        assert_eq!(v, w);
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(5i64), Value::Int(5));
        assert_eq!(Value::from(2.0f64), Value::Float(2.0));
        assert_eq!(Value::from(false), Value::Bool(false));
    }
}
