//! Typed console I/O for compiled pylite programs
//!
//! Input is prompted and typed: the program names the type it expects with a
//! tag, the runtime prints the prompt plus a type hint, reads one
//! whitespace-delimited token and keeps asking until the token parses.
//! Print takes an ordered list of tagged values and writes them on one line,
//! each followed by a single space.
//!
//! The reading and formatting logic is generic over `BufRead`/`Write` so it can
//! be driven from in-memory buffers. The `pylite_*` exports bind it to the
//! process's stdin/stdout and the thread's heap.
//!
//! # Safety Contract
//!
//! The exported functions are called by generated code only. Prompts are
//! NUL-terminated C strings (or null for the default prompt) and `items`
//! points at `count` initialised [`RawValue`]s.

use crate::fatal::OrFatal;
use crate::state::with_heap;
use pylite_core::{Heap, RawValue, Result, RuntimeError, StrHandle, TypeTag, Value};
use std::ffi::{CStr, c_char};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Written after a token fails to parse, before prompting again
pub const INVALID_INPUT_NOTICE: &str = "Invalid input. Please try again.\n";

/// Type hint appended to every prompt
pub fn prompt_suffix(tag: TypeTag) -> Result<&'static str> {
    match tag {
        TypeTag::Int => Ok(" (expecting int): "),
        TypeTag::Float => Ok(" (expecting float): "),
        TypeTag::Str => Ok(" (expecting string): "),
        TypeTag::Bool => Ok(" (expecting bool): "),
        other => Err(RuntimeError::UnknownTag(other.as_char())),
    }
}

/// Prompt used when the program supplies none
pub fn default_prompt(tag: TypeTag) -> Result<&'static str> {
    match tag {
        TypeTag::Int | TypeTag::Float => Ok("Enter a number"),
        TypeTag::Bool => Ok("Enter 0 or 1"),
        TypeTag::Str => Ok("Enter a string"),
        other => Err(RuntimeError::UnknownTag(other.as_char())),
    }
}

/// Same set as C's `isspace` in the default locale
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Token reader over a buffered byte source
pub struct InputReader<R> {
    inner: R,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(inner: R) -> Self {
        InputReader { inner }
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek()? {
                None => return Err(RuntimeError::UnexpectedEof),
                Some(b) if is_space(b) => self.inner.consume(1),
                Some(_) => return Ok(()),
            }
        }
    }

    /// Skip leading whitespace and read one token
    ///
    /// The whitespace byte that ends the token is left in the stream. End of
    /// input before any token byte is `UnexpectedEof`; end of input right
    /// after a token just ends the token.
    pub fn read_token(&mut self) -> Result<Vec<u8>> {
        self.skip_whitespace()?;
        let mut token = Vec::new();
        while let Some(b) = self.peek()? {
            if is_space(b) {
                break;
            }
            token.push(b);
            self.inner.consume(1);
        }
        Ok(token)
    }

    /// Drop everything up to and including the next newline
    pub fn discard_line(&mut self) -> Result<()> {
        loop {
            match self.peek()? {
                None => return Err(RuntimeError::UnexpectedEof),
                Some(b) => {
                    self.inner.consume(1);
                    if b == b'\n' {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Convert a token for `tag`; `Ok(None)` means malformed input
///
/// Only strings touch the heap, and only once the token is accepted.
pub fn parse_token(heap: &mut Heap, tag: TypeTag, token: &[u8]) -> Result<Option<Value>> {
    let text = std::str::from_utf8(token).ok();
    let value = match tag {
        TypeTag::Int => text.and_then(|t| t.parse::<i64>().ok()).map(Value::Int),
        TypeTag::Float => text.and_then(|t| t.parse::<f64>().ok()).map(Value::Float),
        TypeTag::Bool => text
            .and_then(|t| t.parse::<i64>().ok())
            .map(|n| Value::Bool(n != 0)),
        TypeTag::Str => Some(Value::Str(heap.create_str(token)?)),
        other => return Err(RuntimeError::UnknownTag(other.as_char())),
    };
    Ok(value)
}

/// Prompt until a token of type `tag` is read
pub fn read_typed<R: BufRead, W: Write>(
    heap: &mut Heap,
    input: &mut InputReader<R>,
    out: &mut W,
    prompt: &[u8],
    tag: TypeTag,
) -> Result<Value> {
    let suffix = prompt_suffix(tag)?;
    loop {
        out.write_all(prompt)?;
        out.write_all(suffix.as_bytes())?;
        out.flush()?;

        let token = input.read_token()?;
        if let Some(value) = parse_token(heap, tag, &token)? {
            return Ok(value);
        }

        debug!(%tag, token = %String::from_utf8_lossy(&token), "rejected input");
        input.discard_line()?;
        out.write_all(INVALID_INPUT_NOTICE.as_bytes())?;
    }
}

/// `%lf`-style fixed point, with C's spelling of the non-finite values
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        format!("{:.6}", x)
    }
}

/// Append the printed form of one value to `buf`
///
/// `c` takes an `Int` code point; invalid code points print U+FFFD.
pub fn write_item(heap: &Heap, buf: &mut Vec<u8>, tag: TypeTag, value: Value) -> Result<()> {
    match tag {
        TypeTag::Int => buf.extend_from_slice(value.as_int()?.to_string().as_bytes()),
        TypeTag::Float => buf.extend_from_slice(format_float(value.as_float()?).as_bytes()),
        TypeTag::Char => {
            let c = u32::try_from(value.as_int()?)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            let mut tmp = [0u8; 4];
            buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        }
        TypeTag::Bool => {
            let text: &[u8] = if value.as_bool()? { b"true" } else { b"false" };
            buf.extend_from_slice(text);
        }
        TypeTag::Str => buf.extend_from_slice(heap.str_bytes(value.as_str()?)?),
        TypeTag::None | TypeTag::List => return Err(RuntimeError::UnknownTag(tag.as_char())),
    }
    Ok(())
}

/// Print tagged values on one line, each followed by a space
///
/// The whole line is formatted before anything is written, so a bad item
/// produces no partial output.
pub fn print_items<W: Write>(heap: &Heap, out: &mut W, items: &[(TypeTag, Value)]) -> Result<()> {
    let mut line = Vec::new();
    for &(tag, value) in items {
        write_item(heap, &mut line, tag, value)?;
        line.push(b' ');
    }
    line.push(b'\n');
    out.write_all(&line)?;
    out.flush()?;
    Ok(())
}

/// Decode a raw print argument; `c` carries its code point in `bits`
fn print_arg(raw: &RawValue) -> Result<(TypeTag, Value)> {
    let tag = raw.tag()?;
    let value = match tag {
        TypeTag::Char => Value::Int(raw.bits as i64),
        _ => raw.to_value()?,
    };
    Ok((tag, value))
}

fn input_from_stdin(prompt: Option<&[u8]>, tag: u8) -> Result<Value> {
    let tag = TypeTag::from_byte(tag)?;
    let prompt = match prompt {
        Some(p) => p,
        None => default_prompt(tag)?.as_bytes(),
    };
    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut out = io::stdout().lock();
    with_heap(|heap| read_typed(heap, &mut input, &mut out, prompt, tag))
}

fn print_to_stdout(items: &[(TypeTag, Value)]) -> Result<()> {
    let mut out = io::stdout().lock();
    with_heap(|heap| print_items(heap, &mut out, items))
}

/// Prompted, typed read from stdin
///
/// # Safety
/// `prompt` must be null or a valid NUL-terminated C string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_input(prompt: *const c_char, tag: c_char) -> RawValue {
    let prompt = if prompt.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(prompt) }.to_bytes())
    };
    input_from_stdin(prompt, tag as u8).map(RawValue::from).or_fatal()
}

/// Typed read from stdin with the default prompt for `tag`
///
/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_input_default(tag: c_char) -> RawValue {
    input_from_stdin(None, tag as u8).map(RawValue::from).or_fatal()
}

/// Print `count` tagged values followed by a newline
///
/// # Safety
/// `items` must point to `count` valid `RawValue`s (it may be null when
/// `count <= 0`)
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print(count: i64, items: *const RawValue) {
    let raw: &[RawValue] = if items.is_null() || count <= 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(items, count as usize) }
    };
    raw.iter()
        .map(print_arg)
        .collect::<Result<Vec<_>>>()
        .and_then(|args| print_to_stdout(&args))
        .or_fatal()
}

/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print_int(n: i64) {
    print_to_stdout(&[(TypeTag::Int, Value::Int(n))]).or_fatal()
}

/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print_float(x: f64) {
    print_to_stdout(&[(TypeTag::Float, Value::Float(x))]).or_fatal()
}

/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print_bool(b: bool) {
    print_to_stdout(&[(TypeTag::Bool, Value::Bool(b))]).or_fatal()
}

/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print_char(code_point: i64) {
    print_to_stdout(&[(TypeTag::Char, Value::Int(code_point))]).or_fatal()
}

/// # Safety
/// `handle` must come from this runtime's string functions
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_print_str(handle: u64) {
    let h = StrHandle::from_bits(handle);
    print_to_stdout(&[(TypeTag::Str, Value::Str(h))]).or_fatal()
}
