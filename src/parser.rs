//! Recursive-descent structural parser.
//!
//! A single recursive function dispatches on the next non-whitespace byte
//! under a context bitmask describing what the grammar allows there. The
//! flags can coexist: an object key slot after a first entry runs under
//! `KEY | COMMA | OBJECT`. Containers recurse with one less level of the
//! depth budget; a call entered with none left fails with `depth_exceeded`.
//!
//! `Status::AbsentValue` is the internal signal for "the matching closing
//! token arrived instead of a value" and for a clean end of input; the
//! public [`parse`] wrapper never lets it out.

use std::collections::BTreeMap;

use crate::alloc::Alloc;
use crate::lexer::{self, Num};
use crate::status::Status;
use crate::types::Value;

/// Maximum container nesting depth.
pub const DEPTH: u32 = 20;

const KEY: u32 = 1;
const COMMA: u32 = 2;
const COLON: u32 = 4;
const ARRAY: u32 = 8;
const OBJECT: u32 = 16;

// The value context admits neither a pending comma, a pending colon, nor a
// key slot; report whichever of those was actually pending.
fn colon_comma_error(context: u32) -> Status {
    if context & COLON != 0 {
        Status::MissingColon
    } else {
        Status::MissingComma
    }
}

fn key_colon_comma_error(context: u32) -> Status {
    if context & KEY != 0 {
        Status::ObjectKeyMustBeString
    } else {
        colon_comma_error(context)
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    ctx: Alloc,
}

impl Parser<'_> {
    fn word_at(&self, at: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.input.get(at..at + 4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    fn parse_value(&mut self, dst: &mut Value, mut context: u32, depth: u32) -> Status {
        if depth == 0 {
            return Status::DepthExceeded;
        }
        let mut sign: i64 = 1;
        let mut start = self.pos;
        let mut had_comma = false;
        while self.pos < self.input.len() {
            let c = self.input[self.pos];
            self.pos += 1;
            match c {
                b' ' | b'\n' | b'\r' | b'\t' => {
                    start = self.pos;
                }

                b',' => {
                    if context & COMMA == 0 {
                        return Status::UnexpectedComma;
                    }
                    context &= !COMMA;
                    had_comma = true;
                    start = self.pos;
                }

                b':' => {
                    if context & COLON == 0 {
                        return Status::UnexpectedColon;
                    }
                    context &= !COLON;
                    start = self.pos;
                }

                b'n' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    if self.word_at(self.pos - 1) == Some(u32::from_le_bytes(*b"null")) {
                        self.pos += 3;
                        dst.set_null();
                        return Status::Success;
                    }
                    return Status::IllegalCharacter;
                }

                b't' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    if self.word_at(self.pos - 1) == Some(u32::from_le_bytes(*b"true")) {
                        self.pos += 3;
                        dst.set_bool(true);
                        return Status::Success;
                    }
                    return Status::IllegalCharacter;
                }

                b'f' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    if self.word_at(self.pos) == Some(u32::from_le_bytes(*b"alse")) {
                        self.pos += 4;
                        dst.set_bool(false);
                        return Status::Success;
                    }
                    return Status::IllegalCharacter;
                }

                b'-' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    if self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
                        sign = -1;
                    } else {
                        return Status::BadNegative;
                    }
                }

                b'0'..=b'9' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    match lexer::scan_number(self.input, &mut self.pos, start, c, sign) {
                        Ok(Num::Long(value)) => dst.set_long(value),
                        Ok(Num::Double(value)) => dst.set_double(value),
                        Err(status) => return status,
                    }
                    return Status::Success;
                }

                b'"' => {
                    if context & (COLON | COMMA) != 0 {
                        return colon_comma_error(context);
                    }
                    match lexer::scan_string(self.input, &mut self.pos, self.ctx) {
                        Ok(body) => {
                            dst.install_string(body);
                            return Status::Success;
                        }
                        Err(status) => return status,
                    }
                }

                b'[' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    let mut items: Vec<Value> = Vec::new();
                    let mut element_context = ARRAY;
                    loop {
                        let mut element = Value::null(self.ctx);
                        match self.parse_value(&mut element, element_context, depth - 1) {
                            Status::AbsentValue => {
                                dst.install_array(items);
                                return Status::Success;
                            }
                            Status::Success => items.push(element),
                            status => return status,
                        }
                        element_context = ARRAY | COMMA;
                    }
                }

                b']' => {
                    if context & ARRAY != 0 {
                        if had_comma {
                            return Status::UnexpectedComma;
                        }
                        return Status::AbsentValue;
                    }
                    return Status::UnexpectedEndOfArray;
                }

                b'{' => {
                    if context & (KEY | COLON | COMMA) != 0 {
                        return key_colon_comma_error(context);
                    }
                    let mut entries: BTreeMap<String, Value> = BTreeMap::new();
                    let mut key_context = KEY | OBJECT;
                    loop {
                        let mut key = Value::null(self.ctx);
                        match self.parse_value(&mut key, key_context, depth - 1) {
                            Status::AbsentValue => {
                                dst.install_object(entries);
                                return Status::Success;
                            }
                            Status::Success => {}
                            status => return status,
                        }
                        let key = match key.take_key() {
                            Some(key) => key,
                            None => return Status::ObjectKeyMustBeString,
                        };
                        let mut value = Value::null(self.ctx);
                        match self.parse_value(&mut value, COLON, depth - 1) {
                            Status::AbsentValue => return Status::ObjectMissingValue,
                            Status::Success => {}
                            status => return status,
                        }
                        // Last writer wins for duplicate keys.
                        entries.insert(key, value);
                        key_context = KEY | COMMA | OBJECT;
                    }
                }

                b'}' => {
                    if context & OBJECT != 0 {
                        if had_comma {
                            return Status::UnexpectedComma;
                        }
                        return Status::AbsentValue;
                    }
                    return Status::UnexpectedEndOfObject;
                }

                _ => return Status::IllegalCharacter,
            }
        }
        // A call still holding the full depth budget never committed to a
        // value, so running out of input here is a clean end.
        if depth == DEPTH {
            Status::AbsentValue
        } else {
            Status::UnexpectedEof
        }
    }
}

/// Parse one JSON document.
///
/// The whole input must be consumed, modulo trailing whitespace; anything
/// else fails with [`Status::TrailingContent`]. Empty (or all-whitespace)
/// input yields a Null value. The returned tree and all of its string
/// storage live under `ctx`.
pub fn parse(ctx: Alloc, input: &[u8]) -> Result<Value, Status> {
    let mut parser = Parser {
        input,
        pos: 0,
        ctx,
    };
    let mut value = Value::null(ctx);
    match parser.parse_value(&mut value, 0, DEPTH) {
        Status::Success => {
            let mut rest = Value::null(ctx);
            match parser.parse_value(&mut rest, 0, DEPTH) {
                Status::AbsentValue => Ok(value),
                _ => Err(Status::TrailingContent),
            }
        }
        Status::AbsentValue => Ok(Value::null(ctx)),
        status => Err(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    fn parse_ok(input: &[u8]) -> Value {
        match parse(Alloc::default(), input) {
            Ok(value) => value,
            Err(status) => panic!("expected success, got {status}"),
        }
    }

    fn parse_err(input: &[u8]) -> Status {
        match parse(Alloc::default(), input) {
            Ok(value) => panic!("expected an error, got {value}"),
            Err(status) => status,
        }
    }

    #[test]
    fn test_parse_literals() {
        assert!(parse_ok(b"null").is_null());
        assert!(parse_ok(b"true").get_bool());
        assert!(!parse_ok(b"false").get_bool());
        assert!(parse_ok(b" \t\r\n null \t").is_null());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_ok(b"42").get_long(), 42);
        assert_eq!(parse_ok(b"-123").get_long(), -123);
        assert_eq!(parse_ok(b"0").get_long(), 0);
        assert_eq!(parse_ok(b"3.14").get_double(), 3.14);
        assert_eq!(parse_ok(b"-2e2").get_double(), -200.0);
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_ok(br#""hello""#).get_string(), "hello");
        assert_eq!(parse_ok(br#""""#).get_string(), "");
    }

    #[test]
    fn test_parse_array() {
        let value = parse_ok(b"[1, 2, 3]");
        assert_eq!(value.kind(), Kind::Array);
        assert_eq!(value.get_array().len(), 3);
        assert_eq!(value[1].get_long(), 2);
        assert!(parse_ok(b"[]").get_array().is_empty());
        assert!(parse_ok(b"[ ]").get_array().is_empty());
    }

    #[test]
    fn test_parse_object() {
        let value = parse_ok(br#"{"a": 1, "b": 2}"#);
        assert_eq!(value.kind(), Kind::Object);
        assert_eq!(value["a"].get_long(), 1);
        assert_eq!(value["b"].get_long(), 2);
        assert!(parse_ok(b"{}").get_object().is_empty());
    }

    #[test]
    fn test_parse_nested() {
        let value = parse_ok(br#"{"arr": [1, {"nested": true}], "num": 42}"#);
        assert!(value["arr"][1]["nested"].get_bool());
        assert_eq!(value["num"].get_long(), 42);
    }

    #[test]
    fn test_duplicate_keys_last_writer_wins() {
        let value = parse_ok(br#"{"a": 1, "a": 2}"#);
        assert_eq!(value.get_object().len(), 1);
        assert_eq!(value["a"].get_long(), 2);
    }

    #[test]
    fn test_empty_input_is_null() {
        assert!(parse_ok(b"").is_null());
        assert!(parse_ok(b"   \n\t ").is_null());
    }

    #[test]
    fn test_trailing_content() {
        assert_eq!(parse_err(b"null extra"), Status::TrailingContent);
        assert_eq!(parse_err(b"[] []"), Status::TrailingContent);
        assert_eq!(parse_err(b"0x"), Status::TrailingContent);
        assert_eq!(parse_err(b"1 2"), Status::TrailingContent);
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(parse_err(b"[1, 2,]"), Status::UnexpectedComma);
        assert_eq!(parse_err(br#"{"Extra comma": true,}"#), Status::UnexpectedComma);
        assert_eq!(parse_err(b"[,]"), Status::UnexpectedComma);
        assert_eq!(parse_err(b","), Status::UnexpectedComma);
        assert_eq!(parse_err(b"[1,,2]"), Status::UnexpectedComma);
    }

    #[test]
    fn test_punctuation_errors() {
        assert_eq!(parse_err(b"]"), Status::UnexpectedEndOfArray);
        assert_eq!(parse_err(b"}"), Status::UnexpectedEndOfObject);
        assert_eq!(parse_err(b":"), Status::UnexpectedColon);
        assert_eq!(parse_err(b"[1 2]"), Status::MissingComma);
        assert_eq!(parse_err(br#"{"a" 1}"#), Status::MissingColon);
        assert_eq!(parse_err(br#"{"a": 1 "b": 2}"#), Status::MissingComma);
    }

    #[test]
    fn test_object_shape_errors() {
        assert_eq!(parse_err(b"{1: 2}"), Status::ObjectKeyMustBeString);
        assert_eq!(parse_err(b"{null: 2}"), Status::ObjectKeyMustBeString);
        assert_eq!(parse_err(br#"{"a":}"#), Status::UnexpectedEndOfObject);
        assert_eq!(parse_err(br#"{"a"}"#), Status::UnexpectedEndOfObject);
    }

    #[test]
    fn test_bad_literals() {
        assert_eq!(parse_err(b"nul"), Status::IllegalCharacter);
        assert_eq!(parse_err(b"tru"), Status::IllegalCharacter);
        assert_eq!(parse_err(b"fals"), Status::IllegalCharacter);
        assert_eq!(parse_err(b"+1"), Status::IllegalCharacter);
        assert_eq!(parse_err(b"-"), Status::BadNegative);
        assert_eq!(parse_err(b"01"), Status::UnexpectedOctal);
        assert_eq!(parse_err(b"1."), Status::BadDouble);
        assert_eq!(parse_err(b"1e"), Status::BadExponent);
    }

    #[test]
    fn test_eof_inside_containers() {
        assert_eq!(parse_err(b"["), Status::UnexpectedEof);
        assert_eq!(parse_err(b"[1"), Status::UnexpectedEof);
        assert_eq!(parse_err(br#"{"a": 1"#), Status::UnexpectedEof);
        assert_eq!(parse_err(br#"{"key"#), Status::UnexpectedEndOfString);
    }

    #[test]
    fn test_depth_limits() {
        // Nineteen open containers leave one level for the leaf.
        let deep_ok = format!("{}0{}", "[".repeat(19), "]".repeat(19));
        assert_eq!(parse_ok(deep_ok.as_bytes()).kind(), Kind::Array);

        let too_deep = format!("{}0{}", "[".repeat(20), "]".repeat(20));
        assert_eq!(parse_err(too_deep.as_bytes()), Status::DepthExceeded);

        let way_too_deep = "[".repeat(64);
        assert_eq!(parse_err(way_too_deep.as_bytes()), Status::DepthExceeded);
    }

    #[test]
    fn test_tree_lives_under_context() {
        let ctx = Alloc::default();
        let value = parse_ok(br#"{"k": ["v"]}"#);
        assert_eq!(value.context(), ctx);
        assert_eq!(value["k"].context(), ctx);
        assert_eq!(value["k"][0].context(), ctx);
    }
}
