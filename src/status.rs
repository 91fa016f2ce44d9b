//! Parser and serializer diagnostics.
//!
//! Every outcome of a parse is one value of the closed [`Status`]
//! enumeration. The string returned by [`Status::name`] is part of the
//! public surface and never changes; `Display` prints the same identifier.
//!
//! `Success` and `AbsentValue` are plumbing values used between the
//! recursive parser calls; the public [`parse`](crate::parse) entry point
//! never returns either of them in its `Err` arm.

use thiserror::Error;

/// Diagnostic codes for JSON parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Status {
    /// The input was consumed and a value was produced.
    #[error("success")]
    Success,
    /// A floating-point literal could not be converted.
    #[error("bad_double")]
    BadDouble,
    /// Internal sentinel: a closing token or clean end of input.
    #[error("absent_value")]
    AbsentValue,
    /// A `-` sign with no digit after it.
    #[error("bad_negative")]
    BadNegative,
    /// A well-formed mantissa followed by a malformed exponent.
    #[error("bad_exponent")]
    BadExponent,
    /// Two values in a container with no `,` between them.
    #[error("missing_comma")]
    MissingComma,
    /// An object key with no `:` after it.
    #[error("missing_colon")]
    MissingColon,
    /// A multi-byte sequence with a broken continuation byte.
    #[error("malformed_utf8")]
    MalformedUtf8,
    /// More than [`DEPTH`](crate::DEPTH) nested containers.
    #[error("depth_exceeded")]
    DepthExceeded,
    /// Reserved for implementations that detect native stack exhaustion.
    #[error("stack_overflow")]
    StackOverflow,
    /// Input ended inside a container.
    #[error("unexpected_eof")]
    UnexpectedEof,
    /// An ASCII character hidden in a two-byte sequence.
    #[error("overlong_ascii")]
    OverlongAscii,
    /// A `,` where no value has been parsed yet, or before a closing token.
    #[error("unexpected_comma")]
    UnexpectedComma,
    /// A `:` outside of an object entry.
    #[error("unexpected_colon")]
    UnexpectedColon,
    /// A number with a leading zero.
    #[error("unexpected_octal")]
    UnexpectedOctal,
    /// Non-whitespace bytes after the first document.
    #[error("trailing_content")]
    TrailingContent,
    /// A byte that cannot start any JSON token here.
    #[error("illegal_character")]
    IllegalCharacter,
    /// A `\x` escape without two hex digits.
    #[error("invalid_hex_escape")]
    InvalidHexEscape,
    /// A three-byte sequence encoding a code point below U+0800.
    #[error("overlong_utf8_0x7ff")]
    OverlongUtf80x7ff,
    /// A four-byte sequence encoding a code point below U+10000.
    #[error("overlong_utf8_0xffff")]
    OverlongUtf80xffff,
    /// An object entry whose value slot closed the object.
    #[error("object_missing_value")]
    ObjectMissingValue,
    /// A byte that can never appear in UTF-8 at this position.
    #[error("illegal_utf8_character")]
    IllegalUtf8Character,
    /// A `\u` escape without four hex digits.
    #[error("invalid_unicode_escape")]
    InvalidUnicodeEscape,
    /// A UTF-16 surrogate encoded directly in UTF-8.
    #[error("utf16_surrogate_in_utf8")]
    Utf16SurrogateInUtf8,
    /// A `]` with no open array.
    #[error("unexpected_end_of_array")]
    UnexpectedEndOfArray,
    /// A `\x` escape outside the printable ASCII range.
    #[error("hex_escape_not_printable")]
    HexEscapeNotPrintable,
    /// A `\` followed by a character that is not an escape.
    #[error("invalid_escape_character")]
    InvalidEscapeCharacter,
    /// A four-byte sequence above U+10FFFF.
    #[error("utf8_exceeds_utf16_range")]
    Utf8ExceedsUtf16Range,
    /// Input ended inside a string.
    #[error("unexpected_end_of_string")]
    UnexpectedEndOfString,
    /// A `}` with no open object.
    #[error("unexpected_end_of_object")]
    UnexpectedEndOfObject,
    /// An object key that is not a string.
    #[error("object_key_must_be_string")]
    ObjectKeyMustBeString,
    /// A C1 control byte (0x80-0x9F) in a string body.
    #[error("c1_control_code_in_string")]
    C1ControlCodeInString,
    /// A C0 control byte other than DEL in a string body.
    #[error("non_del_c0_control_code_in_string")]
    NonDelC0ControlCodeInString,
    /// A dispatch state the parser cannot reach.
    #[error("internal_error_unreachable_code")]
    InternalErrorUnreachableCode,
}

impl Status {
    /// Get the fixed identifier for this diagnostic.
    pub fn name(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::BadDouble => "bad_double",
            Status::AbsentValue => "absent_value",
            Status::BadNegative => "bad_negative",
            Status::BadExponent => "bad_exponent",
            Status::MissingComma => "missing_comma",
            Status::MissingColon => "missing_colon",
            Status::MalformedUtf8 => "malformed_utf8",
            Status::DepthExceeded => "depth_exceeded",
            Status::StackOverflow => "stack_overflow",
            Status::UnexpectedEof => "unexpected_eof",
            Status::OverlongAscii => "overlong_ascii",
            Status::UnexpectedComma => "unexpected_comma",
            Status::UnexpectedColon => "unexpected_colon",
            Status::UnexpectedOctal => "unexpected_octal",
            Status::TrailingContent => "trailing_content",
            Status::IllegalCharacter => "illegal_character",
            Status::InvalidHexEscape => "invalid_hex_escape",
            Status::OverlongUtf80x7ff => "overlong_utf8_0x7ff",
            Status::OverlongUtf80xffff => "overlong_utf8_0xffff",
            Status::ObjectMissingValue => "object_missing_value",
            Status::IllegalUtf8Character => "illegal_utf8_character",
            Status::InvalidUnicodeEscape => "invalid_unicode_escape",
            Status::Utf16SurrogateInUtf8 => "utf16_surrogate_in_utf8",
            Status::UnexpectedEndOfArray => "unexpected_end_of_array",
            Status::HexEscapeNotPrintable => "hex_escape_not_printable",
            Status::InvalidEscapeCharacter => "invalid_escape_character",
            Status::Utf8ExceedsUtf16Range => "utf8_exceeds_utf16_range",
            Status::UnexpectedEndOfString => "unexpected_end_of_string",
            Status::UnexpectedEndOfObject => "unexpected_end_of_object",
            Status::ObjectKeyMustBeString => "object_key_must_be_string",
            Status::C1ControlCodeInString => "c1_control_code_in_string",
            Status::NonDelC0ControlCodeInString => "non_del_c0_control_code_in_string",
            Status::InternalErrorUnreachableCode => "internal_error_unreachable_code",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_fixed() {
        assert_eq!(Status::Success.name(), "success");
        assert_eq!(Status::OverlongUtf80x7ff.name(), "overlong_utf8_0x7ff");
        assert_eq!(
            Status::NonDelC0ControlCodeInString.name(),
            "non_del_c0_control_code_in_string"
        );
        assert_eq!(
            Status::InternalErrorUnreachableCode.name(),
            "internal_error_unreachable_code"
        );
    }

    #[test]
    fn test_display_matches_name() {
        for status in [
            Status::BadDouble,
            Status::DepthExceeded,
            Status::TrailingContent,
            Status::Utf16SurrogateInUtf8,
        ] {
            assert_eq!(status.to_string(), status.name());
        }
    }
}
