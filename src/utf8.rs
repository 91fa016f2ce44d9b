//! Table-driven UTF-8 byte classification.
//!
//! The string tokenizer dispatches every body byte through a 256-entry
//! lookup. A lead byte's class fully determines how many continuation bytes
//! to consume and which overlong/surrogate checks apply before a code point
//! is emitted, which keeps the hot loop branch-lean.

use crate::alloc::Buf;

/// What a byte can be at the start of the next string-body item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    /// Printable ASCII, including DEL.
    Ascii,
    /// C0 control code, 0x00-0x1F.
    C0,
    /// The closing quote.
    Dquote,
    /// Escape introducer.
    Backslash,
    /// Lead of a two-byte sequence.
    Utf8Two,
    /// Lead of a three-byte sequence with no special cases.
    Utf8Three,
    /// Lead of a four-byte sequence with no special cases.
    Utf8Four,
    /// C1 control code, 0x80-0x9F, illegal as a lead.
    C1,
    /// The 0xE0 lead, which can hide an overlong two-byte value.
    Utf8ThreeE0,
    /// The 0xED lead, which can hide a UTF-16 surrogate or a CESU-8 pair.
    Utf8ThreeEd,
    /// The 0xF0 lead, which can hide an overlong three-byte value.
    Utf8FourF0,
    /// A byte no UTF-8 sequence can start with.
    Bad,
    /// 0xC0/0xC1, the leads of overlong ASCII.
    Evil,
}

use Class::*;

pub(crate) static CLASSES: [Class; 256] = [
    C0, C0, C0, C0, C0, C0, C0, C0, // 0x00
    C0, C0, C0, C0, C0, C0, C0, C0, // 0x08
    C0, C0, C0, C0, C0, C0, C0, C0, // 0x10
    C0, C0, C0, C0, C0, C0, C0, C0, // 0x18
    Ascii, Ascii, Dquote, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x20
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x28
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x30
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x38
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x40
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x48
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x50
    Ascii, Ascii, Ascii, Ascii, Backslash, Ascii, Ascii, Ascii, // 0x58
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x60
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x68
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x70
    Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, Ascii, // 0x78
    C1, C1, C1, C1, C1, C1, C1, C1, // 0x80
    C1, C1, C1, C1, C1, C1, C1, C1, // 0x88
    C1, C1, C1, C1, C1, C1, C1, C1, // 0x90
    C1, C1, C1, C1, C1, C1, C1, C1, // 0x98
    Bad, Bad, Bad, Bad, Bad, Bad, Bad, Bad, // 0xA0
    Bad, Bad, Bad, Bad, Bad, Bad, Bad, Bad, // 0xA8
    Bad, Bad, Bad, Bad, Bad, Bad, Bad, Bad, // 0xB0
    Bad, Bad, Bad, Bad, Bad, Bad, Bad, Bad, // 0xB8
    Evil, Evil, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, // 0xC0
    Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, // 0xC8
    Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, // 0xD0
    Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, Utf8Two, // 0xD8
    Utf8ThreeE0, Utf8Three, Utf8Three, Utf8Three, Utf8Three, Utf8Three, Utf8Three, Utf8Three, // 0xE0
    Utf8Three, Utf8Three, Utf8Three, Utf8Three, Utf8Three, Utf8ThreeEd, Utf8Three, Utf8Three, // 0xE8
    Utf8FourF0, Utf8Four, Utf8Four, Utf8Four, Utf8Four, Bad, Bad, Bad, // 0xF0
    Bad, Bad, Bad, Bad, Bad, Bad, Bad, Bad, // 0xF8
];

#[inline]
pub(crate) fn classify(byte: u8) -> Class {
    CLASSES[byte as usize]
}

#[inline]
pub(crate) fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

#[inline]
pub(crate) fn is_surrogate(c: u32) -> bool {
    c & 0xF800 == 0xD800
}

#[inline]
pub(crate) fn is_high_surrogate(c: u32) -> bool {
    c & 0xFC00 == 0xD800
}

#[inline]
pub(crate) fn is_low_surrogate(c: u32) -> bool {
    c & 0xFC00 == 0xDC00
}

/// Combine a UTF-16 surrogate pair into a supplementary code point.
#[inline]
pub(crate) fn merge_surrogates(hi: u32, lo: u32) -> u32 {
    ((hi - 0xD800) << 10) + (lo - 0xDC00) + 0x10000
}

/// Append a decoded value re-encoded as UTF-8; non-scalar input falls back
/// to U+FFFD so the buffer stays valid UTF-8 no matter what.
pub(crate) fn put_utf8(buf: &mut Buf, c: u32) {
    let ch = char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER);
    let mut scratch = [0u8; 4];
    buf.extend(ch.encode_utf8(&mut scratch).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Alloc;

    #[test]
    fn test_ascii_classes() {
        assert_eq!(classify(b' '), Ascii);
        assert_eq!(classify(b'"'), Dquote);
        assert_eq!(classify(b'\\'), Backslash);
        assert_eq!(classify(0x7F), Ascii, "DEL is not a rejected control");
        assert_eq!(classify(b'\t'), C0);
        assert_eq!(classify(0x00), C0);
    }

    #[test]
    fn test_lead_classes() {
        assert_eq!(classify(0x80), C1);
        assert_eq!(classify(0x9F), C1);
        assert_eq!(classify(0xA0), Bad);
        assert_eq!(classify(0xBF), Bad);
        assert_eq!(classify(0xC0), Evil);
        assert_eq!(classify(0xC1), Evil);
        assert_eq!(classify(0xC2), Utf8Two);
        assert_eq!(classify(0xDF), Utf8Two);
        assert_eq!(classify(0xE0), Utf8ThreeE0);
        assert_eq!(classify(0xED), Utf8ThreeEd);
        assert_eq!(classify(0xEF), Utf8Three);
        assert_eq!(classify(0xF0), Utf8FourF0);
        assert_eq!(classify(0xF4), Utf8Four);
        assert_eq!(classify(0xF5), Bad);
        assert_eq!(classify(0xFF), Bad);
    }

    #[test]
    fn test_surrogate_predicates() {
        assert!(is_surrogate(0xD800));
        assert!(is_surrogate(0xDFFF));
        assert!(!is_surrogate(0xD7FF));
        assert!(!is_surrogate(0xE000));
        assert!(is_high_surrogate(0xD834));
        assert!(is_low_surrogate(0xDD1E));
        assert_eq!(merge_surrogates(0xD834, 0xDD1E), 0x1D11E);
        assert_eq!(merge_surrogates(0xD800, 0xDC00), 0x10000);
        assert_eq!(merge_surrogates(0xDBFF, 0xDFFF), 0x10FFFF);
    }

    #[test]
    fn test_put_utf8() {
        let mut buf = Buf::new_in(Alloc::default());
        put_utf8(&mut buf, 0x41);
        put_utf8(&mut buf, 0xE9);
        put_utf8(&mut buf, 0x1D11E);
        assert_eq!(buf.as_slice(), b"A\xC3\xA9\xF0\x9D\x84\x9E");
    }

    #[test]
    fn test_put_utf8_rejects_non_scalar() {
        let mut buf = Buf::new_in(Alloc::default());
        put_utf8(&mut buf, 0xD800);
        assert_eq!(buf.as_slice(), "\u{FFFD}".as_bytes());
    }
}
