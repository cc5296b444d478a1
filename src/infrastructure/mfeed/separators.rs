//! # Wire Separators
//!
//! Single-byte frame, group, record and unit separators. There is no
//! escaping: these bytes may never appear inside header text or values.

/// File separator: opens and closes a message.
pub const FS: u8 = 0x1c;
/// Group separator: ends the record type and tag.
pub const GS: u8 = 0x1d;
/// Record separator: starts each field record.
pub const RS: u8 = 0x1e;
/// Unit separator: splits key from value.
pub const US: u8 = 0x1f;

/// Returns true for any of the four reserved bytes.
#[inline]
#[must_use]
pub const fn is_separator(byte: u8) -> bool {
    matches!(byte, FS | GS | RS | US)
}

/// Returns the position of the first reserved byte, if any.
#[inline]
#[must_use]
pub fn find_separator(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| is_separator(b))
}

/// Returns a printable name for a reserved byte.
#[must_use]
pub const fn name(byte: u8) -> &'static str {
    match byte {
        FS => "FS",
        GS => "GS",
        RS => "RS",
        US => "US",
        _ => "byte",
    }
}
