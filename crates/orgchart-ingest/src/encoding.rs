//! Repair for UTF-8 text that was decoded as Latin-1 somewhere upstream
//! (`JosÃ©` instead of `José`).

use std::borrow::Cow;

const MOJIBAKE_MARKERS: [char; 7] = ['Ã', 'Â', 'â', 'ê', 'î', 'ô', 'û'];

/// Undo a UTF-8-as-Latin-1 mis-decode.
///
/// Only attempted when the text contains a typical marker; if the chars do
/// not re-encode into valid UTF-8 the input is returned unchanged.
pub fn repair_mojibake(s: &str) -> Cow<'_, str> {
    if !s.contains(MOJIBAKE_MARKERS) {
        return Cow::Borrowed(s);
    }

    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect();
    match bytes.and_then(|b| String::from_utf8(b).ok()) {
        Some(fixed) => Cow::Owned(fixed),
        None => Cow::Borrowed(s),
    }
}
