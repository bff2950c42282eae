//! Per-line text decoding with a Windows-1252 fallback.

/// Encoding a physical line was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEncoding {
    Utf8,
    Windows1252,
}

/// Windows-1252 code points for bytes 0x80..=0x9F.
///
/// The five bytes the code page leaves undefined map to the C1 control
/// character with the same value, like the Latin-1 range above them.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decode bytes as Windows-1252. Never fails.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
            _ => char::from(b),
        })
        .collect()
}

/// Decode a whole line: UTF-8 if the entire line is valid UTF-8, otherwise
/// the entire line as Windows-1252.
pub fn decode_line(bytes: &[u8]) -> (String, LineEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), LineEncoding::Utf8),
        Err(_) => (decode_windows_1252(bytes), LineEncoding::Windows1252),
    }
}

/// Strip one trailing `\n` and a `\r` before it.
pub fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// True if the text holds control characters other than horizontal tab.
pub fn has_control_chars(text: &str) -> bool {
    text.chars().any(|c| c.is_control() && c != '\t')
}
