//! Best-effort decoding of small metadata text files.
//!
//! Memory card tools write these side files in whatever encoding the host used:
//! UTF-16 from Windows tools, Shift_JIS or EUC-JP from Japanese ones, and
//! Windows-1252 everywhere else. Each encoding in [`TextEncoding::LADDER`] is
//! tried strictly; the first that yields readable text wins.

use encoding_rs::{
    EUC_JP, Encoding, ISO_2022_JP, SHIFT_JIS, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252,
};

/// Encodings tried when decoding a metadata file, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf16Le,
    Utf16Be,
    /// UTF-16 with the byte order taken from a leading BOM.
    Utf16Bom,
    Utf8,
    ShiftJis,
    EucJp,
    Iso2022Jp,
    Windows1252,
}

impl TextEncoding {
    pub const LADDER: [Self; 8] = [
        Self::Utf16Le,
        Self::Utf16Be,
        Self::Utf16Bom,
        Self::Utf8,
        Self::ShiftJis,
        Self::EucJp,
        Self::Iso2022Jp,
        Self::Windows1252,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Utf16Bom => "utf-16",
            Self::Utf8 => "utf-8",
            Self::ShiftJis => "shift_jis",
            Self::EucJp => "euc-jp",
            Self::Iso2022Jp => "iso-2022-jp",
            Self::Windows1252 => "windows-1252",
        }
    }

    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(self, Self::Utf16Le | Self::Utf16Be | Self::Utf16Bom)
    }

    /// Strict decode; `None` on any malformed sequence.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let encoding: &'static Encoding = match self {
            // A BOM naming the other byte order rules this one out.
            Self::Utf16Le if bytes.starts_with(b"\xFE\xFF") => return None,
            Self::Utf16Be if bytes.starts_with(b"\xFF\xFE") => return None,
            Self::Utf16Le => UTF_16LE,
            Self::Utf16Be => UTF_16BE,
            Self::Utf16Bom => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding == UTF_8 {
                    return None;
                }
                return strict(encoding, &bytes[bom_len..]);
            }
            Self::Utf8 => UTF_8,
            Self::ShiftJis => SHIFT_JIS,
            Self::EucJp => EUC_JP,
            Self::Iso2022Jp => ISO_2022_JP,
            Self::Windows1252 => WINDOWS_1252,
        };
        strict(encoding, bytes)
    }
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
}

/// Decoded file content and the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

fn looks_wide(bytes: &[u8]) -> bool {
    bytes.contains(&0)
        || bytes.starts_with(b"\xFF\xFE")
        || bytes.starts_with(b"\xFE\xFF")
        || shared_high_byte(bytes)
}

/// BOM-less, NUL-less UTF-16 from one script repeats its high byte at every
/// other position. Only bytes that cannot lead narrow text count: the control
/// range (Greek, Cyrillic and similar blocks) and `0x30` (kana). Shift_JIS
/// kana also repeat a lead byte, but `0x81..=0x9F` is excluded.
fn shared_high_byte(bytes: &[u8]) -> bool {
    const MIN_UNITS: usize = 4;
    if bytes.len() / 2 < MIN_UNITS {
        return false;
    }
    let dominant = |parity: usize| -> Option<u8> {
        let mut counts = [0usize; 256];
        let mut total = 0usize;
        for &byte in bytes.iter().skip(parity).step_by(2) {
            counts[usize::from(byte)] += 1;
            total += 1;
        }
        let (byte, top) = counts
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(_, count)| count)?;
        if top * 4 >= total * 3 {
            u8::try_from(byte).ok()
        } else {
            None
        }
    };
    let high_byte = |byte: u8| byte < 0x20 || byte == 0x30;
    match (dominant(0), dominant(1)) {
        (Some(even), None) => high_byte(even),
        (None, Some(odd)) => high_byte(odd),
        _ => false,
    }
}

/// Drops control characters other than `\n`, `\r`, `\t`, strips a leading BOM and
/// surrounding whitespace; `None` unless something alphanumeric remains.
fn readable(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|&c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect();
    let text = kept.trim().trim_start_matches('\u{feff}').trim();
    text.chars()
        .any(char::is_alphanumeric)
        .then(|| text.to_string())
}

/// Decodes `bytes` with the first encoding that yields readable text.
///
/// Wide encodings are only considered when the bytes carry a UTF-16 BOM, a
/// NUL or a UTF-16 high byte repeated at every other position; otherwise a
/// pair of ASCII bytes would decode as one CJK code unit. When
/// every strict wide decode fails on such bytes, both UTF-16 byte orders are
/// retried lossily before any narrow encoding, since Windows-1252 accepts
/// every byte and would otherwise always win.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Option<DecodedText> {
    if bytes.is_empty() {
        return None;
    }
    let ladder = TextEncoding::LADDER;
    let (wide_ladder, narrow_ladder) = ladder.split_at(3);

    if looks_wide(bytes) {
        for &encoding in wide_ladder {
            if let Some(decoded) = decode_with(encoding, bytes) {
                return Some(decoded);
            }
        }
        if let Some(decoded) = lossy_wide(bytes) {
            return Some(decoded);
        }
    }
    narrow_ladder
        .iter()
        .find_map(|&encoding| decode_with(encoding, bytes))
}

fn decode_with(encoding: TextEncoding, bytes: &[u8]) -> Option<DecodedText> {
    let text = encoding.decode(bytes).as_deref().and_then(readable)?;
    Some(DecodedText {
        text,
        encoding: encoding.label(),
    })
}

/// UTF-16 with malformed units replaced and a dangling odd byte dropped. A BOM
/// picks the byte order to try first.
fn lossy_wide(bytes: &[u8]) -> Option<DecodedText> {
    let (body, orders) = if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        (rest, [(UTF_16BE, "utf-16be"), (UTF_16LE, "utf-16le")])
    } else {
        let rest = bytes.strip_prefix(b"\xFF\xFE").unwrap_or(bytes);
        (rest, [(UTF_16LE, "utf-16le"), (UTF_16BE, "utf-16be")])
    };
    let even = &body[..body.len() - body.len() % 2];
    for (encoding, label) in orders {
        let (raw, _) = encoding.decode_without_bom_handling(even);
        if let Some(text) = readable(&raw) {
            log::debug!("metadata text recovered with lossy {label}");
            return Some(DecodedText {
                text,
                encoding: label,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf16be_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        bytes
    }

    #[test]
    fn plain_ascii_is_utf8() {
        let decoded = decode_text(b"Sonic Adventure\r\n").expect("decoded");
        assert_eq!(decoded.text, "Sonic Adventure");
        assert_eq!(decoded.encoding, "utf-8");
    }

    #[test]
    fn utf16_variants() {
        let decoded = decode_text(&utf16le("\u{feff}Shenmue HDR-0178")).expect("le");
        assert_eq!(decoded.text, "Shenmue HDR-0178");
        assert_eq!(decoded.encoding, "utf-16le");

        let decoded = decode_text(&utf16be_with_bom("T-1201N")).expect("be");
        assert_eq!(decoded.text, "T-1201N");
        assert_eq!(decoded.encoding, "utf-16be");
    }

    #[test]
    fn truncated_utf16_is_recovered_lossily() {
        let mut bytes = utf16le("ソニックアドベンチャー");
        bytes.push(0x30);
        assert!(!bytes.contains(&0));
        let decoded = decode_text(&bytes).expect("recovered");
        assert_eq!(decoded.text, "ソニックアドベンチャー");
        assert_eq!(decoded.encoding, "utf-16le");

        let mut bytes = utf16be_with_bom("Jet Grind Radio");
        bytes.push(0x00);
        let decoded = decode_text(&bytes).expect("recovered");
        assert_eq!(decoded.text, "Jet Grind Radio");
        assert_eq!(decoded.encoding, "utf-16be");
    }

    #[test]
    fn narrow_text_is_not_taken_for_wide() {
        assert!(!shared_high_byte(b"Sonic Adventure"));
        assert!(!shared_high_byte(b"AAAAAAAA"));
        assert!(shared_high_byte(&utf16le("ソニック")));
        let (sjis, _, _) = SHIFT_JIS.encode("ソニック");
        assert!(!shared_high_byte(&sjis));
    }

    #[test]
    fn shift_jis_fallback() {
        let (bytes, _, _) = SHIFT_JIS.encode("ソニック アドベンチャー");
        let decoded = decode_text(&bytes).expect("sjis");
        assert_eq!(decoded.encoding, "shift_jis");
        assert_eq!(decoded.text, "ソニック アドベンチャー");
    }

    #[test]
    fn unreadable_content_is_rejected() {
        assert!(decode_text(b"").is_none());
        assert!(decode_text(b"\x01\x02\x03   ").is_none());
        assert_eq!(
            decode_text(b"Caf\xe9").map(|d| d.text),
            Some("Caf\u{e9}".to_string())
        );
    }
}
