//! Recovery of group labels mangled by a console code page.
//!
//! A label typed into a Windows console often reaches us decoded with the
//! wrong single-byte code page (or was encoded with one and read back as
//! UTF-8). Each supported code page is tried in both directions.

use encoding_rs::{Encoding, IBM866, WINDOWS_1251};

/// Single-byte code pages a label may have passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCodePage {
    Windows1251,
    Oem866,
    Latin1,
}

impl LegacyCodePage {
    pub const ALL: [LegacyCodePage; 3] = [
        LegacyCodePage::Windows1251,
        LegacyCodePage::Oem866,
        LegacyCodePage::Latin1,
    ];

    fn encoding(self) -> Option<&'static Encoding> {
        match self {
            LegacyCodePage::Windows1251 => Some(WINDOWS_1251),
            LegacyCodePage::Oem866 => Some(IBM866),
            // ISO-8859-1 maps bytes to code points one to one; encoding_rs
            // only has its windows-1252 superset.
            LegacyCodePage::Latin1 => None,
        }
    }

    /// Encodes `text`, silently dropping characters the page cannot hold.
    pub fn encode_lossy(self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len());
        match self.encoding() {
            Some(encoding) => {
                let mut buf = [0u8; 4];
                for ch in text.chars() {
                    let (encoded, _, had_errors) = encoding.encode(ch.encode_utf8(&mut buf));
                    if !had_errors {
                        bytes.extend_from_slice(&encoded);
                    }
                }
            }
            None => bytes.extend(
                text.chars()
                    .filter_map(|ch| u8::try_from(u32::from(ch)).ok()),
            ),
        }
        bytes
    }

    /// Decodes `bytes`, or `None` if a byte is unmapped in this page.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self.encoding() {
            Some(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            None => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// All distinct re-encodings of `label`, the label itself first.
///
/// For every code page two repairs are attempted: the label was UTF-8 shown
/// through the page (encode with the page, read as UTF-8), and the label was
/// page bytes read as UTF-8 in reverse (encode as UTF-8, read with the page).
pub fn encoding_variants(label: &str) -> Vec<String> {
    let mut variants = vec![label.to_string()];

    for page in LegacyCodePage::ALL {
        let repaired = String::from_utf8(page.encode_lossy(label)).ok();
        let reinterpreted = page.decode(label.as_bytes());

        for variant in [repaired, reinterpreted].into_iter().flatten() {
            if !variants.contains(&variant) {
                variants.push(variant);
            }
        }
    }

    variants
}
