//! The subset of ECI-numbered character sets this crate can decode text
//! with, backed by `encoding_rs` (spec §4.7, Supplemented: ECI handling).

use encoding_rs::Encoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSetEci {
    Cp437,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso8859_10,
    Iso8859_11,
    Iso8859_13,
    Iso8859_14,
    Iso8859_15,
    Iso8859_16,
    ShiftJis,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp1256,
    Utf16Be,
    Utf8,
    Ascii,
    Big5,
    Gb2312,
    Euckr,
    Gbk,
    Gb18030,
    Utf16Le,
    Utf32Be,
    Utf32Le,
    Binary,
}

impl CharacterSetEci {
    /// The ECI value ZXing assigns this character set, per the AIM ECI
    /// registry. `None` for sets this crate recognizes by name but that
    /// have no ECI assignment (e.g. the `Binary` escape hatch).
    pub const fn value(self) -> Option<u32> {
        use CharacterSetEci::*;
        Some(match self {
            Cp437 => 0,
            Iso8859_1 => 1,
            Iso8859_2 => 4,
            Iso8859_3 => 5,
            Iso8859_4 => 6,
            Iso8859_5 => 7,
            Iso8859_6 => 8,
            Iso8859_7 => 9,
            Iso8859_8 => 10,
            Iso8859_9 => 11,
            Iso8859_10 => 12,
            Iso8859_11 => 13,
            Iso8859_13 => 15,
            Iso8859_14 => 16,
            Iso8859_15 => 17,
            Iso8859_16 => 18,
            ShiftJis => 20,
            Cp1250 => 21,
            Cp1251 => 22,
            Cp1252 => 23,
            Cp1256 => 24,
            Utf16Be => 25,
            Utf8 => 26,
            Ascii => 27,
            Big5 => 28,
            Gb2312 => 29,
            Euckr => 30,
            Gbk => 31,
            Gb18030 => 32,
            Utf16Le => 33,
            Utf32Be => 34,
            Utf32Le => 35,
            Binary => return None,
        })
    }

    pub fn from_value(value: u32) -> Option<Self> {
        use CharacterSetEci::*;
        Some(match value {
            0 => Cp437,
            1 | 2 => Iso8859_1,
            4 => Iso8859_2,
            5 => Iso8859_3,
            6 => Iso8859_4,
            7 => Iso8859_5,
            8 => Iso8859_6,
            9 => Iso8859_7,
            10 => Iso8859_8,
            11 => Iso8859_9,
            12 => Iso8859_10,
            13 => Iso8859_11,
            15 => Iso8859_13,
            16 => Iso8859_14,
            17 => Iso8859_15,
            18 => Iso8859_16,
            20 => ShiftJis,
            21 => Cp1250,
            22 => Cp1251,
            23 => Cp1252,
            24 => Cp1256,
            25 => Utf16Be,
            26 => Utf8,
            27 => Ascii,
            28 => Big5,
            29 => Gb2312,
            30 => Euckr,
            31 => Gbk,
            32 => Gb18030,
            33 => Utf16Le,
            34 => Utf32Be,
            35 => Utf32Le,
            _ => return None,
        })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        use CharacterSetEci::*;
        Some(match name.to_ascii_uppercase().as_str() {
            "CP437" | "IBM437" => Cp437,
            "ISO-8859-1" | "ISO8859_1" => Iso8859_1,
            "ISO-8859-2" => Iso8859_2,
            "ISO-8859-3" => Iso8859_3,
            "ISO-8859-4" => Iso8859_4,
            "ISO-8859-5" => Iso8859_5,
            "ISO-8859-6" => Iso8859_6,
            "ISO-8859-7" => Iso8859_7,
            "ISO-8859-8" => Iso8859_8,
            "ISO-8859-9" => Iso8859_9,
            "ISO-8859-10" => Iso8859_10,
            "ISO-8859-11" => Iso8859_11,
            "ISO-8859-13" => Iso8859_13,
            "ISO-8859-14" => Iso8859_14,
            "ISO-8859-15" => Iso8859_15,
            "ISO-8859-16" => Iso8859_16,
            "SJIS" | "SHIFT_JIS" | "SHIFT-JIS" => ShiftJis,
            "WINDOWS-1250" | "CP1250" => Cp1250,
            "WINDOWS-1251" | "CP1251" => Cp1251,
            "WINDOWS-1252" | "CP1252" => Cp1252,
            "WINDOWS-1256" | "CP1256" => Cp1256,
            "UTF-16BE" | "UNICODEBIG" => Utf16Be,
            "UTF-16LE" | "UNICODELITTLE" => Utf16Le,
            "UTF-8" => Utf8,
            "ASCII" | "US-ASCII" => Ascii,
            "BIG5" => Big5,
            "GB2312" | "EUC_CN" | "EUCCN" => Gb2312,
            "EUC-KR" | "EUC_KR" => Euckr,
            "GBK" => Gbk,
            "GB18030" => Gb18030,
            "UTF-32BE" => Utf32Be,
            "UTF-32LE" => Utf32Le,
            "BINARY" => Binary,
            _ => return None,
        })
    }

    /// The `encoding_rs` encoding backing this character set, where one
    /// exists. `Cp437`, `Binary`, `Ascii`, and `Utf32*` are decoded by hand
    /// elsewhere since `encoding_rs` has no `Encoding` for them.
    pub const fn encoding(self) -> Option<&'static Encoding> {
        use CharacterSetEci::*;
        Some(match self {
            Iso8859_1 => encoding_rs::WINDOWS_1252,
            Iso8859_2 => encoding_rs::ISO_8859_2,
            Iso8859_3 => encoding_rs::ISO_8859_3,
            Iso8859_4 => encoding_rs::ISO_8859_4,
            Iso8859_5 => encoding_rs::ISO_8859_5,
            Iso8859_6 => encoding_rs::ISO_8859_6,
            Iso8859_7 => encoding_rs::ISO_8859_7,
            Iso8859_8 => encoding_rs::ISO_8859_8,
            Iso8859_9 => encoding_rs::WINDOWS_1254,
            Iso8859_13 => encoding_rs::ISO_8859_13,
            Iso8859_15 => encoding_rs::ISO_8859_15,
            ShiftJis => encoding_rs::SHIFT_JIS,
            Cp1250 => encoding_rs::WINDOWS_1250,
            Cp1251 => encoding_rs::WINDOWS_1251,
            Cp1252 => encoding_rs::WINDOWS_1252,
            Cp1256 => encoding_rs::WINDOWS_1256,
            Utf16Be => encoding_rs::UTF_16BE,
            Utf16Le => encoding_rs::UTF_16LE,
            Utf8 => encoding_rs::UTF_8,
            Big5 => encoding_rs::BIG5,
            Gb2312 | Gbk | Gb18030 => encoding_rs::GBK,
            Euckr => encoding_rs::EUC_KR,
            Iso8859_10 | Iso8859_11 | Iso8859_14 | Iso8859_16 | Cp437 | Ascii | Binary | Utf32Be | Utf32Le => {
                return None
            }
        })
    }

    /// Decodes `bytes` using this character set, replacing malformed
    /// sequences rather than failing (spec §4.7 Byte-mode segments are
    /// never rejected purely for encoding errors).
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            CharacterSetEci::Cp437 => bytes.iter().map(|&b| cp437_to_char(b)).collect(),
            CharacterSetEci::Ascii | CharacterSetEci::Binary => {
                bytes.iter().map(|&b| if b < 0x80 { b as char } else { '\u{FFFD}' }).collect()
            }
            _ => match self.encoding() {
                Some(encoding) => {
                    let (text, _, _) = encoding.decode(bytes);
                    text.into_owned()
                }
                None => bytes.iter().map(|&b| b as char).collect(),
            },
        }
    }
}

/// Code page 437's upper half, since `encoding_rs` has no CP437 table (it
/// predates the Unicode era IBM PC encodings `encoding_rs` targets).
fn cp437_to_char(byte: u8) -> char {
    if byte < 0x80 {
        return byte as char;
    }
    const UPPER_HALF: [char; 128] = [
        // 0x80..0x8F
        'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
        // 0x90..0x9F
        'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
        // 0xA0..0xAF
        'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
        // 0xB0..0xBF
        '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
        // 0xC0..0xCF
        '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
        // 0xD0..0xDF
        '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
        // 0xE0..0xEF
        'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
        // 0xF0..0xFF
        '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
    ];
    UPPER_HALF[(byte - 0x80) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips_through_from_value() {
        assert_eq!(CharacterSetEci::from_value(CharacterSetEci::Utf8.value().unwrap()), Some(CharacterSetEci::Utf8));
        assert_eq!(CharacterSetEci::from_value(26), Some(CharacterSetEci::Utf8));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(CharacterSetEci::from_name("utf-8"), Some(CharacterSetEci::Utf8));
        assert_eq!(CharacterSetEci::from_name("Shift_JIS"), Some(CharacterSetEci::ShiftJis));
    }

    #[test]
    fn cp437_decodes_box_drawing() {
        assert_eq!(CharacterSetEci::Cp437.decode(&[0xC4]), "─");
    }
}
