//! Decodes the data codewords of a QR Code symbol back into text (spec
//! §4.7, ISO/IEC 18004 §6.4.3-6.4.7).

use crate::common::bit_source::BitSource;
use crate::common::character_set_eci::CharacterSetEci;
use crate::common::decoder_result::DecoderResult;
use crate::common::string_utils;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::qrcode::decoder::error_correction_level::ErrorCorrectionLevel;
use crate::qrcode::decoder::mode::Mode;
use crate::qrcode::decoder::version::Version;

const ALPHANUMERIC_CHARS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";
const GB2312_SUBSET: u32 = 1;

pub fn decode(bytes: &[u8], version: &Version, ec_level: ErrorCorrectionLevel, hints: &DecodeHints) -> Result<DecoderResult> {
    let mut bits = BitSource::new(bytes);
    let mut result = String::with_capacity(50);
    let mut byte_segments: Vec<Vec<u8>> = Vec::new();
    let mut symbol_sequence = -1i32;
    let mut parity_data = -1i32;

    let mut current_charset: Option<CharacterSetEci> = None;
    let mut fnc1_in_effect = false;
    let mut has_fnc1_first = false;
    let mut has_fnc1_second = false;

    loop {
        let mode = if bits.available() < 4 { Mode::Terminator } else { Mode::from_bits(bits.read_bits(4)?)? };

        match mode {
            Mode::Terminator => break,
            Mode::FNC1FirstPosition => {
                has_fnc1_first = true;
                fnc1_in_effect = true;
            }
            Mode::FNC1SecondPosition => {
                has_fnc1_second = true;
                fnc1_in_effect = true;
            }
            Mode::StructuredAppend => {
                if bits.available() < 16 {
                    return Err(Exceptions::format_error("structured append header truncated"));
                }
                symbol_sequence = bits.read_bits(8)? as i32;
                parity_data = bits.read_bits(8)? as i32;
            }
            Mode::Eci => {
                let value = parse_eci_value(&mut bits)?;
                current_charset =
                    Some(CharacterSetEci::from_value(value).ok_or_else(|| Exceptions::format_error(format!("unsupported ECI value {value}")))?);
            }
            Mode::HanziChinese => {
                let subset = bits.read_bits(4)?;
                let count = bits.read_bits(mode.character_count_bits(version))? as usize;
                if subset == GB2312_SUBSET {
                    decode_hanzi_segment(&mut bits, &mut result, count)?;
                }
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = bits.read_bits(mode.character_count_bits(version))? as usize;
                match mode {
                    Mode::Numeric => decode_numeric_segment(&mut bits, &mut result, count)?,
                    Mode::Alphanumeric => decode_alphanumeric_segment(&mut bits, &mut result, count, fnc1_in_effect)?,
                    Mode::Byte => decode_byte_segment(&mut bits, &mut result, count, current_charset, &mut byte_segments, hints)?,
                    Mode::Kanji => decode_kanji_segment(&mut bits, &mut result, count)?,
                    _ => unreachable!(),
                }
            }
        }
    }

    let symbology_modifier = if current_charset.is_some() {
        if has_fnc1_first {
            4
        } else if has_fnc1_second {
            6
        } else {
            2
        }
    } else if has_fnc1_first {
        3
    } else if has_fnc1_second {
        5
    } else {
        1
    };

    let mut decoder_result = DecoderResult::new(bytes.to_vec(), result)
        .with_byte_segments(byte_segments)
        .with_ec_level(ec_level.as_str())
        .with_symbology_modifier(symbology_modifier);
    if symbol_sequence >= 0 && parity_data >= 0 {
        decoder_result = decoder_result.with_structured_append(symbol_sequence, parity_data);
    }
    Ok(decoder_result)
}

/// GB2312 Kanji/Hanzi segments store characters as a biased 13-bit pair,
/// per GB/T 18284-2000.
fn decode_hanzi_segment(bits: &mut BitSource, result: &mut String, count: usize) -> Result<()> {
    if count * 13 > bits.available() {
        return Err(Exceptions::format_error("hanzi segment longer than remaining bits"));
    }

    let mut buffer = vec![0u8; 2 * count];
    for chunk in buffer.chunks_mut(2) {
        let two_bytes = bits.read_bits(13)?;
        let mut assembled = ((two_bytes / 0x060) << 8) | (two_bytes % 0x060);
        assembled += if assembled < 0x00A00 { 0x0A1A1 } else { 0x0A6A1 };
        chunk[0] = (assembled >> 8) as u8;
        chunk[1] = assembled as u8;
    }

    result.push_str(&CharacterSetEci::Gb2312.decode(&buffer));
    Ok(())
}

/// Kanji segments store Shift-JIS characters as a biased 13-bit pair.
fn decode_kanji_segment(bits: &mut BitSource, result: &mut String, count: usize) -> Result<()> {
    if count * 13 > bits.available() {
        return Err(Exceptions::format_error("kanji segment longer than remaining bits"));
    }

    let mut buffer = vec![0u8; 2 * count];
    for chunk in buffer.chunks_mut(2) {
        let two_bytes = bits.read_bits(13)?;
        let mut assembled = ((two_bytes / 0x0C0) << 8) | (two_bytes % 0x0C0);
        assembled += if assembled < 0x01F00 { 0x08140 } else { 0x0C140 };
        chunk[0] = (assembled >> 8) as u8;
        chunk[1] = assembled as u8;
    }

    result.push_str(&CharacterSetEci::ShiftJis.decode(&buffer));
    Ok(())
}

fn decode_byte_segment(
    bits: &mut BitSource,
    result: &mut String,
    count: usize,
    current_charset: Option<CharacterSetEci>,
    byte_segments: &mut Vec<Vec<u8>>,
    hints: &DecodeHints,
) -> Result<()> {
    if 8 * count > bits.available() {
        return Err(Exceptions::format_error("byte segment longer than remaining bits"));
    }

    let mut read_bytes = vec![0u8; count];
    for byte in read_bytes.iter_mut() {
        *byte = bits.read_bits(8)? as u8;
    }

    // The spec doesn't pin down an encoding for byte-mode segments that
    // carry no ECI designator; guess the way ZXing does.
    let charset = current_charset.unwrap_or_else(|| string_utils::guess_charset(&read_bytes, hints.character_set.as_deref()));
    result.push_str(&charset.decode(&read_bytes));
    byte_segments.push(read_bytes);

    Ok(())
}

fn to_alphanumeric_char(value: u32) -> Result<char> {
    ALPHANUMERIC_CHARS.as_bytes().get(value as usize).map(|&b| b as char).ok_or_else(|| Exceptions::format_error("alphanumeric value out of range"))
}

fn decode_alphanumeric_segment(bits: &mut BitSource, result: &mut String, mut count: usize, fnc1_in_effect: bool) -> Result<()> {
    let start = result.len();
    while count > 1 {
        if bits.available() < 11 {
            return Err(Exceptions::format_error("alphanumeric pair truncated"));
        }
        let next_two_chars_bits = bits.read_bits(11)?;
        result.push(to_alphanumeric_char(next_two_chars_bits / 45)?);
        result.push(to_alphanumeric_char(next_two_chars_bits % 45)?);
        count -= 2;
    }
    if count == 1 {
        if bits.available() < 6 {
            return Err(Exceptions::format_error("alphanumeric tail truncated"));
        }
        result.push(to_alphanumeric_char(bits.read_bits(6)?)?);
    }

    if fnc1_in_effect {
        // Per ISO/IEC 18004 §6.4.8.1-2: a doubled '%' collapses to one, a
        // lone '%' is the FNC1 separator 0x1D.
        let mut chars: Vec<char> = result[start..].chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '%' {
                if i + 1 < chars.len() && chars[i + 1] == '%' {
                    chars.remove(i + 1);
                } else {
                    chars[i] = '\u{1D}';
                }
            }
            i += 1;
        }
        result.truncate(start);
        result.extend(chars);
    }

    Ok(())
}

fn decode_numeric_segment(bits: &mut BitSource, result: &mut String, mut count: usize) -> Result<()> {
    while count >= 3 {
        if bits.available() < 10 {
            return Err(Exceptions::format_error("numeric triple truncated"));
        }
        let three_digits_bits = bits.read_bits(10)?;
        if three_digits_bits >= 1000 {
            return Err(Exceptions::format_error("numeric triple out of range"));
        }
        result.push(to_alphanumeric_char(three_digits_bits / 100)?);
        result.push(to_alphanumeric_char((three_digits_bits / 10) % 10)?);
        result.push(to_alphanumeric_char(three_digits_bits % 10)?);
        count -= 3;
    }
    if count == 2 {
        if bits.available() < 7 {
            return Err(Exceptions::format_error("numeric pair truncated"));
        }
        let two_digits_bits = bits.read_bits(7)?;
        if two_digits_bits >= 100 {
            return Err(Exceptions::format_error("numeric pair out of range"));
        }
        result.push(to_alphanumeric_char(two_digits_bits / 10)?);
        result.push(to_alphanumeric_char(two_digits_bits % 10)?);
    } else if count == 1 {
        if bits.available() < 4 {
            return Err(Exceptions::format_error("numeric digit truncated"));
        }
        let digit_bits = bits.read_bits(4)?;
        if digit_bits >= 10 {
            return Err(Exceptions::format_error("numeric digit out of range"));
        }
        result.push(to_alphanumeric_char(digit_bits)?);
    }

    Ok(())
}

fn parse_eci_value(bits: &mut BitSource) -> Result<u32> {
    let first_byte = bits.read_bits(8)?;
    if first_byte & 0x80 == 0 {
        return Ok(first_byte & 0x7F);
    }
    if first_byte & 0xC0 == 0x80 {
        let second_byte = bits.read_bits(8)?;
        return Ok(((first_byte & 0x3F) << 8) | second_byte);
    }
    if first_byte & 0xE0 == 0xC0 {
        let second_third_bytes = bits.read_bits(16)?;
        return Ok(((first_byte & 0x1F) << 16) | second_third_bytes);
    }
    Err(Exceptions::format_error("invalid ECI designator"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrcode::decoder::version::get_version_for_number;

    fn bits_for(values: &[(Mode, u32, u32)]) -> Vec<u8> {
        let mut bitvec: Vec<bool> = Vec::new();
        for &(mode, count_bits, count) in values {
            for i in (0..4).rev() {
                bitvec.push((mode.bits() >> i) & 1 == 1);
            }
            for i in (0..count_bits).rev() {
                bitvec.push((count >> i) & 1 == 1);
            }
        }
        let mut bytes = vec![0u8; bitvec.len().div_ceil(8)];
        for (i, &b) in bitvec.iter().enumerate() {
            if b {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }

    #[test]
    fn decodes_numeric_segment() {
        let version = get_version_for_number(1).unwrap();
        // NUMERIC mode, count=3 (10 bits), digits "123" (10 bits = 0b0001111011), then terminator.
        let mut raw = bits_for(&[(Mode::Numeric, 10, 3)]);
        raw.extend_from_slice(&[0b0001_1110, 0b1100_0000]);
        let decoded = decode(&raw, version, ErrorCorrectionLevel::M, &DecodeHints::default()).unwrap();
        assert_eq!(decoded.text(), "123");
    }

    #[test]
    fn decodes_alphanumeric_segment() {
        let version = get_version_for_number(1).unwrap();
        let mut raw = bits_for(&[(Mode::Alphanumeric, 9, 2)]);
        // "AB" -> 10*45+11 = 461 = 0b00111001101
        raw.extend_from_slice(&[0b0011_1001, 0b1010_0000]);
        let decoded = decode(&raw, version, ErrorCorrectionLevel::M, &DecodeHints::default()).unwrap();
        assert_eq!(decoded.text(), "AB");
    }

    #[test]
    fn truncated_segment_is_format_error() {
        let version = get_version_for_number(1).unwrap();
        let raw = bits_for(&[(Mode::Numeric, 10, 3)]);
        assert!(decode(&raw, version, ErrorCorrectionLevel::M, &DecodeHints::default()).is_err());
    }
}
