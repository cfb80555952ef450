//! Aztec's mode-table state machine: Upper/Lower/Mixed/Punct/Digit character
//! tables plus a Binary shift escape, each latched or shifted into by a
//! control code local to the active table (spec §4.10, ISO/IEC 24778 Table 6-10).

use crate::common::bit_array::BitArray;
use crate::common::decoder_result::DecoderResult;
use crate::error::{Exceptions, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Upper,
    Lower,
    Mixed,
    Digit,
    Punct,
    Binary,
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Char(char),
    /// A pair of characters, used for Punct table entries like `"\r\n"`.
    Chars(char, char),
    ShiftPunct,
    LatchLower,
    LatchUpper,
    ShiftUpper,
    LatchMixed,
    LatchDigit,
    LatchPunct,
    BinaryShift,
    /// Punct table entry 0 — "flag" escape, not used by this decoder; a
    /// symbol that emits it is rejected as a format error upstream.
    Flag,
}

fn upper(code: i32) -> Token {
    match code {
        0 => Token::ShiftPunct,
        1 => Token::Char(' '),
        2..=27 => Token::Char((b'A' + (code - 2) as u8) as char),
        28 => Token::LatchLower,
        29 => Token::LatchMixed,
        30 => Token::LatchDigit,
        _ => Token::BinaryShift,
    }
}

fn lower(code: i32) -> Token {
    match code {
        0 => Token::ShiftPunct,
        1 => Token::Char(' '),
        2..=27 => Token::Char((b'a' + (code - 2) as u8) as char),
        28 => Token::ShiftUpper,
        29 => Token::LatchMixed,
        30 => Token::LatchDigit,
        _ => Token::BinaryShift,
    }
}

fn mixed(code: i32) -> Token {
    const CTRL: [char; 26] = [
        '\u{1}', '\u{2}', '\u{3}', '\u{4}', '\u{5}', '\u{6}', '\u{7}', '\u{8}', '\t', '\n', '\u{b}', '\u{c}', '\r',
        '\u{1b}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}', '@', '\\', '^', '_', '`', '|', '~', '\u{7f}',
    ];
    match code {
        0 => Token::ShiftPunct,
        1 => Token::Char(' '),
        2..=27 => Token::Char(CTRL[(code - 2) as usize]),
        28 => Token::LatchLower,
        29 => Token::LatchUpper,
        30 => Token::LatchPunct,
        _ => Token::BinaryShift,
    }
}

fn digit(code: i32) -> Token {
    match code {
        0 => Token::ShiftPunct,
        1 => Token::Char(' '),
        2..=11 => Token::Char((b'0' + (code - 2) as u8) as char),
        12 => Token::Char(','),
        13 => Token::Char('.'),
        14 => Token::LatchUpper,
        _ => Token::ShiftUpper,
    }
}

fn punct(code: i32) -> Token {
    match code {
        0 => Token::Flag,
        1 => Token::Char('\r'),
        2 => Token::Chars('\r', '\n'),
        3 => Token::Chars('.', ' '),
        4 => Token::Chars(',', ' '),
        5 => Token::Chars(':', ' '),
        6 => Token::Char('!'),
        7 => Token::Char('"'),
        8 => Token::Char('#'),
        9 => Token::Char('$'),
        10 => Token::Char('%'),
        11 => Token::Char('&'),
        12 => Token::Char('\''),
        13 => Token::Char('('),
        14 => Token::Char(')'),
        15 => Token::Char('*'),
        16 => Token::Char('+'),
        17 => Token::Char(','),
        18 => Token::Char('-'),
        19 => Token::Char('.'),
        20 => Token::Char('/'),
        21 => Token::Char(':'),
        22 => Token::Char(';'),
        23 => Token::Char('<'),
        24 => Token::Char('='),
        25 => Token::Char('>'),
        26 => Token::Char('?'),
        27 => Token::Char('['),
        28 => Token::Char(']'),
        29 => Token::Char('{'),
        30 => Token::Char('}'),
        _ => Token::LatchUpper,
    }
}

fn decode_char(table: Table, code: i32) -> Token {
    match table {
        Table::Upper => upper(code),
        Table::Lower => lower(code),
        Table::Mixed => mixed(code),
        Table::Digit => digit(code),
        Table::Punct => punct(code),
        Table::Binary => unreachable!("Binary is a shift state, not a character table"),
    }
}

fn read_code(bits: &BitArray, index: &mut usize, length: usize) -> Option<i32> {
    if *index + length > bits.size() {
        return None;
    }
    let mut value = 0i32;
    for i in *index..*index + length {
        value <<= 1;
        if bits.get(i) {
            value |= 1;
        }
    }
    *index += length;
    Some(value)
}

/// Decodes the corrected Aztec data bit stream into text. `latin1` bytes
/// (as Binary-mode segments and the 8-bit control ranges above all stay
/// within 0-255) are reassembled via Windows-1252, matching the original
/// decoder's behavior of appending each decoded byte as a raw character.
pub fn decode(corrected_bits: &BitArray) -> Result<DecoderResult> {
    let end_index = corrected_bits.size();
    let mut latch_table = Table::Upper;
    let mut shift_table = Table::Upper;
    let mut index = 0usize;
    let mut out_bytes: Vec<u8> = Vec::with_capacity(32);

    while index < end_index {
        if shift_table == Table::Binary {
            let Some(mut length) = read_code(corrected_bits, &mut index, 5) else { break };
            if length == 0 {
                let Some(extended) = read_code(corrected_bits, &mut index, 11) else { break };
                length = extended + 31;
            }
            for _ in 0..length {
                match read_code(corrected_bits, &mut index, 8) {
                    Some(code) => out_bytes.push(code as u8),
                    None => {
                        index = end_index;
                        break;
                    }
                }
            }
            shift_table = latch_table;
            continue;
        }

        let size = if shift_table == Table::Digit { 4 } else { 5 };
        let Some(code) = read_code(corrected_bits, &mut index, size) else { break };

        match decode_char(shift_table, code) {
            Token::Char(c) => {
                push_latin1(&mut out_bytes, c);
                shift_table = latch_table;
            }
            Token::Chars(a, b) => {
                push_latin1(&mut out_bytes, a);
                push_latin1(&mut out_bytes, b);
                shift_table = latch_table;
            }
            Token::Flag => return Err(Exceptions::format_error("Aztec FLG(n) escape is not supported")),
            Token::ShiftPunct => shift_table = Table::Punct,
            Token::ShiftUpper => shift_table = Table::Upper,
            Token::BinaryShift => shift_table = Table::Binary,
            Token::LatchUpper => {
                latch_table = Table::Upper;
                shift_table = Table::Upper;
            }
            Token::LatchLower => {
                latch_table = Table::Lower;
                shift_table = Table::Lower;
            }
            Token::LatchMixed => {
                latch_table = Table::Mixed;
                shift_table = Table::Mixed;
            }
            Token::LatchDigit => {
                latch_table = Table::Digit;
                shift_table = Table::Digit;
            }
            Token::LatchPunct => {
                latch_table = Table::Punct;
                shift_table = Table::Punct;
            }
        }
    }

    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&out_bytes);
    Ok(DecoderResult::new(out_bytes, text.into_owned()))
}

fn push_latin1(out: &mut Vec<u8>, c: char) {
    // Every table entry above is in the Latin-1 range, so this is exact.
    out.push(c as u32 as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_from(str_bits: &str) -> BitArray {
        let mut arr = BitArray::new();
        for c in str_bits.chars() {
            arr.append_bit(c == '1');
        }
        arr
    }

    #[test]
    fn decodes_plain_upper_case_word() {
        // 'A' = code 2 (00010), 'B' = code 3 (00011), terminate early.
        let bits = bits_from("0001000011");
        let result = decode(&bits).unwrap();
        assert_eq!(result.text(), "AB");
    }

    #[test]
    fn empty_stream_decodes_to_empty_text() {
        let bits = BitArray::new();
        let result = decode(&bits).unwrap();
        assert_eq!(result.text(), "");
    }
}
