//! Turning a corrected codeword stream into text (spec §4.10).
//!
//! `codewords[0]` is the length descriptor (how many codewords, including
//! itself, carry data); everything from `codewords[1]` on is a stream of
//! compaction-mode latches interleaved with the data they govern: Text
//! Compaction (two characters packed per codeword via a sub-mode state
//! machine), Byte Compaction (six bytes packed base-900 into five
//! codewords, or a direct one-codeword-per-byte fallback), and Numeric
//! Compaction (up to fifteen codewords packed base-900 into a decimal
//! digit string).

use crate::common::decoder_result::DecoderResult;
use crate::error::{Exceptions, Result};

const TEXT_COMPACTION_MODE_LATCH: i32 = 900;
const BYTE_COMPACTION_MODE_LATCH: i32 = 901;
const NUMERIC_COMPACTION_MODE_LATCH: i32 = 902;
const BYTE_COMPACTION_MODE_LATCH_6: i32 = 924;
const BEGIN_MACRO_PDF417_CONTROL_BLOCK: i32 = 928;
const BEGIN_MACRO_PDF417_OPTIONAL_FIELD: i32 = 923;
const MACRO_PDF417_TERMINATOR: i32 = 922;
const MODE_SHIFT_TO_BYTE_COMPACTION_MODE: i32 = 913;
const MAX_NUMERIC_CODEWORDS: usize = 15;

const PL: i32 = 25;
const LL: i32 = 27;
const AS: i32 = 27;
const ML: i32 = 28;
const AL: i32 = 28;
const PS: i32 = 29;
const PAL: i32 = 29;

const PUNCT_CHARS: [char; 29] = [
    ';', '<', '>', '@', '[', '\\', ']', '_', '`', '~', '!', '\r', '\t', ',', ':', '\n', '-', '.',
    '$', '/', '"', '|', '*', '(', ')', '?', '{', '}', '\'',
];

const MIXED_CHARS: [char; 25] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '&', '\r', '\t', ',', ':', '#', '-', '.',
    '$', '/', '+', '%', '*', '=', '^',
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum SubMode {
    Alpha,
    Lower,
    Mixed,
    Punct,
    AlphaShift,
    PunctShift,
}

fn is_mode_change(code: i32) -> bool {
    matches!(
        code,
        TEXT_COMPACTION_MODE_LATCH
            | BYTE_COMPACTION_MODE_LATCH
            | NUMERIC_COMPACTION_MODE_LATCH
            | BYTE_COMPACTION_MODE_LATCH_6
            | BEGIN_MACRO_PDF417_CONTROL_BLOCK
            | BEGIN_MACRO_PDF417_OPTIONAL_FIELD
            | MACRO_PDF417_TERMINATOR
    )
}

/// Reads Text Compaction codewords (two sub-mode characters per codeword)
/// starting at `code_index` until a mode-change codeword is found, decodes
/// them through the ALPHA/LOWER/MIXED/PUNCT state machine, and appends the
/// result to `text`. Returns the index of the codeword that ended the run.
fn text_compaction(codewords: &[i32], mut code_index: usize, text: &mut String) -> usize {
    let mut values = Vec::new();
    let mut byte_shift_values: Vec<i32> = Vec::new();
    let length = codewords[0] as usize;

    let mut end = false;
    while code_index < length && !end {
        let code = codewords[code_index];
        code_index += 1;
        if code < TEXT_COMPACTION_MODE_LATCH {
            values.push(code / 30);
            values.push(code % 30);
            byte_shift_values.push(0);
            byte_shift_values.push(0);
        } else if code == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
            values.push(MODE_SHIFT_TO_BYTE_COMPACTION_MODE);
            let shifted = codewords[code_index];
            code_index += 1;
            byte_shift_values.push(shifted);
        } else {
            // TEXT/BYTE/NUMERIC latch or 924: push back, this run is over.
            code_index -= 1;
            end = true;
        }
    }

    decode_text_compaction(&values, &byte_shift_values, text);
    code_index
}

fn decode_text_compaction(values: &[i32], byte_shift_values: &[i32], text: &mut String) {
    let mut sub_mode = SubMode::Alpha;
    let mut prior_to_shift = SubMode::Alpha;

    for i in 0..values.len() {
        let sub_mode_ch = values[i];
        let mut ch: Option<char> = None;

        match sub_mode {
            SubMode::Alpha => {
                if sub_mode_ch < 26 {
                    ch = Some((b'A' + sub_mode_ch as u8) as char);
                } else if sub_mode_ch == 26 {
                    ch = Some(' ');
                } else if sub_mode_ch == LL {
                    sub_mode = SubMode::Lower;
                } else if sub_mode_ch == ML {
                    sub_mode = SubMode::Mixed;
                } else if sub_mode_ch == PS {
                    prior_to_shift = sub_mode;
                    sub_mode = SubMode::PunctShift;
                } else if sub_mode_ch == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
                    if let Some(b) = byte_shift_values[i].try_into().ok().map(|b: u8| b as char) {
                        ch = Some(b);
                    }
                }
            }
            SubMode::Lower => {
                if sub_mode_ch < 26 {
                    ch = Some((b'a' + sub_mode_ch as u8) as char);
                } else if sub_mode_ch == 26 {
                    ch = Some(' ');
                } else if sub_mode_ch == AS {
                    prior_to_shift = sub_mode;
                    sub_mode = SubMode::AlphaShift;
                } else if sub_mode_ch == ML {
                    sub_mode = SubMode::Mixed;
                } else if sub_mode_ch == PS {
                    prior_to_shift = sub_mode;
                    sub_mode = SubMode::PunctShift;
                } else if sub_mode_ch == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
                    if let Some(b) = byte_shift_values[i].try_into().ok().map(|b: u8| b as char) {
                        ch = Some(b);
                    }
                }
            }
            SubMode::Mixed => {
                if sub_mode_ch < PL {
                    ch = Some(MIXED_CHARS[sub_mode_ch as usize]);
                } else if sub_mode_ch == PL {
                    sub_mode = SubMode::Punct;
                } else if sub_mode_ch == 26 {
                    ch = Some(' ');
                } else if sub_mode_ch == LL {
                    sub_mode = SubMode::Lower;
                } else if sub_mode_ch == AL {
                    sub_mode = SubMode::Alpha;
                } else if sub_mode_ch == PS {
                    prior_to_shift = sub_mode;
                    sub_mode = SubMode::PunctShift;
                } else if sub_mode_ch == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
                    if let Some(b) = byte_shift_values[i].try_into().ok().map(|b: u8| b as char) {
                        ch = Some(b);
                    }
                }
            }
            SubMode::Punct => {
                if sub_mode_ch < PAL {
                    ch = Some(PUNCT_CHARS[sub_mode_ch as usize]);
                } else if sub_mode_ch == PAL {
                    sub_mode = SubMode::Alpha;
                } else if sub_mode_ch == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
                    if let Some(b) = byte_shift_values[i].try_into().ok().map(|b: u8| b as char) {
                        ch = Some(b);
                    }
                }
            }
            SubMode::AlphaShift => {
                sub_mode = prior_to_shift;
                if sub_mode_ch < 26 {
                    ch = Some((b'A' + sub_mode_ch as u8) as char);
                } else if sub_mode_ch == 26 {
                    ch = Some(' ');
                }
            }
            SubMode::PunctShift => {
                sub_mode = prior_to_shift;
                if sub_mode_ch < PAL {
                    ch = Some(PUNCT_CHARS[sub_mode_ch as usize]);
                } else if sub_mode_ch == PAL {
                    sub_mode = SubMode::Alpha;
                } else if sub_mode_ch == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
                    // A Punct-Shift right before a byte shift is padding
                    // (spec §5.4.2.4); the byte shift itself still emits a
                    // character, via the branch above falling through here.
                    if let Some(b) = byte_shift_values[i].try_into().ok().map(|b: u8| b as char) {
                        ch = Some(b);
                    }
                } else if sub_mode_ch == TEXT_COMPACTION_MODE_LATCH {
                    sub_mode = SubMode::Alpha;
                }
            }
        }

        if let Some(c) = ch {
            text.push(c);
        }
    }
}

/// Byte Compaction mode (spec §5.4.3): packs 6 bytes into 5 codewords in
/// base 900, with a one-byte-per-codeword fallback for a trailing partial
/// group. `mode` is `MODE_SHIFT_TO_BYTE_COMPACTION_MODE`,
/// `BYTE_COMPACTION_MODE_LATCH`, or `BYTE_COMPACTION_MODE_LATCH_6`.
fn byte_compaction(
    mode: i32,
    codewords: &[i32],
    mut code_index: usize,
    text: &mut String,
    raw_bytes: &mut Vec<u8>,
) -> usize {
    if mode == MODE_SHIFT_TO_BYTE_COMPACTION_MODE {
        let byte = codewords[code_index] as u8;
        text.push(byte as char);
        raw_bytes.push(byte);
        return code_index + 1;
    }

    let length = codewords[0] as usize;
    let six_aligned = mode == BYTE_COMPACTION_MODE_LATCH_6;

    let mut count = 0usize;
    let mut value: i64 = 0;
    let mut leftover = [0i32; 6];
    let mut end = false;

    while code_index < length && !end {
        let code = codewords[code_index];
        code_index += 1;
        if code < TEXT_COMPACTION_MODE_LATCH {
            if !six_aligned {
                leftover[count] = code;
            }
            count += 1;
            value = 900 * value + code as i64;
        } else if is_mode_change(code) {
            code_index -= 1;
            end = true;
        }

        if count % 5 == 0 && count > 0 {
            if !six_aligned && code_index < length {
                let next = codewords[code_index];
                if is_mode_change(next) || code_index == length {
                    break;
                }
            }
            let mut decoded = [0u8; 6];
            let mut v = value;
            for j in 0..6 {
                decoded[5 - j] = (v % 256) as u8;
                v /= 256;
            }
            for b in decoded {
                text.push(b as char);
                raw_bytes.push(b);
            }
            count = 0;
            value = 0;
        }
    }

    if !six_aligned {
        for &code in leftover.iter().take(count) {
            let b = code as u8;
            text.push(b as char);
            raw_bytes.push(b);
        }
    }

    code_index
}

/// Converts `count` base-900 codewords to a decimal digit string by
/// accumulating into a big-endian decimal digit buffer (this crate carries
/// no arbitrary-precision integer type, so the multiply-by-900-and-add
/// schoolbook step is done directly on decimal digits).
fn decode_base900_to_base10(codewords: &[i32]) -> Result<String> {
    let mut digits: Vec<u8> = vec![0];
    for &codeword in codewords {
        multiply_small(&mut digits, 900);
        add_small(&mut digits, codeword);
    }

    let s: String = digits.iter().map(|d| (b'0' + d) as char).collect();
    let s = s.trim_start_matches('0');
    let s = if s.is_empty() { "0" } else { s };
    if !s.starts_with('1') {
        return Err(Exceptions::format_error(
            "numeric compaction result does not begin with a 1 prefix digit",
        ));
    }
    Ok(s[1..].to_string())
}

fn multiply_small(digits: &mut Vec<u8>, factor: u32) {
    let mut carry: u32 = 0;
    for d in digits.iter_mut().rev() {
        let total = *d as u32 * factor + carry;
        *d = (total % 10) as u8;
        carry = total / 10;
    }
    while carry > 0 {
        digits.insert(0, (carry % 10) as u8);
        carry /= 10;
    }
}

fn add_small(digits: &mut Vec<u8>, addend: i32) {
    let mut carry = addend as u32;
    for d in digits.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let total = *d as u32 + carry % 10;
        carry /= 10;
        if total >= 10 {
            *d = (total - 10) as u8;
            carry += 1;
        } else {
            *d = total as u8;
        }
    }
    while carry > 0 {
        digits.insert(0, (carry % 10) as u8);
        carry /= 10;
    }
}

/// Numeric Compaction mode (spec §5.4.4): groups of up to 15 codewords,
/// each group independently base-900-to-base-10 decoded.
fn numeric_compaction(codewords: &[i32], mut code_index: usize, text: &mut String) -> Result<usize> {
    let length = codewords[0] as usize;
    let mut group: Vec<i32> = Vec::with_capacity(MAX_NUMERIC_CODEWORDS);
    let mut end = false;

    while code_index < length && !end {
        let code = codewords[code_index];
        code_index += 1;
        if code_index == length {
            end = true;
        }
        if code < TEXT_COMPACTION_MODE_LATCH {
            group.push(code);
        } else if is_mode_change(code) {
            code_index -= 1;
            end = true;
        }

        if group.len() % MAX_NUMERIC_CODEWORDS == 0 || code == NUMERIC_COMPACTION_MODE_LATCH || end {
            if !group.is_empty() {
                text.push_str(&decode_base900_to_base10(&group)?);
            }
            group.clear();
        }
    }
    Ok(code_index)
}

/// Decodes a PDF417 codeword stream (`codewords[0]` is the data length,
/// including itself) into text.
pub fn decode(codewords: &[i32]) -> Result<DecoderResult> {
    if codewords.is_empty() {
        return Err(Exceptions::format_error("empty PDF417 codeword stream"));
    }

    let mut text = String::new();
    let mut raw_bytes: Vec<u8> = Vec::new();
    let length = (codewords[0] as usize).min(codewords.len());

    let mut code_index = 1;
    while code_index < length {
        let code = codewords[code_index];
        code_index += 1;
        code_index = match code {
            TEXT_COMPACTION_MODE_LATCH => text_compaction(codewords, code_index, &mut text),
            BYTE_COMPACTION_MODE_LATCH => {
                byte_compaction(code, codewords, code_index, &mut text, &mut raw_bytes)
            }
            NUMERIC_COMPACTION_MODE_LATCH => numeric_compaction(codewords, code_index, &mut text)?,
            MODE_SHIFT_TO_BYTE_COMPACTION_MODE => {
                byte_compaction(code, codewords, code_index, &mut text, &mut raw_bytes)
            }
            BYTE_COMPACTION_MODE_LATCH_6 => {
                byte_compaction(code, codewords, code_index, &mut text, &mut raw_bytes)
            }
            BEGIN_MACRO_PDF417_CONTROL_BLOCK
            | BEGIN_MACRO_PDF417_OPTIONAL_FIELD
            | MACRO_PDF417_TERMINATOR => code_index,
            _ => {
                // No starting latch: default to Text Compaction, as real-world
                // encoders sometimes omit it.
                text_compaction(codewords, code_index - 1, &mut text)
            }
        };
    }

    if text.is_empty() && raw_bytes.is_empty() {
        return Err(Exceptions::format_error("PDF417 codeword stream decoded to no data"));
    }

    let mut result = DecoderResult::new(raw_bytes, text);
    if code_index >= length {
        result = result.with_num_bits(length * 8);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_uppercase_text() {
        // "AB" -> ALPHA values 0, 1 packed two-per-codeword: 0*30+1 = 1
        let codewords = vec![3, TEXT_COMPACTION_MODE_LATCH, 1];
        let result = decode(&codewords).unwrap();
        assert_eq!(result.text(), "AB");
    }

    #[test]
    fn decodes_byte_compaction_single_shift() {
        let codewords = vec![3, MODE_SHIFT_TO_BYTE_COMPACTION_MODE, 65];
        let result = decode(&codewords).unwrap();
        assert_eq!(result.text(), "A");
    }

    #[test]
    fn decode_base900_round_trips_a_small_number() {
        // "123" encoded with the mandatory leading-1 prefix digit is 1123.
        // 1123 in base 900 is [1, 223].
        let s = decode_base900_to_base10(&[1, 223]).unwrap();
        assert_eq!(s, "123");
    }

    #[test]
    fn rejects_empty_stream() {
        assert!(decode(&[]).is_err());
    }
}
