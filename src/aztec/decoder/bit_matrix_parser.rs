//! Reads an Aztec symbol's sampled module grid into the raw codeword bit
//! stream, then Reed-Solomon-corrects and bit-unstuffs it into the data bit
//! stream `decoded_bit_stream_parser` consumes (spec §4.8, §4.9).
//!
//! Aztec codewords are laid out in concentric square rings around the
//! bullseye rather than QR's zigzag columns: each layer contributes a fixed
//! number of bits along its left/bottom/right/top edges, read out
//! corner-first. Full-size (non-compact) symbols also thread a dashed
//! reference grid line through the data region every 16 modules, which must
//! be skipped before the ring walk above can treat the grid as contiguous.

use crate::common::bit_array::BitArray;
use crate::common::bit_matrix::BitMatrix;
use crate::common::reedsolomon::generic_gf::{AZTEC_DATA_10, AZTEC_DATA_12, AZTEC_DATA_6, AZTEC_DATA_8};
use crate::common::reedsolomon::{GenericGF, ReedSolomonDecoder};
use crate::error::{Exceptions, Result};

fn total_bits_in_layer(layers: u32, compact: bool) -> usize {
    (((if compact { 88 } else { 112 }) + 16 * layers) * layers) as usize
}

/// Builds the index map from a layer-relative coordinate (ignoring
/// reference grid lines) to the real matrix coordinate. Compact symbols
/// have no reference grid, so the map is the identity.
fn alignment_map(base_matrix_size: u32, compact: bool) -> Vec<u32> {
    let mut map = vec![0u32; base_matrix_size as usize];
    if compact {
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = i as u32;
        }
        return map;
    }

    let matrix_size = base_matrix_size + 1 + 2 * ((base_matrix_size / 2 - 1) / 15);
    let orig_center = (base_matrix_size / 2) as i32;
    let center = (matrix_size / 2) as i32;
    for i in 0..orig_center {
        let new_offset = i + i / 15;
        map[(orig_center - i - 1) as usize] = (center - new_offset - 1) as u32;
        map[(orig_center + i) as usize] = (center + new_offset + 1) as u32;
    }
    map
}

/// Walks every layer's ring, corner-first, reading two bits per column/row
/// step along each of its four edges.
fn extract_bits(matrix: &BitMatrix, compact: bool, nb_layers: u32) -> Result<BitArray> {
    let base_matrix_size = if compact { 11 + nb_layers * 4 } else { 14 + nb_layers * 4 };
    let map = alignment_map(base_matrix_size, compact);

    let mut raw_bits = BitArray::with_size(total_bits_in_layer(nb_layers, compact));
    let mut row_offset = 0usize;

    for layer in 0..nb_layers {
        let row_size = ((nb_layers - layer) * 4 + if compact { 9 } else { 12 }) as usize;
        let low = (layer * 2) as usize;
        let high = base_matrix_size as usize - 1 - low;

        for j in 0..row_size {
            let column_offset = j * 2;
            for k in 0..2usize {
                let left = matrix.get(map[low + k], map[low + column_offset])?;
                if left {
                    raw_bits.set(row_offset + j * 2 + k);
                }
                let bottom = matrix.get(map[low + column_offset], map[high - k])?;
                if bottom {
                    raw_bits.set(row_offset + row_size * 2 + j * 2 + k);
                }
                let right = matrix.get(map[high - k], map[high - column_offset])?;
                if right {
                    raw_bits.set(row_offset + row_size * 4 + j * 2 + k);
                }
                let top = matrix.get(map[high - column_offset], map[low + k])?;
                if top {
                    raw_bits.set(row_offset + row_size * 6 + j * 2 + k);
                }
            }
        }
        row_offset += row_size * 8;
    }
    Ok(raw_bits)
}

fn read_code(bits: &BitArray, start: usize, length: usize) -> i32 {
    let mut res = 0i32;
    for i in start..start + length {
        res <<= 1;
        if bits.get(i) {
            res |= 1;
        }
    }
    res
}

fn field_for_codeword_size(size: usize) -> &'static GenericGF {
    match size {
        6 => &AZTEC_DATA_6,
        8 => &AZTEC_DATA_8,
        10 => &AZTEC_DATA_10,
        _ => &AZTEC_DATA_12,
    }
}

/// Reed-Solomon-corrects the raw codewords, then undoes the bit-stuffing
/// rule that forbids an all-zero or all-one codeword from appearing in the
/// data stream: a codeword of `1` (or of `mask - 1`) signals that its last
/// bit was stuffed in only to break the run, and the real payload is the
/// codeword's top `codeword_size - 1` bits.
fn correct_bits(raw_bits: &BitArray, nb_layers: u32, nb_data_blocks: u32) -> Result<BitArray> {
    let codeword_size = match nb_layers {
        0..=2 => 6,
        3..=8 => 8,
        9..=22 => 10,
        _ => 12,
    };

    let num_data_codewords = nb_data_blocks as usize;
    let num_codewords = raw_bits.size() / codeword_size;
    if num_codewords < num_data_codewords {
        return Err(Exceptions::format_error("not enough Aztec codewords for the declared data block count"));
    }
    let mut offset = raw_bits.size() % codeword_size;

    let mut data_words = vec![0i32; num_codewords];
    for word in data_words.iter_mut() {
        *word = read_code(raw_bits, offset, codeword_size);
        offset += codeword_size;
    }

    let field = field_for_codeword_size(codeword_size);
    let rs_decoder = ReedSolomonDecoder::new(field);
    rs_decoder.decode(&mut data_words, num_codewords - num_data_codewords)?;

    let mask = (1i32 << codeword_size) - 1;
    let mut corrected_bits = BitArray::new();
    for &raw_word in &data_words[..num_data_codewords] {
        let data_word = if codeword_size == 6 { raw_word & 0x1F } else { raw_word };
        if data_word == 0 || data_word == mask {
            return Err(Exceptions::format_error("Aztec bit-stuffing invariant violated"));
        } else if data_word == 1 || data_word == mask - 1 {
            corrected_bits.append_bits(data_word as u32 >> 1, codeword_size - 1);
        } else {
            corrected_bits.append_bits(data_word as u32, codeword_size);
        }
    }
    Ok(corrected_bits)
}

/// Extracts, Reed-Solomon-corrects, and bit-unstuffs an Aztec symbol's
/// sampled grid into its data bit stream.
pub fn read_data_bits(matrix: &BitMatrix, compact: bool, nb_layers: u32, nb_data_blocks: u32) -> Result<BitArray> {
    let raw_bits = extract_bits(matrix, compact, nb_layers)?;
    correct_bits(&raw_bits, nb_layers, nb_data_blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_bits_matches_compact_layer_one() {
        assert_eq!(total_bits_in_layer(1, true), 104);
    }

    #[test]
    fn alignment_map_is_identity_for_compact() {
        let map = alignment_map(11 + 4, true);
        assert_eq!(map, (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn read_code_is_msb_first() {
        let mut bits = BitArray::with_size(8);
        bits.set(0);
        bits.set(7);
        assert_eq!(read_code(&bits, 0, 8), 0b1000_0001);
    }
}
