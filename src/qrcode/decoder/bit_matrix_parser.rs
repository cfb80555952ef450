//! Reads format information, version information, and the raw codeword
//! bytes out of a sampled QR Code module grid (spec §4.7, ISO/IEC 18004
//! §8, Annex D).

use crate::common::bit_matrix::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::qrcode::decoder::data_mask::DataMask;
use crate::qrcode::decoder::format_information::FormatInformation;
use crate::qrcode::decoder::version::{get_version_for_number, Version};

const VERSION_DECODE_TABLE: [u32; 34] = [
    0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762, 0x0D847, 0x0E60D, 0x0F928, 0x10B78, 0x1145D, 0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9,
    0x177EC, 0x18EC4, 0x191E1, 0x1AFAB, 0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75, 0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F, 0x24B0B, 0x2542E, 0x26A64,
    0x27541, 0x28C69,
];

pub struct BitMatrixParser {
    bit_matrix: BitMatrix,
    parsed_version: Option<&'static Version>,
    parsed_format_info: Option<FormatInformation>,
    mirrored: bool,
}

impl BitMatrixParser {
    pub fn new(bit_matrix: BitMatrix) -> Result<Self> {
        let dimension = bit_matrix.height();
        if dimension < 21 || dimension & 0x03 != 1 {
            return Err(Exceptions::format_error("QR module grid has an invalid dimension"));
        }
        Ok(Self { bit_matrix, parsed_version: None, parsed_format_info: None, mirrored: false })
    }

    /// Whether [`Self::read_format_information`] had to fall back to the
    /// mirrored retry path to make sense of this grid.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Format information is written twice, redundantly, around the top-left
    /// finder pattern. Tries the grid as given, then mirrored across its
    /// diagonal, since some generators emit a mirrored symbol.
    pub fn read_format_information(&mut self) -> Result<FormatInformation> {
        if let Some(info) = self.parsed_format_info {
            return Ok(info);
        }

        let mut format_info_bits1 = 0u32;
        for x in 0..6 {
            format_info_bits1 = self.copy_bit(x, 8, format_info_bits1);
        }
        format_info_bits1 = self.copy_bit(7, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 7, format_info_bits1);
        for y in (0..=5).rev() {
            format_info_bits1 = self.copy_bit(8, y, format_info_bits1);
        }

        let dimension = self.bit_matrix.height();
        let mut format_info_bits2 = 0u32;
        for y in (dimension - 7..dimension).rev() {
            format_info_bits2 = self.copy_bit(8, y, format_info_bits2);
        }
        for x in dimension - 8..dimension {
            format_info_bits2 = self.copy_bit(x, 8, format_info_bits2);
        }

        let info = FormatInformation::decode_format_information(format_info_bits1, format_info_bits2);
        let info = match info {
            Some(info) => info,
            None => self.try_mirrored_format_information()?,
        };
        self.parsed_format_info = Some(info);
        Ok(info)
    }

    fn try_mirrored_format_information(&mut self) -> Result<FormatInformation> {
        log::warn!("qrcode: format information unreadable, retrying against the mirrored grid");
        self.mirror()?;

        let mut format_info_bits1 = 0u32;
        for x in 0..6 {
            format_info_bits1 = self.copy_bit(x, 8, format_info_bits1);
        }
        format_info_bits1 = self.copy_bit(7, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 7, format_info_bits1);
        for y in (0..=5).rev() {
            format_info_bits1 = self.copy_bit(8, y, format_info_bits1);
        }

        FormatInformation::decode_format_information(format_info_bits1, format_info_bits1)
            .ok_or_else(|| Exceptions::format_error("format information unreadable"))
    }

    pub fn read_version(&mut self) -> Result<&'static Version> {
        if let Some(version) = self.parsed_version {
            return Ok(version);
        }

        let dimension = self.bit_matrix.height();
        let provisional = (dimension - 17) / 4;
        if provisional <= 6 {
            let version = get_version_for_number(provisional)?;
            self.parsed_version = Some(version);
            return Ok(version);
        }

        let mut version_bits = 0u32;
        for y in (0..6).rev() {
            for x in (dimension - 11..dimension - 8).rev() {
                version_bits = self.copy_bit(x, y, version_bits);
            }
        }

        if let Some(version) = Self::decode_version_information(version_bits) {
            if version.dimension() == dimension {
                self.parsed_version = Some(version);
                return Ok(version);
            }
        }

        let mut version_bits2 = 0u32;
        for x in (0..6).rev() {
            for y in (dimension - 11..dimension - 8).rev() {
                version_bits2 = self.copy_bit(x, y, version_bits2);
            }
        }

        if let Some(version) = Self::decode_version_information(version_bits2) {
            if version.dimension() == dimension {
                self.parsed_version = Some(version);
                return Ok(version);
            }
        }

        Err(Exceptions::format_error("version information unreadable"))
    }

    fn decode_version_information(version_bits: u32) -> Option<&'static Version> {
        let mut best_difference = u32::MAX;
        let mut best_version = 0;
        for (i, &target) in VERSION_DECODE_TABLE.iter().enumerate() {
            if version_bits == target {
                return get_version_for_number(i as u32 + 7).ok();
            }
            let bits_differing = (version_bits ^ target).count_ones();
            if bits_differing < best_difference {
                best_difference = bits_differing;
                best_version = i as u32 + 7;
            }
        }
        (best_difference <= 3).then(|| get_version_for_number(best_version).ok()).flatten()
    }

    fn copy_bit(&self, x: u32, y: u32, result: u32) -> u32 {
        let bit = self.bit_matrix.get_or_false(x, y);
        (result << 1) | bit as u32
    }

    /// Reads the raw data + error-correction codewords out of the grid in
    /// the zigzag, bottom-to-top-then-top-to-bottom column-pair order the
    /// format mandates, skipping the function patterns and undoing the data
    /// mask as it goes.
    pub fn read_codewords(&mut self) -> Result<Vec<u8>> {
        let format_info = self.read_format_information()?;
        let version = self.read_version()?;

        let data_mask = DataMask::for_reference(format_info.data_mask()).ok_or_else(|| Exceptions::format_error("invalid data mask reference"))?;
        let dimension = self.bit_matrix.height();

        let function_pattern = version.build_function_pattern()?;

        let mut result = vec![0u8; version.total_codewords() as usize];
        let mut result_offset = 0usize;
        let mut current_byte = 0u8;
        let mut bits_read = 0u32;
        let mut reading_up = true;

        let mut x = dimension as i32 - 1;
        while x > 0 {
            if x == 6 {
                x -= 1;
            }
            for count in 0..dimension {
                let y = if reading_up { dimension - 1 - count } else { count };
                for col in 0..2 {
                    let xx = (x - col) as u32;
                    if function_pattern.get_or_false(xx, y) {
                        continue;
                    }
                    let mut bit = self.bit_matrix.get_or_false(xx, y);
                    if data_mask.is_masked(y, xx) {
                        bit = !bit;
                    }
                    current_byte = (current_byte << 1) | bit as u8;
                    bits_read += 1;
                    if bits_read == 8 {
                        if result_offset >= result.len() {
                            return Err(Exceptions::format_error("read more codewords than this version has"));
                        }
                        result[result_offset] = current_byte;
                        result_offset += 1;
                        bits_read = 0;
                        current_byte = 0;
                    }
                }
            }
            reading_up = !reading_up;
            x -= 2;
        }

        if result_offset != version.total_codewords() as usize {
            return Err(Exceptions::format_error("did not read the expected number of codewords"));
        }

        Ok(result)
    }

    /// Physically transposes the sampled grid in place so every later read
    /// — format info, version info, and codewords alike — sees the mirrored
    /// layout consistently, rather than special-casing each read site.
    fn mirror(&mut self) -> Result<()> {
        self.bit_matrix.transpose().map_err(|_| Exceptions::format_error("cannot mirror a non-square grid"))?;
        self.mirrored = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_dimension() {
        let bm = BitMatrix::new(20, 20).unwrap();
        assert!(BitMatrixParser::new(bm).is_err());
    }

    #[test]
    fn version_1_has_no_explicit_version_block() {
        let bm = BitMatrix::new(21, 21).unwrap();
        let mut parser = BitMatrixParser::new(bm).unwrap();
        let version = parser.read_version().unwrap();
        assert_eq!(version.version_number(), 1);
    }
}
