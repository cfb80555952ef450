//! Extracts a Data Matrix symbol's raw codeword bytes from its sampled
//! module grid (spec §4.7, ISO/IEC 16022 §5.8 codeword placement).
//!
//! Grounded on `original_source/cpp/core/src/zxing/datamatrix/decoder/
//! BitMatrixParser.cpp`: large symbols are tiled into several data regions
//! separated by one-module alignment/clock-track borders, so codewords are
//! first read off the fully sampled symbol into a single "mapping matrix"
//! with those borders stripped out (`extract_data_region`), and only then
//! walked by the diagonal "utah" placement pattern that ISO/IEC 16022
//! defines, with four corner positions handled as special cases because the
//! zigzag doesn't tile evenly against every symbol's edges.

use crate::common::BitMatrix;
use crate::datamatrix::decoder::version::{version_for_dimensions, Version};
use crate::error::{Exceptions, Result};

pub struct BitMatrixParser {
    mapping: BitMatrix,
    read_mapping: BitMatrix,
    version: &'static Version,
}

impl BitMatrixParser {
    pub fn new(bits: &BitMatrix) -> Result<Self> {
        let version = version_for_dimensions(bits.height(), bits.width())?;
        let mapping = extract_data_region(bits, version)?;
        let read_mapping = BitMatrix::new(mapping.width(), mapping.height())?;
        Ok(Self { mapping, read_mapping, version })
    }

    pub fn version(&self) -> &'static Version {
        self.version
    }

    /// Reads every codeword byte off the mapping matrix via the utah
    /// zigzag, handling the four edge cases where it runs off the grid.
    pub fn read_codewords(&mut self) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(self.version.total_codewords() as usize);

        let num_rows = self.mapping.height() as i32;
        let num_cols = self.mapping.width() as i32;

        let mut row = 4i32;
        let mut column = 0i32;
        let mut corner_read = [false; 4];

        loop {
            if row == num_rows && column == 0 && !corner_read[0] {
                result.push(self.read_corner1(num_rows, num_cols)?);
                row -= 2;
                column += 2;
                corner_read[0] = true;
            } else if row == num_rows - 2 && column == 0 && num_cols & 3 != 0 && !corner_read[1] {
                result.push(self.read_corner2(num_rows, num_cols)?);
                row -= 2;
                column += 4;
                corner_read[1] = true;
            } else if row == num_rows + 4 && column == 2 && num_cols & 7 == 0 && !corner_read[2] {
                result.push(self.read_corner3(num_rows, num_cols)?);
                row -= 2;
                column += 4;
                corner_read[2] = true;
            } else if row == num_rows - 2 && column == 0 && num_cols & 7 == 4 && !corner_read[3] {
                result.push(self.read_corner4(num_rows, num_cols)?);
                row -= 2;
                column += 4;
                corner_read[3] = true;
            } else {
                loop {
                    if row < num_rows && column >= 0 && !self.read_mapping.get(column as u32, row as u32)? {
                        result.push(self.read_utah(row, column, num_rows, num_cols)?);
                    }
                    row -= 2;
                    column += 2;
                    if row < 0 || column >= num_cols {
                        break;
                    }
                }
                row += 1;
                column += 3;

                loop {
                    if row >= 0 && column < num_cols && !self.read_mapping.get(column as u32, row as u32)? {
                        result.push(self.read_utah(row, column, num_rows, num_cols)?);
                    }
                    row += 2;
                    column -= 2;
                    if row >= num_rows || column < 0 {
                        break;
                    }
                }
                row += 3;
                column += 1;
            }
            if row >= num_rows && column >= num_cols {
                break;
            }
        }

        if result.len() as u32 != self.version.total_codewords() {
            return Err(Exceptions::format_error("did not read the expected number of codewords"));
        }
        Ok(result)
    }

    fn read_module(&self, row: i32, column: i32, num_rows: i32, num_cols: i32) -> Result<bool> {
        let mut row = row;
        let mut column = column;
        if row < 0 {
            row += num_rows;
            column += 4 - ((num_rows + 4) & 7);
        }
        if column < 0 {
            column += num_cols;
            row += 4 - ((num_cols + 4) & 7);
        }
        self.mapping.get(column as u32, row as u32)
    }

    fn read_utah(&mut self, row: i32, column: i32, num_rows: i32, num_cols: i32) -> Result<u8> {
        self.read_mapping.set(column as u32, row as u32)?;
        let mut value = 0u8;
        if self.read_module(row - 2, column - 2, num_rows, num_cols)? {
            value |= 1 << 7;
        }
        if self.read_module(row - 2, column - 1, num_rows, num_cols)? {
            value |= 1 << 6;
        }
        if self.read_module(row - 1, column - 2, num_rows, num_cols)? {
            value |= 1 << 5;
        }
        if self.read_module(row - 1, column - 1, num_rows, num_cols)? {
            value |= 1 << 4;
        }
        if self.read_module(row - 1, column, num_rows, num_cols)? {
            value |= 1 << 3;
        }
        if self.read_module(row, column - 2, num_rows, num_cols)? {
            value |= 1 << 2;
        }
        if self.read_module(row, column - 1, num_rows, num_cols)? {
            value |= 1 << 1;
        }
        if self.read_module(row, column, num_rows, num_cols)? {
            value |= 1;
        }
        Ok(value)
    }

    fn read_corner1(&mut self, num_rows: i32, num_cols: i32) -> Result<u8> {
        let mut value = 0u8;
        if self.read_module(num_rows - 1, 0, num_rows, num_cols)? {
            value |= 1 << 7;
        }
        if self.read_module(num_rows - 1, 1, num_rows, num_cols)? {
            value |= 1 << 6;
        }
        if self.read_module(num_rows - 1, 2, num_rows, num_cols)? {
            value |= 1 << 5;
        }
        if self.read_module(0, num_cols - 2, num_rows, num_cols)? {
            value |= 1 << 4;
        }
        if self.read_module(0, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 3;
        }
        if self.read_module(1, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 2;
        }
        if self.read_module(2, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 1;
        }
        if self.read_module(3, num_cols - 1, num_rows, num_cols)? {
            value |= 1;
        }
        Ok(value)
    }

    fn read_corner2(&mut self, num_rows: i32, num_cols: i32) -> Result<u8> {
        let mut value = 0u8;
        if self.read_module(num_rows - 3, 0, num_rows, num_cols)? {
            value |= 1 << 7;
        }
        if self.read_module(num_rows - 2, 0, num_rows, num_cols)? {
            value |= 1 << 6;
        }
        if self.read_module(num_rows - 1, 0, num_rows, num_cols)? {
            value |= 1 << 5;
        }
        if self.read_module(0, num_cols - 4, num_rows, num_cols)? {
            value |= 1 << 4;
        }
        if self.read_module(0, num_cols - 3, num_rows, num_cols)? {
            value |= 1 << 3;
        }
        if self.read_module(0, num_cols - 2, num_rows, num_cols)? {
            value |= 1 << 2;
        }
        if self.read_module(0, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 1;
        }
        if self.read_module(1, num_cols - 1, num_rows, num_cols)? {
            value |= 1;
        }
        Ok(value)
    }

    fn read_corner3(&mut self, num_rows: i32, num_cols: i32) -> Result<u8> {
        let mut value = 0u8;
        if self.read_module(num_rows - 1, 0, num_rows, num_cols)? {
            value |= 1 << 7;
        }
        if self.read_module(num_rows - 1, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 6;
        }
        if self.read_module(0, num_cols - 3, num_rows, num_cols)? {
            value |= 1 << 5;
        }
        if self.read_module(0, num_cols - 2, num_rows, num_cols)? {
            value |= 1 << 4;
        }
        if self.read_module(0, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 3;
        }
        if self.read_module(1, num_cols - 3, num_rows, num_cols)? {
            value |= 1 << 2;
        }
        if self.read_module(1, num_cols - 2, num_rows, num_cols)? {
            value |= 1 << 1;
        }
        if self.read_module(1, num_cols - 1, num_rows, num_cols)? {
            value |= 1;
        }
        Ok(value)
    }

    fn read_corner4(&mut self, num_rows: i32, num_cols: i32) -> Result<u8> {
        let mut value = 0u8;
        if self.read_module(num_rows - 3, 0, num_rows, num_cols)? {
            value |= 1 << 7;
        }
        if self.read_module(num_rows - 2, 0, num_rows, num_cols)? {
            value |= 1 << 6;
        }
        if self.read_module(num_rows - 1, 0, num_rows, num_cols)? {
            value |= 1 << 5;
        }
        if self.read_module(0, num_cols - 2, num_rows, num_cols)? {
            value |= 1 << 4;
        }
        if self.read_module(0, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 3;
        }
        if self.read_module(1, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 2;
        }
        if self.read_module(2, num_cols - 1, num_rows, num_cols)? {
            value |= 1 << 1;
        }
        if self.read_module(3, num_cols - 1, num_rows, num_cols)? {
            value |= 1;
        }
        Ok(value)
    }
}

/// Strips the one-module alignment/clock-track border around each data
/// region tile and reassembles the remaining bits into one contiguous
/// matrix the utah pattern can walk without special-casing region seams.
fn extract_data_region(bits: &BitMatrix, version: &Version) -> Result<BitMatrix> {
    let symbol_size_rows = version.symbol_size_rows;
    let symbol_size_cols = version.symbol_size_columns;

    if bits.height() != symbol_size_rows {
        return Err(Exceptions::format_error("bit matrix row count does not match version"));
    }
    if bits.width() != symbol_size_cols {
        return Err(Exceptions::format_error("bit matrix column count does not match version"));
    }

    let data_region_size_rows = version.data_region_size_rows;
    let data_region_size_cols = version.data_region_size_columns;
    let num_data_regions_row = version.num_data_regions_row();
    let num_data_regions_col = version.num_data_regions_column();

    let size_data_region_rows = num_data_regions_row * data_region_size_rows;
    let size_data_region_cols = num_data_regions_col * data_region_size_cols;

    let mut out = BitMatrix::new(size_data_region_cols, size_data_region_rows)?;
    for region_row in 0..num_data_regions_row {
        let data_region_row_offset = region_row * data_region_size_rows;
        for region_col in 0..num_data_regions_col {
            let data_region_col_offset = region_col * data_region_size_cols;
            for r in 0..data_region_size_rows {
                let read_row = region_row * (data_region_size_rows + 2) + 1 + r;
                for c in 0..data_region_size_cols {
                    let read_col = region_col * (data_region_size_cols + 2) + 1 + c;
                    if bits.get(read_col, read_row)? {
                        out.set(data_region_col_offset + c, data_region_row_offset + r)?;
                    }
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_grid_of_the_wrong_size() {
        let bits = BitMatrix::new(9, 9).unwrap();
        assert!(BitMatrixParser::new(&bits).is_err());
    }

    #[test]
    fn reads_the_expected_codeword_count_for_version_one() {
        let bits = BitMatrix::new(10, 10).unwrap();
        let mut parser = BitMatrixParser::new(&bits).unwrap();
        let codewords = parser.read_codewords().unwrap();
        assert_eq!(codewords.len(), 8);
    }
}
