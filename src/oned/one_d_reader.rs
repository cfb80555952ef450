//! Shared row-scan loop every 1D reader runs underneath.
//!
//! A concrete reader only implements [`OneDReader::decode_row`]; this module
//! walks a handful of horizontal scanlines out from the image's vertical
//! center, alternating above and below, handing each one to the reader in
//! turn and trying it again reversed before moving to the next line.

use crate::binary_bitmap::BinaryBitmap;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::result::RXingResult;

pub trait OneDReader: std::fmt::Debug {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, hints: &DecodeHints) -> Result<RXingResult>;

    fn reset(&mut self) {}
}

/// Runs `reader` over `image`, the way [`crate::reader::Reader`] implementations
/// for the 1D family all do.
pub fn decode(reader: &mut dyn OneDReader, image: &mut BinaryBitmap, hints: &DecodeHints) -> Result<RXingResult> {
    let height = image.height();
    if height == 0 {
        return Err(Exceptions::not_found_bare());
    }

    let try_harder = hints.try_harder;
    let middle = height / 2;
    let row_step = (height >> (if try_harder { 8 } else { 5 })).max(1);
    let max_lines = if try_harder { height } else { 15.min(height) };

    for x in 0..max_lines {
        let rows_above_or_below = (x + 1) >> 1;
        let is_above = x & 0x01 == 0;
        let offset = row_step * rows_above_or_below;
        let row_number = if is_above { middle as i64 + offset as i64 } else { middle as i64 - offset as i64 };
        if row_number < 0 || row_number >= height as i64 {
            break;
        }
        let row_number = row_number as u32;

        let row = match image.black_row(row_number) {
            Ok(row) => row,
            Err(_) => continue,
        };

        if let Ok(result) = reader.decode_row(row_number, &row, hints) {
            return Ok(result);
        }

        if try_harder {
            let mut reversed = row.clone();
            reversed.reverse();
            if let Ok(result) = reader.decode_row(row_number, &reversed, hints) {
                return Ok(result);
            }
        }
    }

    Err(Exceptions::not_found_bare())
}
