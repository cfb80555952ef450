//! Tries every UPC/EAN variant the caller asked for against one row, the
//! way `MultiFormatReader` tries every symbology against one image.
//! EAN-13 is tried first since a UPC-A payload is an EAN-13 payload with
//! a leading zero; [`UpcAReader`] only has to strip it.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::ean13_reader::Ean13Reader;
use crate::oned::ean8_reader::Ean8Reader;
use crate::oned::one_d_reader::OneDReader;
use crate::oned::upc_a_reader::UpcAReader;
use crate::oned::upc_e_reader::UpcEReader;
use crate::result::RXingResult;

#[derive(Debug)]
pub struct MultiFormatUpcEanReader {
    ean13: Ean13Reader,
    upc_a: UpcAReader,
    ean8: Ean8Reader,
    upc_e: UpcEReader,
    wants: Vec<BarcodeFormat>,
}

impl MultiFormatUpcEanReader {
    pub fn new(hints: &DecodeHints) -> Self {
        let mut wants = Vec::new();
        for format in [BarcodeFormat::Ean13, BarcodeFormat::UpcA, BarcodeFormat::Ean8, BarcodeFormat::UpcE] {
            if hints.wants(format) {
                wants.push(format);
            }
        }
        Self {
            ean13: Ean13Reader::new(),
            upc_a: UpcAReader::new(),
            ean8: Ean8Reader::new(),
            upc_e: UpcEReader::new(),
            wants,
        }
    }
}

impl OneDReader for MultiFormatUpcEanReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, hints: &DecodeHints) -> Result<RXingResult> {
        for format in &self.wants {
            let attempt = match format {
                BarcodeFormat::Ean13 => self.ean13.decode_row(row_number, row, hints),
                BarcodeFormat::UpcA => self.upc_a.decode_row(row_number, row, hints),
                BarcodeFormat::Ean8 => self.ean8.decode_row(row_number, row, hints),
                BarcodeFormat::UpcE => self.upc_e.decode_row(row_number, row, hints),
                _ => unreachable!("wants is built from the UPC/EAN family only"),
            };
            if let Ok(result) = attempt {
                return Ok(if *format == BarcodeFormat::Ean13 {
                    maybe_promote_to_upc_a(result, &self.wants)
                } else {
                    result
                });
            }
        }
        Err(Exceptions::not_found_bare())
    }
}

/// An EAN-13 payload with an implicit leading zero is also a valid UPC-A
/// payload; re-report it as UPC-A when the caller asked for that format too
/// (spec §4.11, scenario 5), leaving every other EAN-13 result untouched
/// (scenario 4).
fn maybe_promote_to_upc_a(result: RXingResult, wants: &[BarcodeFormat]) -> RXingResult {
    if !wants.contains(&BarcodeFormat::UpcA) || !result.text().starts_with('0') {
        return result;
    }
    let stripped = result.text()[1..].to_string();
    let raw_bytes = stripped.clone().into_bytes();
    let points = result.points().to_vec();
    RXingResult::new(stripped, raw_bytes, points, BarcodeFormat::UpcA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ean13_with_leading_zero_is_promoted_to_upc_a_when_requested() {
        let ean13 = RXingResult::new(
            "0012345678905".to_string(),
            b"0012345678905".to_vec(),
            Vec::new(),
            BarcodeFormat::Ean13,
        );
        let promoted = maybe_promote_to_upc_a(ean13, &[BarcodeFormat::Ean13, BarcodeFormat::UpcA]);
        assert_eq!(promoted.format(), BarcodeFormat::UpcA);
        assert_eq!(promoted.text(), "012345678905");
    }

    #[test]
    fn ean13_with_leading_zero_stays_ean13_without_upc_a_in_hints() {
        let ean13 = RXingResult::new(
            "0012345678905".to_string(),
            b"0012345678905".to_vec(),
            Vec::new(),
            BarcodeFormat::Ean13,
        );
        let unchanged = maybe_promote_to_upc_a(ean13, &[BarcodeFormat::Ean13]);
        assert_eq!(unchanged.format(), BarcodeFormat::Ean13);
        assert_eq!(unchanged.text(), "0012345678905");
    }

    #[test]
    fn ean13_without_leading_zero_is_unaffected_by_upc_a_hint() {
        let ean13 = RXingResult::new(
            "5901234123457".to_string(),
            b"5901234123457".to_vec(),
            Vec::new(),
            BarcodeFormat::Ean13,
        );
        let unchanged = maybe_promote_to_upc_a(ean13, &[BarcodeFormat::Ean13, BarcodeFormat::UpcA]);
        assert_eq!(unchanged.format(), BarcodeFormat::Ean13);
        assert_eq!(unchanged.text(), "5901234123457");
    }
}
