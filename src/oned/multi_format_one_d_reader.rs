//! Top-level `Reader` for the whole 1D family: runs
//! [`crate::oned::one_d_reader::decode`]'s row-scan loop over whichever
//! concrete readers `DecodeHints` asked for.

use crate::barcode_format::BarcodeFormat;
use crate::binary_bitmap::BinaryBitmap;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::codabar_reader::CodabarReader;
use crate::oned::code128_reader::Code128Reader;
use crate::oned::code39_reader::Code39Reader;
use crate::oned::code93_reader::Code93Reader;
use crate::oned::itf_reader::ItfReader;
use crate::oned::multi_format_upc_ean_reader::MultiFormatUpcEanReader;
use crate::oned::one_d_reader::{self, OneDReader};
use crate::oned::rss::Rss14Reader;
use crate::reader::Reader;
use crate::result::RXingResult;

#[derive(Debug)]
pub struct MultiFormatOneDReader {
    upc_ean: Option<MultiFormatUpcEanReader>,
    code39: Option<Code39Reader>,
    code93: Option<Code93Reader>,
    code128: Option<Code128Reader>,
    itf: Option<ItfReader>,
    codabar: Option<CodabarReader>,
    rss14: Option<Rss14Reader>,
}

impl MultiFormatOneDReader {
    pub fn new(hints: &DecodeHints) -> Self {
        Self {
            upc_ean: [BarcodeFormat::UpcA, BarcodeFormat::UpcE, BarcodeFormat::Ean8, BarcodeFormat::Ean13]
                .into_iter()
                .any(|f| hints.wants(f))
                .then(|| MultiFormatUpcEanReader::new(hints)),
            code39: hints.wants(BarcodeFormat::Code39).then(|| Code39Reader::new(false)),
            code93: hints.wants(BarcodeFormat::Code93).then(Code93Reader::new),
            code128: hints.wants(BarcodeFormat::Code128).then(Code128Reader::new),
            itf: hints.wants(BarcodeFormat::Itf).then(ItfReader::new),
            codabar: hints.wants(BarcodeFormat::Codabar).then(CodabarReader::new),
            rss14: hints.wants(BarcodeFormat::Rss14).then(Rss14Reader::new),
        }
    }
}

impl OneDReader for MultiFormatOneDReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, hints: &DecodeHints) -> Result<RXingResult> {
        if let Some(reader) = &mut self.upc_ean {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.code39 {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.code93 {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.code128 {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.itf {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.codabar {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        if let Some(reader) = &mut self.rss14 {
            if let Ok(result) = reader.decode_row(row_number, row, hints) {
                return Ok(result);
            }
        }
        Err(Exceptions::not_found_bare())
    }

    fn reset(&mut self) {
        if let Some(r) = &mut self.rss14 {
            r.reset();
        }
    }
}

impl Reader for MultiFormatOneDReader {
    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, hints: &DecodeHints) -> Result<RXingResult> {
        one_d_reader::decode(self, image, hints)
    }

    fn reset(&mut self) {
        OneDReader::reset(self)
    }
}
