//! PDF417 detection and decoding (spec §4.6-§4.10).

pub mod decoder;
pub mod detector;
pub mod pdf417_common;
pub mod pdf_417_reader;

pub use pdf_417_reader::Pdf417Reader;
