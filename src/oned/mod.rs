//! 1D (linear) barcode symbologies: UPC/EAN family, Code 39/93/128, Codabar,
//! Interleaved 2 of 5 and RSS-14, all sharing the row-scan loop
//! in [`one_d_reader`] and the run-length matcher in [`patterns`].

pub mod codabar_reader;
pub mod code128_reader;
pub mod code39_reader;
pub mod code93_reader;
pub mod ean13_reader;
pub mod ean8_reader;
pub mod itf_reader;
pub mod multi_format_one_d_reader;
pub mod multi_format_upc_ean_reader;
pub mod one_d_reader;
pub mod patterns;
pub mod rss;
pub mod upc_a_reader;
pub mod upc_e_reader;
pub mod upc_ean_reader;

pub use multi_format_one_d_reader::MultiFormatOneDReader;
pub use one_d_reader::OneDReader;
