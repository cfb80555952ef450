//! RSS-14 (GS1 DataBar), ISO/IEC 24724. RSS-Expanded is surface-only (see
//! `BarcodeFormat::RssExpanded`) and is not wired into `MultiFormatReader`.

pub mod rss_14_reader;

pub use rss_14_reader::Rss14Reader;
