//! Data Matrix symbol decoding: codeword extraction, Reed-Solomon
//! correction, and the ASCII/C40/Text/ANSI X12/EDIFACT/Base256 data segment
//! parser (spec §4.7, §4.10).

pub mod bit_matrix_parser;
pub mod data_block;
pub mod decoded_bit_stream_parser;
pub mod decoder;
pub mod version;

pub use decoder::decode;
pub use version::Version;
