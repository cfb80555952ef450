//! PDF417 symbol decoding: row-codeword extraction, Reed-Solomon correction
//! over GF(929), and the Text/Byte/Numeric compaction bit-stream parser
//! (spec §4.7, §4.9, §4.10).

pub mod bit_matrix_parser;
pub mod decoded_bit_stream_parser;
pub mod decoder;
pub mod ec;

pub use decoder::decode;
