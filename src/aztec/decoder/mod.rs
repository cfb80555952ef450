//! Aztec symbol decoding: ring-walk codeword extraction, Reed-Solomon
//! correction, bit-unstuffing, and the Upper/Lower/Mixed/Digit/Punct/Binary
//! mode-table bit-stream parser (spec §4.9, §4.10).

pub mod bit_matrix_parser;
pub mod decoded_bit_stream_parser;
pub mod decoder;

pub use decoder::decode;
