//! Galois field arithmetic and Reed-Solomon error correction shared by QR,
//! Data Matrix, Aztec, and PDF417 decoding (spec §4.6, §4.7).

pub mod generic_gf;
pub mod generic_gf_poly;
pub mod reed_solomon_decoder;

pub use generic_gf::GenericGF;
pub use generic_gf_poly::GenericGFPoly;
pub use reed_solomon_decoder::ReedSolomonDecoder;
