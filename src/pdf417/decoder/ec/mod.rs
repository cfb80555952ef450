//! PDF417's prime-field Reed-Solomon stack (spec §4.6, §4.7): GF(929)
//! arithmetic, polynomials over it, and the Euclidean-algorithm decoder.

pub mod error_correction;
pub mod modulus_gf;
pub mod modulus_poly;

pub use error_correction::PdfErrorCorrection;
pub use modulus_gf::{ModulusGF, PDF417_GF};
pub use modulus_poly::ModulusPoly;
