//! GF(2^m) arithmetic parametrized by primitive polynomial, field size, and
//! generator base (spec §4.6).

use once_cell::sync::Lazy;

use crate::error::{Exceptions, Result};

use super::generic_gf_poly::GenericGFPoly;

/// A Galois field of order `size = 2^m`, built from a primitive polynomial.
/// Multiplication and division are table lookups once `exp`/`log` tables are
/// built, matching the classic ZXing approach rather than bit-by-bit
/// polynomial reduction on every call.
#[derive(Debug, Clone)]
pub struct GenericGF {
    exp_table: Vec<i32>,
    log_table: Vec<i32>,
    zero: GenericGFPoly,
    one: GenericGFPoly,
    size: i32,
    primitive: i32,
    generator_base: i32,
}

impl GenericGF {
    /// `primitive` is the field's generator polynomial, `size` is `2^m`, and
    /// `generator_base` is the smallest degree of the generator polynomial
    /// this field is used to build (0 for QR Code, 1 for most others).
    pub fn new(primitive: i32, size: i32, generator_base: i32) -> Self {
        let mut exp_table = vec![0i32; size as usize];
        let mut log_table = vec![0i32; size as usize];
        let mut x = 1;
        for i in 0..size as usize {
            exp_table[i] = x;
            x <<= 1;
            if x >= size {
                x ^= primitive;
                x &= size - 1;
            }
        }
        for i in 0..(size as usize - 1) {
            log_table[exp_table[i] as usize] = i as i32;
        }

        let zero = GenericGFPoly::new_raw(vec![0]);
        let one = GenericGFPoly::new_raw(vec![1]);

        Self {
            exp_table,
            log_table,
            zero,
            one,
            size,
            primitive,
            generator_base,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn generator_base(&self) -> i32 {
        self.generator_base
    }

    pub fn primitive(&self) -> i32 {
        self.primitive
    }

    pub fn zero(&self) -> GenericGFPoly {
        self.zero.clone()
    }

    pub fn one(&self) -> GenericGFPoly {
        self.one.clone()
    }

    /// The degree-`degree` monomial `coefficient * x^degree`.
    pub fn build_monomial(&self, degree: usize, coefficient: i32) -> Result<GenericGFPoly> {
        if coefficient == 0 {
            return Ok(self.zero());
        }
        let mut coefficients = vec![0i32; degree + 1];
        coefficients[0] = coefficient;
        Ok(GenericGFPoly::new_raw(coefficients))
    }

    pub fn add_or_subtract(a: i32, b: i32) -> i32 {
        a ^ b
    }

    pub fn exp(&self, a: i32) -> i32 {
        self.exp_table[a as usize]
    }

    pub fn log(&self, a: i32) -> Result<i32> {
        if a == 0 {
            return Err(Exceptions::invalid_argument_with("0 has no log"));
        }
        Ok(self.log_table[a as usize])
    }

    pub fn inverse(&self, a: i32) -> Result<i32> {
        if a == 0 {
            return Err(Exceptions::invalid_argument_with("0 has no inverse"));
        }
        Ok(self.exp_table[(self.size - self.log_table[a as usize] - 1) as usize])
    }

    pub fn multiply(&self, a: i32, b: i32) -> i32 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log_table[a as usize] + self.log_table[b as usize];
        self.exp_table[(sum % (self.size - 1)) as usize]
    }
}

/// `QR_CODE_FIELD_256`: primitive x^8 + x^4 + x^3 + x^2 + 1, base 0.
pub static QR_CODE_FIELD_256: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x011D, 256, 0));
/// `DATA_MATRIX_FIELD_256`: primitive x^8 + x^5 + x^3 + x^2 + 1, base 1.
pub static DATA_MATRIX_FIELD_256: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x012D, 256, 1));
pub static AZTEC_DATA_12: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x1069, 4096, 1));
pub static AZTEC_DATA_10: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x409, 1024, 1));
/// Same primitive polynomial as `DATA_MATRIX_FIELD_256`; kept as its own
/// `Lazy` rather than an alias since every field here owns its exp/log
/// tables independently.
pub static AZTEC_DATA_8: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x012D, 256, 1));
pub static AZTEC_DATA_6: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x43, 64, 1));
pub static AZTEC_PARAM: Lazy<GenericGF> = Lazy::new(|| GenericGF::new(0x13, 16, 1));
pub static MAXICODE_FIELD_64: Lazy<&'static GenericGF> = Lazy::new(|| &AZTEC_DATA_6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_log_are_inverses_across_nonzero_elements() {
        let field = GenericGF::new(0x011D, 256, 0);
        for a in 1..256 {
            let e = field.log(a).unwrap();
            assert_eq!(field.exp(e), a, "round trip failed for {a}");
        }
    }

    #[test]
    fn inverse_multiplies_to_one() {
        let field = &*QR_CODE_FIELD_256;
        for a in 1..256 {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1);
        }
    }

    #[test]
    fn multiply_by_zero_is_zero() {
        let field = &*QR_CODE_FIELD_256;
        assert_eq!(field.multiply(0, 200), 0);
        assert_eq!(field.multiply(200, 0), 0);
    }

    #[test]
    fn log_of_zero_is_illegal_argument() {
        let field = &*QR_CODE_FIELD_256;
        assert!(field.log(0).is_err());
    }
}
