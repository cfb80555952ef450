//! GF(929), PDF417's prime field (spec §4.6).
//!
//! Unlike the characteristic-2 fields in `common::reedsolomon`, addition here
//! is ordinary modular addition, not XOR, so this field gets its own small
//! arithmetic type rather than reusing `GenericGF`.

use crate::error::{Exceptions, Result};

use super::modulus_poly::ModulusPoly;

pub const PDF417_GF_MODULUS: i32 = 929;

/// `3` generates the multiplicative group of GF(929) (929 is prime, and 3
/// has order 928 modulo 929).
const GENERATOR: i32 = 3;

pub struct ModulusGF {
    modulus: i32,
    exp_table: Vec<i32>,
    log_table: Vec<i32>,
}

impl ModulusGF {
    pub fn new(modulus: i32, generator: i32) -> Self {
        let size = modulus as usize;
        let mut exp_table = vec![0i32; size];
        let mut log_table = vec![0i32; size];
        let mut x = 1i32;
        for i in 0..size {
            exp_table[i] = x;
            x = (x * generator) % modulus;
        }
        for i in 0..size {
            log_table[exp_table[i] as usize] = i as i32;
        }
        Self { modulus, exp_table, log_table }
    }

    pub fn modulus(&self) -> i32 {
        self.modulus
    }

    pub fn add(&self, a: i32, b: i32) -> i32 {
        (a + b) % self.modulus
    }

    pub fn subtract(&self, a: i32, b: i32) -> i32 {
        (a - b + self.modulus) % self.modulus
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
        Ok(self.exp_table[(self.modulus - self.log_table[a as usize] - 1) as usize])
    }

    pub fn multiply(&self, a: i32, b: i32) -> i32 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = self.log_table[a as usize] + self.log_table[b as usize];
        self.exp_table[(sum % (self.modulus - 1)) as usize]
    }

    pub fn zero(&self) -> ModulusPoly {
        ModulusPoly::new_raw(vec![0])
    }

    pub fn one(&self) -> ModulusPoly {
        ModulusPoly::new_raw(vec![1])
    }

    pub fn build_monomial(&self, degree: usize, coefficient: i32) -> Result<ModulusPoly> {
        if coefficient == 0 {
            return Ok(self.zero());
        }
        let mut coefficients = vec![0i32; degree + 1];
        coefficients[0] = coefficient;
        ModulusPoly::new(coefficients)
    }
}

pub static PDF417_GF: once_cell::sync::Lazy<ModulusGF> =
    once_cell::sync::Lazy::new(|| ModulusGF::new(PDF417_GF_MODULUS, GENERATOR));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_log_round_trip() {
        let field = &*PDF417_GF;
        for a in 1..PDF417_GF_MODULUS {
            let e = field.log(a).unwrap();
            assert_eq!(field.exp(e), a);
        }
    }

    #[test]
    fn inverse_multiplies_to_one() {
        let field = &*PDF417_GF;
        for a in 1..PDF417_GF_MODULUS {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1);
        }
    }
}
