//! Polynomials over [`super::modulus_gf::ModulusGF`] (spec §4.6).
//!
//! Structurally the same shape as `common::reedsolomon::GenericGFPoly`, but
//! addition is modular rather than XOR, so the two can't share an
//! implementation without a generic-arithmetic trait the rest of the crate
//! doesn't otherwise need.

use crate::error::{Exceptions, Result};

use super::modulus_gf::ModulusGF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulusPoly {
    coefficients: Vec<i32>,
}

impl ModulusPoly {
    pub fn new(coefficients: Vec<i32>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Exceptions::invalid_argument_with("ModulusPoly requires coefficients"));
        }
        if coefficients.len() > 1 && coefficients[0] == 0 {
            let first_non_zero = coefficients.iter().position(|&c| c != 0);
            return Ok(match first_non_zero {
                None => Self::new_raw(vec![0]),
                Some(idx) => Self::new_raw(coefficients[idx..].to_vec()),
            });
        }
        Ok(Self::new_raw(coefficients))
    }

    pub(super) fn new_raw(coefficients: Vec<i32>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[i32] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    pub fn coefficient(&self, degree: usize) -> i32 {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, field: &ModulusGF, a: i32) -> i32 {
        if a == 0 {
            return self.coefficient(0);
        }
        let mut result = self.coefficients[0];
        for &coeff in &self.coefficients[1..] {
            result = field.add(field.multiply(a, result), coeff);
        }
        result
    }

    pub fn add_or_subtract(&self, field: &ModulusGF, other: &ModulusPoly) -> Result<ModulusPoly> {
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }

        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };

        let mut sum_diff = vec![0i32; larger.len()];
        let length_diff = larger.len() - smaller.len();
        sum_diff[..length_diff].copy_from_slice(&larger[..length_diff]);
        for i in length_diff..larger.len() {
            sum_diff[i] = field.add(smaller[i - length_diff], larger[i]);
        }
        ModulusPoly::new(sum_diff)
    }

    pub fn multiply_poly(&self, field: &ModulusGF, other: &ModulusPoly) -> Result<ModulusPoly> {
        if self.is_zero() || other.is_zero() {
            return Ok(field.zero());
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0i32; a.len() + b.len() - 1];
        for (i, &a_coeff) in a.iter().enumerate() {
            if a_coeff == 0 {
                continue;
            }
            for (j, &b_coeff) in b.iter().enumerate() {
                product[i + j] = field.add(product[i + j], field.multiply(a_coeff, b_coeff));
            }
        }
        ModulusPoly::new(product)
    }

    pub fn multiply_scalar(&self, field: &ModulusGF, scalar: i32) -> Result<ModulusPoly> {
        if scalar == 0 {
            return Ok(field.zero());
        }
        let product: Vec<i32> = self.coefficients.iter().map(|&c| field.multiply(c, scalar)).collect();
        ModulusPoly::new(product)
    }

    pub fn multiply_by_monomial(&self, field: &ModulusGF, degree: usize, coefficient: i32) -> Result<ModulusPoly> {
        if coefficient == 0 {
            return Ok(field.zero());
        }
        let mut product = vec![0i32; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = field.multiply(c, coefficient);
        }
        ModulusPoly::new(product)
    }

    /// Polynomial long division, returning `(quotient, remainder)`.
    pub fn divide(&self, field: &ModulusGF, other: &ModulusPoly) -> Result<(ModulusPoly, ModulusPoly)> {
        if other.is_zero() {
            return Err(Exceptions::invalid_argument_with("divide by 0"));
        }

        let mut quotient = field.zero();
        let mut remainder = self.clone();

        let denominator_leading_term = other.coefficient(other.degree());
        let inverse_denominator_leading_term = field.inverse(denominator_leading_term)?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_difference = remainder.degree() - other.degree();
            let scale = field.multiply(remainder.coefficient(remainder.degree()), inverse_denominator_leading_term);
            let term = other.multiply_by_monomial(field, degree_difference, scale)?;
            let iteration_quotient = field.build_monomial(degree_difference, scale)?;
            quotient = quotient.add_or_subtract(field, &iteration_quotient)?;
            remainder = remainder.add_or_subtract(field, &negate(field, &term)?)?;
        }

        Ok((quotient, remainder))
    }
}

/// Modular negation: `-p`, coefficient-wise.
fn negate(field: &ModulusGF, p: &ModulusPoly) -> Result<ModulusPoly> {
    let negated: Vec<i32> = p.coefficients.iter().map(|&c| field.subtract(0, c)).collect();
    ModulusPoly::new(negated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf417::decoder::ec::modulus_gf::PDF417_GF;

    #[test]
    fn strips_leading_zeros() {
        let p = ModulusPoly::new(vec![0, 0, 5, 3]).unwrap();
        assert_eq!(p.coefficients(), &[5, 3]);
    }

    #[test]
    fn divide_recovers_dividend_via_multiply_add() {
        let field = &*PDF417_GF;
        let dividend = ModulusPoly::new(vec![1, 0, 3, 5]).unwrap();
        let divisor = ModulusPoly::new(vec![1, 2]).unwrap();
        let (quotient, remainder) = dividend.divide(field, &divisor).unwrap();
        let product = quotient.multiply_poly(field, &divisor).unwrap();
        let reconstructed = product.add_or_subtract(field, &remainder).unwrap();
        assert_eq!(reconstructed, dividend);
    }
}
