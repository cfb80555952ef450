//! Polynomials over a [`super::generic_gf::GenericGF`] (spec §4.6).

use crate::error::{Exceptions, Result};

use super::generic_gf::GenericGF;

/// Coefficients are stored highest-degree first, matching the teacher's
/// `ArrayRef<int>` layout in the original decoder. `coefficients[0] == 0`
/// only for the single-term zero polynomial; the constructor strips any
/// other leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGFPoly {
    coefficients: Vec<i32>,
}

impl GenericGFPoly {
    pub fn new(coefficients: &[i32]) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Exceptions::invalid_argument_with(
                "GenericGFPoly requires coefficients",
            ));
        }
        if coefficients.len() > 1 && coefficients[0] == 0 {
            let first_non_zero = coefficients.iter().position(|&c| c != 0);
            return Ok(match first_non_zero {
                None => Self::new_raw(vec![0]),
                Some(idx) => Self::new_raw(coefficients[idx..].to_vec()),
            });
        }
        Ok(Self::new_raw(coefficients.to_vec()))
    }

    /// Builds a polynomial without re-checking the leading-zero invariant.
    /// Only used internally once the caller has already normalized.
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

    /// The coefficient of `x^degree`.
    pub fn coefficient(&self, degree: usize) -> i32 {
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    pub fn evaluate_at(&self, field: &GenericGF, a: i32) -> i32 {
        if a == 0 {
            return self.coefficient(0);
        }
        if a == 1 {
            return self.coefficients.iter().fold(0, |acc, &c| GenericGF::add_or_subtract(acc, c));
        }
        let mut result = self.coefficients[0];
        for &coeff in &self.coefficients[1..] {
            result = GenericGF::add_or_subtract(field.multiply(a, result), coeff);
        }
        result
    }

    pub fn add_or_subtract(&self, field: &GenericGF, other: &GenericGFPoly) -> Result<GenericGFPoly> {
        let _ = field;
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
            sum_diff[i] = GenericGF::add_or_subtract(smaller[i - length_diff], larger[i]);
        }
        GenericGFPoly::new(&sum_diff)
    }

    pub fn multiply_poly(&self, field: &GenericGF, other: &GenericGFPoly) -> Result<GenericGFPoly> {
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
                product[i + j] = GenericGF::add_or_subtract(product[i + j], field.multiply(a_coeff, b_coeff));
            }
        }
        GenericGFPoly::new(&product)
    }

    pub fn multiply_scalar(&self, field: &GenericGF, scalar: i32) -> Result<GenericGFPoly> {
        if scalar == 0 {
            return Ok(field.zero());
        }
        if scalar == 1 {
            return Ok(self.clone());
        }
        let product: Vec<i32> = self.coefficients.iter().map(|&c| field.multiply(c, scalar)).collect();
        GenericGFPoly::new(&product)
    }

    pub fn multiply_by_monomial(&self, field: &GenericGF, degree: usize, coefficient: i32) -> Result<GenericGFPoly> {
        if coefficient == 0 {
            return Ok(field.zero());
        }
        let mut product = vec![0i32; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = field.multiply(c, coefficient);
        }
        GenericGFPoly::new(&product)
    }

    /// Polynomial long division, returning `(quotient, remainder)`.
    pub fn divide(&self, field: &GenericGF, other: &GenericGFPoly) -> Result<(GenericGFPoly, GenericGFPoly)> {
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
            remainder = remainder.add_or_subtract(field, &term)?;
        }

        Ok((quotient, remainder))
    }
}

impl std::fmt::Display for GenericGFPoly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, &coeff) in self.coefficients.iter().enumerate() {
            if coeff == 0 {
                continue;
            }
            let degree = self.coefficients.len() - 1 - i;
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{coeff}x^{degree}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::reedsolomon::generic_gf::QR_CODE_FIELD_256;

    #[test]
    fn strips_leading_zeros() {
        let p = GenericGFPoly::new(&[0, 0, 5, 3]).unwrap();
        assert_eq!(p.coefficients(), &[5, 3]);
    }

    #[test]
    fn all_zero_collapses_to_single_zero() {
        let p = GenericGFPoly::new(&[0, 0, 0]).unwrap();
        assert_eq!(p.coefficients(), &[0]);
        assert!(p.is_zero());
    }

    #[test]
    fn add_zero_is_identity() {
        let field = &*QR_CODE_FIELD_256;
        let p = GenericGFPoly::new(&[1, 2, 3]).unwrap();
        let zero = field.zero();
        assert_eq!(p.add_or_subtract(field, &zero).unwrap(), p);
    }

    #[test]
    fn divide_recovers_dividend_via_multiply_add() {
        let field = &*QR_CODE_FIELD_256;
        let dividend = GenericGFPoly::new(&[1, 0, 3, 5]).unwrap();
        let divisor = GenericGFPoly::new(&[1, 2]).unwrap();
        let (quotient, remainder) = dividend.divide(field, &divisor).unwrap();
        let product = quotient.multiply_poly(field, &divisor).unwrap();
        let reconstructed = product.add_or_subtract(field, &remainder).unwrap();
        assert_eq!(reconstructed, dividend);
    }
}
