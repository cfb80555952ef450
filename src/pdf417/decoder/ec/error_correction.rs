//! Reed-Solomon correction over GF(929) (spec §4.7).
//!
//! Same syndrome/Euclidean-algorithm/Chien-search/Forney shape as
//! `common::reedsolomon::ReedSolomonDecoder`, adapted to modular rather than
//! XOR arithmetic.

use crate::error::{Exceptions, Result};

use super::modulus_gf::ModulusGF;
use super::modulus_poly::ModulusPoly;

pub struct PdfErrorCorrection<'a> {
    field: &'a ModulusGF,
}

impl<'a> PdfErrorCorrection<'a> {
    pub fn new(field: &'a ModulusGF) -> Self {
        Self { field }
    }

    /// Corrects `received` in place. `num_ec_codewords` is how many of the
    /// trailing entries are error-correction codewords. Returns the number
    /// of codewords corrected.
    pub fn decode(&self, received: &mut [i32], num_ec_codewords: usize) -> Result<usize> {
        let field = self.field;
        let poly = ModulusPoly::new(received.to_vec())?;

        let mut syndrome_coefficients = vec![0i32; num_ec_codewords];
        let mut has_error = false;
        for i in 1..=num_ec_codewords {
            let eval = poly.evaluate_at(field, field.exp(i as i32));
            syndrome_coefficients[num_ec_codewords - i] = eval;
            if eval != 0 {
                has_error = true;
            }
        }
        if !has_error {
            return Ok(0);
        }

        let syndrome = ModulusPoly::new(syndrome_coefficients)?;
        let monomial = field.build_monomial(num_ec_codewords, 1)?;
        let (sigma, omega) = self.run_euclidean_algorithm(&monomial, &syndrome, num_ec_codewords)?;

        let error_locations = self.find_error_locations(&sigma)?;
        let error_magnitudes = self.find_error_magnitudes(&omega, &error_locations)?;

        for i in 0..error_locations.len() {
            let position = received.len() as i32 - 1 - field.log(error_locations[i])?;
            if position < 0 {
                return Err(Exceptions::checksum_error("bad error location"));
            }
            received[position as usize] = field.subtract(received[position as usize], error_magnitudes[i]);
        }
        Ok(error_locations.len())
    }

    fn run_euclidean_algorithm(
        &self,
        a: &ModulusPoly,
        b: &ModulusPoly,
        r: usize,
    ) -> Result<(ModulusPoly, ModulusPoly)> {
        let field = self.field;

        let (a, b) = if a.degree() < b.degree() { (b.clone(), a.clone()) } else { (a.clone(), b.clone()) };

        let mut r_last = a;
        let mut r_cur = b;
        let mut t_last = field.zero();
        let mut t_cur = field.one();

        while r_cur.degree() >= r.div_ceil(2) {
            let r_last_last = r_last;
            let t_last_last = t_last;
            r_last = r_cur;
            t_last = t_cur;

            if r_last.is_zero() {
                return Err(Exceptions::checksum_error("r_last is zero"));
            }

            let mut r = r_last_last;
            let mut q = field.zero();
            let denominator_leading_term = r_last.coefficient(r_last.degree());
            let dlt_inverse = field.inverse(denominator_leading_term)?;

            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = field.multiply(r.coefficient(r.degree()), dlt_inverse);
                q = q.add_or_subtract(field, &field.build_monomial(degree_diff, scale)?)?;
                let term = r_last.multiply_by_monomial(field, degree_diff, scale)?;
                r = subtract_poly(field, &r, &term)?;
            }

            r_cur = r;
            let qt = q.multiply_poly(field, &t_last)?;
            t_cur = subtract_poly(field, &t_last_last, &qt)?;

            if r_cur.degree() >= r_last.degree() {
                return Err(Exceptions::checksum_error("division algorithm failed to reduce the polynomial degree"));
            }
        }

        let sigma_tilde_at_zero = t_cur.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(Exceptions::checksum_error("sigma tilde(0) was zero"));
        }

        let inverse = field.inverse(sigma_tilde_at_zero)?;
        let sigma = t_cur.multiply_scalar(field, inverse)?;
        let omega = r_cur.multiply_scalar(field, inverse)?;
        Ok((sigma, omega))
    }

    fn find_error_locations(&self, error_locator: &ModulusPoly) -> Result<Vec<i32>> {
        let field = self.field;
        let num_errors = error_locator.degree();
        let mut result = vec![0i32; num_errors];
        let mut e = 0;
        let mut i = 1;
        while i < field.modulus() && e < num_errors {
            if error_locator.evaluate_at(field, i) == 0 {
                result[e] = field.inverse(i)?;
                e += 1;
            }
            i += 1;
        }
        if e != num_errors {
            return Err(Exceptions::checksum_error("error locator degree does not match number of roots"));
        }
        Ok(result)
    }

    fn find_error_magnitudes(&self, error_evaluator: &ModulusPoly, error_locations: &[i32]) -> Result<Vec<i32>> {
        let field = self.field;
        let s = error_locations.len();
        let mut result = vec![0i32; s];
        for i in 0..s {
            let xi_inverse = field.inverse(error_locations[i])?;
            let mut error_locator_derivative = 1;
            for j in 0..s {
                if i != j {
                    let term = field.multiply(error_locations[j], xi_inverse);
                    let term = field.subtract(1, term);
                    error_locator_derivative = field.multiply(error_locator_derivative, term);
                }
            }
            result[i] = field.multiply(
                error_evaluator.evaluate_at(field, xi_inverse),
                field.inverse(error_locator_derivative)?,
            );
        }
        Ok(result)
    }
}

fn negate_poly(field: &ModulusGF, p: &ModulusPoly) -> Result<ModulusPoly> {
    let negated: Vec<i32> = p.coefficients().iter().map(|&c| field.subtract(0, c)).collect();
    ModulusPoly::new(negated)
}

fn subtract_poly(field: &ModulusGF, a: &ModulusPoly, b: &ModulusPoly) -> Result<ModulusPoly> {
    a.add_or_subtract(field, &negate_poly(field, b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf417::decoder::ec::modulus_gf::PDF417_GF;

    fn encode(data: &[i32], ec_count: usize) -> Vec<i32> {
        let field = &*PDF417_GF;
        let mut generator = field.one();
        for i in 0..ec_count {
            let monomial = field.build_monomial(1, field.exp(i as i32 + 1)).unwrap();
            generator = generator.multiply_poly(field, &monomial).unwrap();
        }

        let mut info_coefficients = data.to_vec();
        info_coefficients.resize(data.len() + ec_count, 0);
        let info = ModulusPoly::new(info_coefficients).unwrap();
        let (_, remainder) = info.divide(field, &generator).unwrap();

        let mut result = data.to_vec();
        let coefficients = remainder.coefficients();
        let pad = ec_count.saturating_sub(coefficients.len());
        result.extend(std::iter::repeat(0).take(pad));
        result.extend_from_slice(coefficients);
        result
    }

    #[test]
    fn decodes_clean_codeword_as_no_op() {
        let field = &*PDF417_GF;
        let ec = PdfErrorCorrection::new(field);
        let mut codeword = encode(&[1, 2, 3, 4, 5], 8);
        let original = codeword.clone();
        assert_eq!(ec.decode(&mut codeword, 8).unwrap(), 0);
        assert_eq!(codeword, original);
    }

    #[test]
    fn corrects_errors_up_to_capacity() {
        let field = &*PDF417_GF;
        let ec = PdfErrorCorrection::new(field);
        let data = [10, 20, 30, 40, 50];
        let ec_count = 8;
        let mut codeword = encode(&data, ec_count);
        let original = codeword.clone();

        codeword[0] = (codeword[0] + 57) % PDF417_GF.modulus();
        codeword[3] = (codeword[3] + 200) % PDF417_GF.modulus();

        ec.decode(&mut codeword, ec_count).unwrap();
        assert_eq!(codeword, original);
    }
}
