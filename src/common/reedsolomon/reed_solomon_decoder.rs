//! Syndrome-based Reed-Solomon error correction (spec §4.6, §4.7).
//!
//! Mirrors the classic ZXing decoder: build syndromes, run the Euclidean
//! algorithm to find the error locator and evaluator polynomials, find error
//! positions with a Chien search, and find error magnitudes with Forney's
//! formula.

use crate::error::{Exceptions, Result};

use super::generic_gf::GenericGF;
use super::generic_gf_poly::GenericGFPoly;

pub struct ReedSolomonDecoder<'a> {
    field: &'a GenericGF,
}

impl<'a> ReedSolomonDecoder<'a> {
    pub fn new(field: &'a GenericGF) -> Self {
        Self { field }
    }

    /// Corrects `received` in place. `two_s` is the number of error
    /// correction codewords (twice the number of correctable errors).
    /// Returns [`Exceptions::ChecksumError`] when the codeword is damaged
    /// beyond what `two_s` can repair.
    pub fn decode(&self, received: &mut [i32], two_s: usize) -> Result<()> {
        let field = self.field;
        let poly = GenericGFPoly::new(received)?;

        let mut syndrome_coefficients = vec![0i32; two_s];
        let mut no_error = true;
        for i in 0..two_s {
            let eval = poly.evaluate_at(field, field.exp(i as i32 + field.generator_base()));
            syndrome_coefficients[two_s - 1 - i] = eval;
            if eval != 0 {
                no_error = false;
            }
        }
        if no_error {
            return Ok(());
        }

        let syndrome = GenericGFPoly::new(&syndrome_coefficients)?;
        let monomial = field.build_monomial(two_s, 1)?;
        let (sigma, omega) = self.run_euclidean_algorithm(&monomial, &syndrome, two_s)?;

        let error_locations = self.find_error_locations(&sigma)?;
        let error_magnitudes = self.find_error_magnitudes(&omega, &error_locations)?;

        for i in 0..error_locations.len() {
            let position = received.len() as i32 - 1 - field.log(error_locations[i])?;
            if position < 0 {
                return Err(Exceptions::checksum_error("bad error location"));
            }
            received[position as usize] = GenericGF::add_or_subtract(received[position as usize], error_magnitudes[i]);
        }
        Ok(())
    }

    fn run_euclidean_algorithm(
        &self,
        a: &GenericGFPoly,
        b: &GenericGFPoly,
        r: usize,
    ) -> Result<(GenericGFPoly, GenericGFPoly)> {
        let field = self.field;

        let (a, b) = if a.degree() < b.degree() {
            (b.clone(), a.clone())
        } else {
            (a.clone(), b.clone())
        };

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
                r = r.add_or_subtract(field, &r_last.multiply_by_monomial(field, degree_diff, scale)?)?;
            }

            r_cur = r;
            t_cur = q.multiply_poly(field, &t_last)?.add_or_subtract(field, &t_last_last)?;

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

    fn find_error_locations(&self, error_locator: &GenericGFPoly) -> Result<Vec<i32>> {
        let field = self.field;
        let num_errors = error_locator.degree();
        if num_errors == 1 {
            return Ok(vec![error_locator.coefficient(1)]);
        }
        let mut result = vec![0i32; num_errors];
        let mut e = 0;
        let mut i = 1;
        while i < field.size() && e < num_errors {
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

    fn find_error_magnitudes(&self, error_evaluator: &GenericGFPoly, error_locations: &[i32]) -> Result<Vec<i32>> {
        let field = self.field;
        let s = error_locations.len();
        let mut result = vec![0i32; s];
        for i in 0..s {
            let xi_inverse = field.inverse(error_locations[i])?;
            let mut error_locator_derivative = 1;
            for j in 0..s {
                if i != j {
                    let term = field.multiply(error_locations[j], xi_inverse);
                    let term = GenericGF::add_or_subtract(1, term);
                    error_locator_derivative = field.multiply(error_locator_derivative, term);
                }
            }
            result[i] = field.multiply(
                error_evaluator.evaluate_at(field, xi_inverse),
                field.inverse(error_locator_derivative)?,
            );
            if field.generator_base() != 0 {
                result[i] = field.multiply(result[i], xi_inverse);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::reedsolomon::generic_gf::QR_CODE_FIELD_256;

    fn encode(data: &[i32], ec_count: usize) -> Vec<i32> {
        let field = &*QR_CODE_FIELD_256;
        let mut generator = field.one();
        for i in 0..ec_count {
            let monomial = field.build_monomial(1, field.exp(i as i32)).unwrap();
            generator = generator.multiply_poly(field, &monomial).unwrap();
        }

        let mut info_coefficients = data.to_vec();
        info_coefficients.resize(data.len() + ec_count, 0);
        let info = GenericGFPoly::new(&info_coefficients).unwrap();
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
        let field = &*QR_CODE_FIELD_256;
        let decoder = ReedSolomonDecoder::new(field);
        let mut codeword = encode(&[1, 2, 3, 4, 5], 10);
        let original = codeword.clone();
        decoder.decode(&mut codeword, 10).unwrap();
        assert_eq!(codeword, original);
    }

    #[test]
    fn corrects_errors_up_to_capacity() {
        let field = &*QR_CODE_FIELD_256;
        let decoder = ReedSolomonDecoder::new(field);
        let data = [10, 20, 30, 40, 50, 60];
        let ec_count = 10;
        let mut codeword = encode(&data, ec_count);
        let original = codeword.clone();

        codeword[0] ^= 0xFF;
        codeword[3] ^= 0x11;
        codeword[7] ^= 0x7A;
        codeword[9] ^= 0x01;
        codeword[12] ^= 0x55;

        decoder.decode(&mut codeword, ec_count).unwrap();
        assert_eq!(codeword, original);
    }

    #[test]
    fn too_many_errors_is_checksum_error() {
        let field = &*QR_CODE_FIELD_256;
        let decoder = ReedSolomonDecoder::new(field);
        let data = [1, 2, 3];
        let ec_count = 4;
        let mut codeword = encode(&data, ec_count);
        for c in codeword.iter_mut().take(4) {
            *c ^= 0xAB;
        }
        assert!(matches!(decoder.decode(&mut codeword, ec_count), Err(Exceptions::ChecksumError(_))));
    }
}
