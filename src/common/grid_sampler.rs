//! Samples a perspective-corrected grid of black/white values out of a
//! [`BitMatrix`] (spec §4.5).

use crate::common::bit_matrix::BitMatrix;
use crate::common::perspective_transform::PerspectiveTransform;
use crate::error::{Exceptions, Result};

/// Points exactly one unit outside the image on any edge are nudged back
/// onto the boundary; anything further out is a hard failure. This mirrors
/// the classic `checkAndNudgePoints` tolerance.
fn check_and_nudge_points(image: &BitMatrix, points: &mut [f32]) -> Result<()> {
    let width = image.width() as i32;
    let height = image.height() as i32;

    let mut nudged = true;
    let max_offset = points.len() - 1;
    let mut offset = 0;
    while offset < points.len() && nudged {
        let x = points[offset] as i32;
        let y = points[offset + 1] as i32;
        if x < -1 || x > width || y < -1 || y > height {
            return Err(Exceptions::not_found("transformed point out of bounds"));
        }
        nudged = false;
        if x == -1 {
            points[offset] = 0.0;
            nudged = true;
        } else if x == width {
            points[offset] = (width - 1) as f32;
            nudged = true;
        }
        if y == -1 {
            points[offset + 1] = 0.0;
            nudged = true;
        } else if y == height {
            points[offset + 1] = (height - 1) as f32;
            nudged = true;
        }
        offset += 2;
    }

    nudged = true;
    offset = max_offset as i32 - 1;
    while offset >= 0 && nudged {
        let offset = offset as usize;
        let x = points[offset] as i32;
        let y = points[offset + 1] as i32;
        if x < -1 || x > width || y < -1 || y > height {
            return Err(Exceptions::not_found("transformed point out of bounds"));
        }
        nudged = false;
        if x == -1 {
            points[offset] = 0.0;
            nudged = true;
        } else if x == width {
            points[offset] = (width - 1) as f32;
            nudged = true;
        }
        if y == -1 {
            points[offset + 1] = 0.0;
            nudged = true;
        } else if y == height {
            points[offset + 1] = (height - 1) as f32;
            nudged = true;
        }
    }

    Ok(())
}

/// Samples a `dimension_x` by `dimension_y` grid of modules from `image`,
/// using `transform` to map grid coordinates back to image space.
pub fn sample_grid(
    image: &BitMatrix,
    dimension_x: u32,
    dimension_y: u32,
    transform: &PerspectiveTransform,
) -> Result<BitMatrix> {
    if dimension_x == 0 || dimension_y == 0 {
        return Err(Exceptions::invalid_argument_with("dimension must be positive"));
    }

    let mut bits = BitMatrix::new(dimension_x, dimension_y)?;
    let mut points = vec![0f32; 2 * dimension_x as usize];

    for y in 0..dimension_y {
        let max = points.len();
        let i_value = y as f32 + 0.5;
        for (x_half, point) in points.chunks_exact_mut(2).enumerate().take(max / 2) {
            point[0] = x_half as f32 + 0.5;
            point[1] = i_value;
        }
        transform.transform_points(&mut points)?;
        check_and_nudge_points(image, &mut points)?;

        for x in 0..dimension_x {
            let px = points[2 * x as usize];
            let py = points[2 * x as usize + 1];
            if image.get(px as u32, py as u32)? {
                bits.set(x, y)?;
            }
        }
    }

    Ok(bits)
}

/// Builds the transform from a quadrilateral-bounded grid of the given
/// dimensions and delegates to [`sample_grid`].
#[allow(clippy::too_many_arguments)]
pub fn sample_grid_quad(
    image: &BitMatrix,
    dimension_x: u32,
    dimension_y: u32,
    p1_to_x: f32,
    p1_to_y: f32,
    p2_to_x: f32,
    p2_to_y: f32,
    p3_to_x: f32,
    p3_to_y: f32,
    p4_to_x: f32,
    p4_to_y: f32,
    p1_from_x: f32,
    p1_from_y: f32,
    p2_from_x: f32,
    p2_from_y: f32,
    p3_from_x: f32,
    p3_from_y: f32,
    p4_from_x: f32,
    p4_from_y: f32,
) -> Result<BitMatrix> {
    let transform = PerspectiveTransform::quadrilateral_to_square(
        p1_to_x, p1_to_y, p2_to_x, p2_to_y, p3_to_x, p3_to_y, p4_to_x, p4_to_y,
    )
    .times(&PerspectiveTransform::square_to_quadrilateral(
        p1_from_x, p1_from_y, p2_from_x, p2_from_y, p3_from_x, p3_from_y, p4_from_x, p4_from_y,
    ));
    sample_grid(image, dimension_x, dimension_y, &transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_identity_transform_unchanged() {
        let mut image = BitMatrix::new(4, 4).unwrap();
        image.set(1, 1).unwrap();
        image.set(2, 2).unwrap();

        let transform = PerspectiveTransform::square_to_quadrilateral(0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0);
        let sampled = sample_grid(&image, 4, 4, &transform).unwrap();
        assert_eq!(sampled.get(1, 1).unwrap(), true);
        assert_eq!(sampled.get(2, 2).unwrap(), true);
        assert_eq!(sampled.get(0, 0).unwrap(), false);
    }

    #[test]
    fn rejects_zero_dimension() {
        let image = BitMatrix::new(4, 4).unwrap();
        let transform = PerspectiveTransform::square_to_quadrilateral(0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0);
        assert!(sample_grid(&image, 0, 4, &transform).is_err());
    }
}
