//! Locates an Aztec symbol's bullseye, reads its mode message out of the
//! rings around the bullseye, and samples the data grid.
//!
//! Grounded on `original_source/cpp/core/src/zxing/aztec/detector/
//! ZxingAztecDetector.cpp`: expand outward from the image center ring by
//! ring until the bullseye's alternating black/white rings stop, counting
//! rings to tell compact (5 rings) from full-size (7 rings) symbols, then
//! read the mode message encoded in the four short scanlines just outside
//! the bullseye and Reed-Solomon-correct it over `GenericGF`'s `AZTEC_PARAM`
//! field.

use crate::common::bit_matrix::BitMatrix;
use crate::common::grid_sampler;
use crate::common::reedsolomon::generic_gf::AZTEC_PARAM;
use crate::common::reedsolomon::ReedSolomonDecoder;
use crate::common::BitArray;
use crate::error::{Exceptions, Result};
use crate::point::Point as ResultPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn to_result_point(self) -> ResultPoint {
        ResultPoint::new(self.x as f32, self.y as f32)
    }
}

/// Everything the decoder needs out of detection: the sampled data grid,
/// its image-space corners, and the mode message fields (layer/data-block
/// counts, compact vs. full-size) that `BitMatrixParser` needs to know the
/// codeword size.
#[derive(Debug, Clone)]
pub struct AztecDetectorResult {
    bits: BitMatrix,
    points: Vec<ResultPoint>,
    compact: bool,
    nb_datablocks: u32,
    nb_layers: u32,
}

impl AztecDetectorResult {
    pub fn bits(&self) -> &BitMatrix {
        &self.bits
    }

    pub fn points(&self) -> &[ResultPoint] {
        &self.points
    }

    pub fn compact(&self) -> bool {
        self.compact
    }

    pub fn nb_datablocks(&self) -> u32 {
        self.nb_datablocks
    }

    pub fn nb_layers(&self) -> u32 {
        self.nb_layers
    }

    #[cfg(test)]
    pub fn for_test(bits: BitMatrix, points: Vec<ResultPoint>, compact: bool, nb_datablocks: u32, nb_layers: u32) -> Self {
        Self { bits, points, compact, nb_datablocks, nb_layers }
    }
}

pub struct Detector<'a> {
    image: &'a BitMatrix,
    compact: bool,
    nb_layers: u32,
    nb_data_blocks: u32,
    nb_center_layers: u32,
    shift: usize,
}

impl<'a> Detector<'a> {
    pub fn new(image: &'a BitMatrix) -> Self {
        Self { image, compact: false, nb_layers: 0, nb_data_blocks: 0, nb_center_layers: 0, shift: 0 }
    }

    pub fn detect(&mut self) -> Result<AztecDetectorResult> {
        let center = self.get_matrix_center();
        let bullseye = self.get_bullseye_corner_points(center)?;
        self.extract_parameters(&bullseye)?;
        let corners = self.get_matrix_corner_points(&bullseye)?;

        let dimension = self.dimension();
        let ordered = [corners[self.shift % 4], corners[(self.shift + 3) % 4], corners[(self.shift + 2) % 4], corners[(self.shift + 1) % 4]];

        let bits = grid_sampler::sample_grid_quad(
            self.image,
            dimension,
            dimension,
            0.5,
            0.5,
            dimension as f32 - 0.5,
            0.5,
            dimension as f32 - 0.5,
            dimension as f32 - 0.5,
            0.5,
            dimension as f32 - 0.5,
            ordered[0].x,
            ordered[0].y,
            ordered[3].x,
            ordered[3].y,
            ordered[2].x,
            ordered[2].y,
            ordered[1].x,
            ordered[1].y,
        )?;

        Ok(AztecDetectorResult {
            bits,
            points: corners.to_vec(),
            compact: self.compact,
            nb_datablocks: self.nb_data_blocks,
            nb_layers: self.nb_layers,
        })
    }

    fn dimension(&self) -> u32 {
        if self.compact {
            4 * self.nb_layers + 11
        } else if self.nb_layers <= 4 {
            4 * self.nb_layers + 15
        } else {
            4 * self.nb_layers + 2 * ((self.nb_layers - 4) / 8 + 1) + 15
        }
    }

    fn extract_parameters(&mut self, bullseye: &[Point; 4]) -> Result<()> {
        let size = 2 * self.nb_center_layers as usize + 1;
        let resab = self.sample_line(bullseye[0], bullseye[1], size);
        let resbc = self.sample_line(bullseye[1], bullseye[2], size);
        let rescd = self.sample_line(bullseye[2], bullseye[3], size);
        let resda = self.sample_line(bullseye[3], bullseye[0], size);

        let center = 2 * self.nb_center_layers as usize;
        self.shift = if resab.get(0) && resab.get(center) {
            0
        } else if resbc.get(0) && resbc.get(center) {
            1
        } else if rescd.get(0) && rescd.get(center) {
            2
        } else if resda.get(0) && resda.get(center) {
            3
        } else {
            return Err(Exceptions::not_found("could not determine Aztec orientation"));
        };

        let param_bits = if self.compact { 28 } else { 40 };
        let mut parameter_data = BitArray::with_size(param_bits);
        let mut shifted_parameter_data = BitArray::with_size(param_bits);

        if self.compact {
            for i in 0..7 {
                if resab.get(2 + i) {
                    shifted_parameter_data.set(i);
                }
                if resbc.get(2 + i) {
                    shifted_parameter_data.set(i + 7);
                }
                if rescd.get(2 + i) {
                    shifted_parameter_data.set(i + 14);
                }
                if resda.get(2 + i) {
                    shifted_parameter_data.set(i + 21);
                }
            }
            for i in 0..28 {
                if shifted_parameter_data.get((i + self.shift * 7) % 28) {
                    parameter_data.set(i);
                }
            }
        } else {
            for i in 0..11 {
                if i < 5 {
                    if resab.get(2 + i) {
                        shifted_parameter_data.set(i);
                    }
                    if resbc.get(2 + i) {
                        shifted_parameter_data.set(i + 10);
                    }
                    if rescd.get(2 + i) {
                        shifted_parameter_data.set(i + 20);
                    }
                    if resda.get(2 + i) {
                        shifted_parameter_data.set(i + 30);
                    }
                }
                if i > 5 {
                    if resab.get(2 + i) {
                        shifted_parameter_data.set(i - 1);
                    }
                    if resbc.get(2 + i) {
                        shifted_parameter_data.set(i + 10 - 1);
                    }
                    if rescd.get(2 + i) {
                        shifted_parameter_data.set(i + 20 - 1);
                    }
                    if resda.get(2 + i) {
                        shifted_parameter_data.set(i + 30 - 1);
                    }
                }
            }
            for i in 0..40 {
                if shifted_parameter_data.get((i + self.shift * 10) % 40) {
                    parameter_data.set(i);
                }
            }
        }

        self.correct_parameter_data(&mut parameter_data)?;
        self.read_parameters(&parameter_data);
        Ok(())
    }

    fn correct_parameter_data(&self, parameter_data: &mut BitArray) -> Result<()> {
        let (num_codewords, num_data_codewords) = if self.compact { (7, 2) } else { (10, 4) };
        let num_ec_codewords = num_codewords - num_data_codewords;
        let codeword_size = 4;

        let mut parameter_words = vec![0i32; num_codewords];
        for i in 0..num_codewords {
            let mut flag = 1;
            for j in 1..=codeword_size {
                if parameter_data.get(codeword_size * i + codeword_size - j) {
                    parameter_words[i] += flag;
                }
                flag <<= 1;
            }
        }

        let decoder = ReedSolomonDecoder::new(&AZTEC_PARAM);
        decoder.decode(&mut parameter_words, num_ec_codewords)?;

        parameter_data.clear();
        for i in 0..num_data_codewords {
            let mut flag = 1;
            for j in 1..=codeword_size {
                if parameter_words[i] & flag == flag {
                    parameter_data.set(i * codeword_size + codeword_size - j);
                }
                flag <<= 1;
            }
        }
        Ok(())
    }

    fn read_parameters(&mut self, parameter_data: &BitArray) {
        let (nb_bits_for_layers, nb_bits_for_blocks) = if self.compact { (2, 6) } else { (5, 11) };

        let mut nb_layers = 0u32;
        for i in 0..nb_bits_for_layers {
            nb_layers <<= 1;
            if parameter_data.get(i) {
                nb_layers += 1;
            }
        }

        let mut nb_data_blocks = 0u32;
        for i in nb_bits_for_layers..nb_bits_for_layers + nb_bits_for_blocks {
            nb_data_blocks <<= 1;
            if parameter_data.get(i) {
                nb_data_blocks += 1;
            }
        }

        self.nb_layers = nb_layers + 1;
        self.nb_data_blocks = nb_data_blocks + 1;
    }

    fn get_bullseye_corner_points(&mut self, center: Point) -> Result<[Point; 4]> {
        let (mut pina, mut pinb, mut pinc, mut pind) = (center, center, center, center);
        let mut color = true;
        let (mut pouta, mut poutb, mut poutc, mut poutd) = (center, center, center, center);

        self.nb_center_layers = 0;
        for layer in 1..9 {
            self.nb_center_layers = layer;
            pouta = self.get_first_different(pina, color, 1, -1);
            poutb = self.get_first_different(pinb, color, 1, 1);
            poutc = self.get_first_different(pinc, color, -1, 1);
            poutd = self.get_first_different(pind, color, -1, -1);

            if layer > 2 {
                let da_dist = distance(pind, pina);
                if da_dist.abs() < 1e-5 {
                    return Err(Exceptions::not_found("distance between bullseye corners too small"));
                }
                let q = distance(poutd, pouta) * layer as f32 / (da_dist * (layer as f32 + 2.0));
                if !(0.75..=1.25).contains(&q) || !self.is_white_or_black_rectangle(pouta, poutb, poutc, poutd) {
                    break;
                }
            }

            pina = pouta;
            pinb = poutb;
            pinc = poutc;
            pind = poutd;
            color = !color;
        }

        if self.nb_center_layers != 5 && self.nb_center_layers != 7 {
            return Err(Exceptions::not_found("unexpected Aztec bullseye ring count"));
        }
        self.compact = self.nb_center_layers == 5;

        let ratio = 0.75 * 2.0 / (2.0 * self.nb_center_layers as f32 - 3.0);

        let dx = (pina.x - pind.x) as f32;
        let dy = (pina.y - pinc.y) as f32;
        let targetc = Point::new(round(pinc.x as f32 - ratio * dx), round(pinc.y as f32 - ratio * dy));
        let targeta = Point::new(round(pina.x as f32 + ratio * dx), round(pina.y as f32 + ratio * dy));

        let dx = (pinb.x - pind.x) as f32;
        let dy = (pinb.y - pind.y) as f32;
        let targetd = Point::new(round(pind.x as f32 - ratio * dx), round(pind.y as f32 - ratio * dy));
        let targetb = Point::new(round(pinb.x as f32 + ratio * dx), round(pinb.y as f32 + ratio * dy));

        for p in [targeta, targetb, targetc, targetd] {
            if !self.is_valid(p.x, p.y) {
                return Err(Exceptions::not_found("Aztec bullseye extends over image bounds"));
            }
        }

        let _ = (pouta, poutb, poutc, poutd);
        Ok([targeta, targetb, targetc, targetd])
    }

    fn get_matrix_corner_points(&self, bullseye: &[Point; 4]) -> Result<[ResultPoint; 4]> {
        if self.nb_center_layers == 0 {
            return Err(Exceptions::not_found("nb_center_layers is zero"));
        }
        let ratio = (2 * self.nb_layers + if self.nb_layers > 4 { 1 } else { 0 } + (self.nb_layers.saturating_sub(4)) / 8) as f32
            / (2.0 * self.nb_center_layers as f32);

        let mut dx = bullseye[0].x - bullseye[2].x;
        dx += if dx > 0 { 1 } else { -1 };
        let mut dy = bullseye[0].y - bullseye[2].y;
        dy += if dy > 0 { 1 } else { -1 };

        let targetc = Point::new(round(bullseye[2].x as f32 - ratio * dx as f32), round(bullseye[2].y as f32 - ratio * dy as f32));
        let targeta = Point::new(round(bullseye[0].x as f32 + ratio * dx as f32), round(bullseye[0].y as f32 + ratio * dy as f32));

        let mut dx = bullseye[1].x - bullseye[3].x;
        dx += if dx > 0 { 1 } else { -1 };
        let mut dy = bullseye[1].y - bullseye[3].y;
        dy += if dy > 0 { 1 } else { -1 };

        let targetd = Point::new(round(bullseye[3].x as f32 - ratio * dx as f32), round(bullseye[3].y as f32 - ratio * dy as f32));
        let targetb = Point::new(round(bullseye[1].x as f32 + ratio * dx as f32), round(bullseye[1].y as f32 + ratio * dy as f32));

        for p in [targeta, targetb, targetc, targetd] {
            if !self.is_valid(p.x, p.y) {
                return Err(Exceptions::not_found("Aztec matrix extends over image bounds"));
            }
        }

        Ok([targeta.to_result_point(), targetb.to_result_point(), targetc.to_result_point(), targetd.to_result_point()])
    }

    fn get_matrix_center(&self) -> Point {
        let width = self.image.width() as i32;
        let height = self.image.height() as i32;

        let (mut a, mut b, mut c, mut d) = match crate::common::white_rectangle_detector::WhiteRectangleDetector::new(self.image).and_then(|wrd| wrd.detect()) {
            Ok(points) => (points[0], points[1], points[2], points[3]),
            Err(_) => self.fallback_corners(width / 2, height / 2),
        };

        let mut cx = round((a.x + b.x + c.x + d.x) / 4.0);
        let mut cy = round((a.y + b.y + c.y + d.y) / 4.0);

        match crate::common::white_rectangle_detector::WhiteRectangleDetector::new_at(self.image, 15, cx, cy).and_then(|wrd| wrd.detect()) {
            Ok(points) => {
                a = points[0];
                b = points[1];
                c = points[2];
                d = points[3];
            }
            Err(_) => {
                let (a2, b2, c2, d2) = self.fallback_corners(cx, cy);
                a = a2;
                b = b2;
                c = c2;
                d = d2;
            }
        }

        cx = round((a.x + b.x + c.x + d.x) / 4.0);
        cy = round((a.y + b.y + c.y + d.y) / 4.0);
        Point::new(cx, cy)
    }

    fn fallback_corners(&self, cx: i32, cy: i32) -> (ResultPoint, ResultPoint, ResultPoint, ResultPoint) {
        let a = self.get_first_different(Point::new(cx + 7, cy - 7), false, 1, -1).to_result_point();
        let b = self.get_first_different(Point::new(cx + 7, cy + 7), false, 1, 1).to_result_point();
        let c = self.get_first_different(Point::new(cx - 7, cy + 7), false, -1, 1).to_result_point();
        let d = self.get_first_different(Point::new(cx - 7, cy - 7), false, -1, -1).to_result_point();
        (a, b, c, d)
    }

    fn sample_line(&self, p1: Point, p2: Point, size: usize) -> BitArray {
        let mut res = BitArray::with_size(size);
        let d = distance(p1, p2);
        let module_size = d / (size - 1) as f32;
        let dx = module_size * (p2.x - p1.x) as f32 / d;
        let dy = module_size * (p2.y - p1.y) as f32 / d;

        let mut px = p1.x as f32;
        let mut py = p1.y as f32;
        for i in 0..size {
            if self.image.get(round(px) as u32, round(py) as u32).unwrap_or(false) {
                res.set(i);
            }
            px += dx;
            py += dy;
        }
        res
    }

    fn is_white_or_black_rectangle(&self, p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
        let corr = 3;
        let p1 = Point::new(p1.x - corr, p1.y + corr);
        let p2 = Point::new(p2.x - corr, p2.y - corr);
        let p3 = Point::new(p3.x + corr, p3.y - corr);
        let p4 = Point::new(p4.x + corr, p4.y + corr);

        let c_init = self.get_color(p4, p1);
        if c_init == 0 {
            return false;
        }
        self.get_color(p1, p2) == c_init && self.get_color(p2, p3) == c_init && self.get_color(p3, p4) == c_init
    }

    fn get_color(&self, p1: Point, p2: Point) -> i32 {
        let d = distance(p1, p2);
        if d.abs() < 1e-5 {
            return 0;
        }
        let dx = (p2.x - p1.x) as f32 / d;
        let dy = (p2.y - p1.y) as f32 / d;

        let color_model = self.image.get(p1.x as u32, p1.y as u32).unwrap_or(false);
        let mut px = p1.x as f32;
        let mut py = p1.y as f32;
        let mut error = 0;
        let int_d = d as i32;
        for _ in 0..int_d {
            px += dx;
            py += dy;
            if self.image.get(round(px) as u32, round(py) as u32).unwrap_or(!color_model) != color_model {
                error += 1;
            }
        }

        let err_ratio = error as f32 / d;
        if (0.1..0.9).contains(&err_ratio) {
            0
        } else if err_ratio <= 0.1 {
            if color_model {
                1
            } else {
                -1
            }
        } else if color_model {
            -1
        } else {
            1
        }
    }

    fn get_first_different(&self, init: Point, color: bool, dx: i32, dy: i32) -> Point {
        let mut x = init.x + dx;
        let mut y = init.y + dy;
        while self.is_valid(x, y) && self.image.get(x as u32, y as u32).unwrap_or(!color) == color {
            x += dx;
            y += dy;
        }
        x -= dx;
        y -= dy;

        while self.is_valid(x, y) && self.image.get(x as u32, y as u32).unwrap_or(!color) == color {
            x += dx;
        }
        x -= dx;

        while self.is_valid(x, y) && self.image.get(x as u32, y as u32).unwrap_or(!color) == color {
            y += dy;
        }
        y -= dy;

        Point::new(x, y)
    }

    fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.image.width() as i32 && y >= 0 && y < self.image.height() as i32
    }
}

fn distance(a: Point, b: Point) -> f32 {
    (((a.x - b.x) * (a.x - b.x) + (a.y - b.y) * (a.y - b.y)) as f32).sqrt()
}

fn round(v: f32) -> i32 {
    v.round() as i32
}
