/// Template matching implementation
///
/// Zero-mean normalized cross-correlation of a single template against a grayscale
/// capture. The template/window cross term for every placement comes from one FFT
/// correlation; window sums come from summed-area tables. The best placements are then
/// rescored with exact integer arithmetic.
use super::template::Template;
use super::types::MatchCandidate;
use crate::screen::{ClickerError, ClickerResult};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::find_extremes;
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// One score per template placement, indexed by the placement's top-left corner.
pub type CorrelationMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Placements within this distance of the map maximum are rescored exactly.
const REFINE_MARGIN: f32 = 1e-3;
/// Upper bound on exact rescoring per capture (repetitive screens can tie widely).
const REFINE_LIMIT: usize = 1024;

/// Matches one immutable template against captures
#[derive(Clone)]
pub struct TemplateMatcher {
    template: Arc<Template>,
}

impl TemplateMatcher {
    pub fn new(template: Arc<Template>) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Score every placement of the template inside `capture`.
    ///
    /// Fails with `InvalidTemplateSize` when the template does not fit. Scores are
    /// within floating-point rounding of the exact coefficient.
    pub fn correlation_map(&self, capture: &GrayImage) -> ClickerResult<CorrelationMap> {
        self.score_all(capture).map(|(map, _)| map)
    }

    /// Highest-scoring placement in `capture`.
    ///
    /// Among equal maxima the first in row-major order is returned; callers must not
    /// rely on which of several tied placements wins. The returned score is exact, so an
    /// exact copy of the template scores 1.0.
    pub fn best_match(&self, capture: &GrayImage) -> ClickerResult<MatchCandidate> {
        let (map, tables) = self.score_all(capture)?;
        let coarse = best_in_map(&map);
        if coarse.score <= 0.0 {
            return Ok(coarse);
        }

        let tpl = self.template.as_ref();
        let floor = coarse.score - REFINE_MARGIN;
        let mut best = MatchCandidate::new(
            coarse.x,
            coarse.y,
            exact_score(capture, tpl, &tables, coarse.x, coarse.y),
        );
        for (x, y, _) in map
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] >= floor)
            .take(REFINE_LIMIT)
        {
            let score = exact_score(capture, tpl, &tables, x, y);
            if score > best.score {
                best = MatchCandidate::new(x, y, score);
            }
        }
        Ok(best)
    }

    fn score_all(&self, capture: &GrayImage) -> ClickerResult<(CorrelationMap, SummedArea)> {
        let tpl = self.template.as_ref();
        let (tw, th) = (tpl.width(), tpl.height());
        let (cw, ch) = (capture.width(), capture.height());

        if tw > cw || th > ch {
            return Err(ClickerError::InvalidTemplateSize {
                template_width: tw,
                template_height: th,
                capture_width: cw,
                capture_height: ch,
            });
        }

        let map_width = cw - tw + 1;
        let map_height = ch - th + 1;
        log::debug!(
            "🔍 Correlating {}x{} template over {}x{} capture ({} placements)",
            tw,
            th,
            cw,
            ch,
            map_width as u64 * map_height as u64
        );

        let tables = SummedArea::new(capture);
        let mut map = CorrelationMap::new(map_width, map_height);
        if tpl.variance_term() == 0 {
            return Ok((map, tables));
        }

        let cross = cross_correlation(capture, tpl);
        let stride = cw as usize;
        map.par_chunks_mut(map_width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, score) in row.iter_mut().enumerate() {
                    let (sum_i, sum_i2) = tables.window(x, y, tw as usize, th as usize);
                    *score = normalize(tpl, sum_i, sum_i2, cross[y * stride + x]);
                }
            });

        Ok((map, tables))
    }
}

/// Location and value of the maximum of a correlation map.
pub fn best_in_map(map: &CorrelationMap) -> MatchCandidate {
    let extremes = find_extremes(map);
    let (x, y) = extremes.max_value_location;
    MatchCandidate::new(x, y, extremes.max_value)
}

/// `Σ (t - mean_t) * i` for every placement, indexed like the capture (`y * width + x`).
///
/// Computed as a circular correlation at the capture's own size: placements that fit
/// never wrap, so no padding is needed. Subtracting the capture mean does not change the
/// result (the zero-mean template sums to zero) and keeps the transforms small.
fn cross_correlation(capture: &GrayImage, tpl: &Template) -> Vec<f64> {
    let (width, height) = (capture.width() as usize, capture.height() as usize);
    let len = width * height;
    let tpl_mean = tpl.pixel_sum() as f64 / tpl.pixel_count() as f64;
    let cap_mean = capture.as_raw().iter().map(|&p| p as u64).sum::<u64>() as f64 / len as f64;

    let mut image: Vec<Complex<f64>> = capture
        .as_raw()
        .iter()
        .map(|&p| Complex::new(p as f64 - cap_mean, 0.0))
        .collect();

    let tw = tpl.width() as usize;
    let mut kernel = vec![Complex::new(0.0, 0.0); len];
    for (ty, row) in tpl.gray().as_raw().chunks_exact(tw).enumerate() {
        for (tx, &p) in row.iter().enumerate() {
            kernel[ty * width + tx] = Complex::new(p as f64 - tpl_mean, 0.0);
        }
    }

    let mut planner = FftPlanner::<f64>::new();
    fft_2d(&mut planner, &mut image, width, height, FftDirection::Forward);
    fft_2d(&mut planner, &mut kernel, width, height, FftDirection::Forward);
    image
        .par_iter_mut()
        .zip(kernel.par_iter())
        .for_each(|(i, k)| *i *= k.conj());
    fft_2d(&mut planner, &mut image, width, height, FftDirection::Inverse);

    let scale = 1.0 / len as f64;
    image.into_iter().map(|c| c.re * scale).collect()
}

/// In-place 2-D transform of a row-major `width x height` buffer (unnormalized).
fn fft_2d(
    planner: &mut FftPlanner<f64>,
    data: &mut [Complex<f64>],
    width: usize,
    height: usize,
    direction: FftDirection,
) {
    let row_fft = planner.plan_fft(width, direction);
    data.par_chunks_mut(width)
        .for_each(|row| row_fft.process(row));

    let mut columns = vec![Complex::new(0.0, 0.0); data.len()];
    transpose(data, &mut columns, width, height);
    let col_fft = planner.plan_fft(height, direction);
    columns
        .par_chunks_mut(height)
        .for_each(|col| col_fft.process(col));
    transpose(&columns, data, height, width);
}

/// `src` is `width x height` row-major; `dst` receives the `height x width` transpose.
fn transpose(src: &[Complex<f64>], dst: &mut [Complex<f64>], width: usize, height: usize) {
    for (y, row) in src.chunks_exact(width).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            dst[x * height + y] = v;
        }
    }
}

/// Summed-area tables of pixel values and squared pixel values, `(w+1) x (h+1)`.
struct SummedArea {
    stride: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl SummedArea {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (h + 1)];
        let mut squares = vec![0u64; stride * (h + 1)];

        for (y, row) in image.as_raw().chunks_exact(w).enumerate() {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for (x, &p) in row.iter().enumerate() {
                let v = p as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sums[idx] = sums[idx - stride] + row_sum;
                squares[idx] = squares[idx - stride] + row_sq;
            }
        }

        Self {
            stride,
            sums,
            squares,
        }
    }

    /// `(Σi, Σi²)` over the window with top-left `(x, y)` and size `w x h`.
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (u64, u64) {
        let a = y * self.stride + x;
        let b = y * self.stride + x + w;
        let c = (y + h) * self.stride + x;
        let d = (y + h) * self.stride + x + w;
        (
            self.sums[d] + self.sums[a] - self.sums[b] - self.sums[c],
            self.squares[d] + self.squares[a] - self.squares[b] - self.squares[c],
        )
    }
}

/// `n * Σi² - (Σi)²` for a window, exact.
fn window_variance(tpl: &Template, sum_i: u64, sum_i2: u64) -> i128 {
    let n = tpl.pixel_count() as i128;
    n * sum_i2 as i128 - (sum_i as i128) * (sum_i as i128)
}

/// Coefficient from the FFT cross term. A flat window or flat template scores 0.
fn normalize(tpl: &Template, sum_i: u64, sum_i2: u64, cross: f64) -> f32 {
    let var_t = tpl.variance_term();
    let var_i = window_variance(tpl, sum_i, sum_i2);
    if var_t == 0 || var_i <= 0 {
        return 0.0;
    }
    let numerator = tpl.pixel_count() as f64 * cross;
    let score = numerator / ((var_t as f64).sqrt() * (var_i as f64).sqrt());
    score.clamp(-1.0, 1.0) as f32
}

/// Coefficient of the template placed at `(x, y)` with a direct dot product.
///
/// Everything but the final division is integer arithmetic, so an exact copy of the
/// template scores exactly 1.0.
fn exact_score(capture: &GrayImage, tpl: &Template, tables: &SummedArea, x: u32, y: u32) -> f32 {
    let (tw, th) = (tpl.width() as usize, tpl.height() as usize);
    let var_t = tpl.variance_term();
    let (sum_i, sum_i2) = tables.window(x as usize, y as usize, tw, th);
    let var_i = window_variance(tpl, sum_i, sum_i2);
    if var_t == 0 || var_i <= 0 {
        return 0.0;
    }

    let cap_stride = capture.width() as usize;
    let cap = capture.as_raw();
    let mut dot = 0u64;
    for (ty, tpl_row) in tpl.gray().as_raw().chunks_exact(tw).enumerate() {
        let start = (y as usize + ty) * cap_stride + x as usize;
        let cap_row = &cap[start..start + tw];
        dot += tpl_row
            .iter()
            .zip(cap_row)
            .map(|(&t, &i)| t as u64 * i as u64)
            .sum::<u64>();
    }

    let n = tpl.pixel_count() as i128;
    let numerator = n * dot as i128 - tpl.pixel_sum() as i128 * sum_i as i128;
    let score = numerator as f64 / ((var_t as f64).sqrt() * (var_i as f64).sqrt());
    score.clamp(-1.0, 1.0) as f32
}
