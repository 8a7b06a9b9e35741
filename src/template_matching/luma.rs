//! Color to grayscale conversion shared by the template and every capture.
//!
//! Rec.601 weights (0.299, 0.587, 0.114) in 14-bit fixed point, rounded. Gray input
//! (R == G == B) maps to itself. Alpha is ignored.

use image::{GrayImage, Luma, RgbaImage};

const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = R_WEIGHT * r as u32 + G_WEIGHT * g as u32 + B_WEIGHT * b as u32 + (1 << (SHIFT - 1));
    (y >> SHIFT) as u8
}

pub fn rgba_to_gray(image: &RgbaImage) -> GrayImage {
    let mut gray = GrayImage::new(image.width(), image.height());
    for (dst, src) in gray.pixels_mut().zip(image.pixels()) {
        let [r, g, b, _] = src.0;
        *dst = Luma([luma(r, g, b)]);
    }
    gray
}
