use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};

use crate::grid::{Color, ColorGrid, PixelGrid, BLACK};

/// Maps an iteration count to a color. Points that reached `max_iterations`
/// are in the set and must come out black; nothing else may.
pub trait ColorScale: Send + Sync {
    fn color(&self, iterations: u32, max_iterations: u32) -> Color;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Rainbow;

#[derive(Copy, Clone, Debug, Default)]
pub struct Greyscale;

const RAINBOW: [[u8; 3]; 10] = [
    [0xbe, 0x0a, 0xff],
    [0x58, 0x0a, 0xff],
    [0x14, 0x7d, 0xf5],
    [0x0a, 0xef, 0xff],
    [0x0a, 0xff, 0x99],
    [0xa1, 0xff, 0x0a],
    [0xde, 0xff, 0x0a],
    [0xff, 0xd3, 0x00],
    [0xff, 0x87, 0x00],
    [0xff, 0x00, 0x00],
];

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let af = a as f64;
    let bf = b as f64;
    let m = af * (1.0 - frac) + bf * frac;
    f64::round(m) as u8
}

impl ColorScale for Rainbow {
    fn color(&self, iterations: u32, max_iterations: u32) -> Color {
        if iterations >= max_iterations {
            return BLACK;
        }
        // pos < 9, so both stops exist
        let pos = 9.0 * iterations as f64 / max_iterations as f64;
        let n = pos.floor() as usize;
        let frac = pos - n as f64;
        let rgb1 = RAINBOW[n];
        let rgb2 = RAINBOW[n + 1];
        Rgb([
            mix(rgb1[0], rgb2[0], frac),
            mix(rgb1[1], rgb2[1], frac),
            mix(rgb1[2], rgb2[2], frac),
        ])
    }
}

impl ColorScale for Greyscale {
    fn color(&self, iterations: u32, max_iterations: u32) -> Color {
        if iterations >= max_iterations {
            return BLACK;
        }
        // brightest at 0 iterations, never darker than 32
        let frac = iterations as f64 / max_iterations as f64;
        let v = 255 - (frac * 223.0).round() as u8;
        Rgb([v, v, v])
    }
}

/// Palette selectable at runtime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    #[default]
    Rainbow,
    Greyscale,
}

impl ColorScale for Palette {
    fn color(&self, iterations: u32, max_iterations: u32) -> Color {
        match self {
            Palette::Rainbow => Rainbow.color(iterations, max_iterations),
            Palette::Greyscale => Greyscale.color(iterations, max_iterations),
        }
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rainbow" => Ok(Palette::Rainbow),
            "greyscale" | "grayscale" | "grey" | "gray" => Ok(Palette::Greyscale),
            other => Err(format!("unknown palette '{}'", other)),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Palette::Rainbow => write!(f, "rainbow"),
            Palette::Greyscale => write!(f, "greyscale"),
        }
    }
}

/// Default color mapping used by the renderer.
pub fn to_color(iterations: u32, max_iterations: u32) -> Color {
    Rainbow.color(iterations, max_iterations)
}

/// Recolors a grid of raw iteration counts.
pub fn paint<S: ColorScale + ?Sized>(pixels: &PixelGrid, max_iterations: u32, scale: &S) -> ColorGrid {
    pixels.map(|&i| scale.color(i, max_iterations))
}

pub fn to_image(colors: &ColorGrid) -> RgbImage {
    let (rows, cols) = colors.dim();
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        colors[[y as usize, x as usize]]
    })
}
