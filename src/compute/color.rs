//! Display colors derived from genome and energy.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::codec::{MAX_ENERGY, decode};

/// One displayed pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`.
    pub fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Convert HSV to RGB.
///
/// `hue` in degrees (taken modulo 360), `saturation` and `value` in 0..=255.
pub fn hsv_to_rgb(hue: u32, saturation: u8, value: u8) -> Rgb {
    let h = (hue % 360) as f32;
    let s = saturation as f32 / 255.0;
    let v = value as f32;

    let sector = (h / 60.0).floor();
    let f = h / 60.0 - sector;
    let p = (v * (1.0 - s)) as u8;
    let q = (v * (1.0 - s * f)) as u8;
    let t = (v * (1.0 - s * (1.0 - f))) as u8;
    let v = value;

    match sector as u32 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

/// Target color for a cell word: hue from the genome, brightness fading as
/// energy is spent. Dead cells are black.
pub fn target_color(word: u32) -> Rgb {
    let (energy, genome) = decode(word);
    if genome == 0 {
        return Rgb::BLACK;
    }
    hsv_to_rgb(genome % 360, u8::MAX, (MAX_ENERGY - energy) as u8)
}

/// Move `current` toward `target`, at most `fade_in` per channel when
/// brightening and `fade_out` when dimming.
pub fn fade_toward(current: Rgb, target: Rgb, fade_in: u8, fade_out: u8) -> Rgb {
    let channel = |c: u8, t: u8| -> u8 {
        let (c, t) = (c as i32, t as i32);
        t.min(c + fade_in as i32).max(c - fade_out as i32).clamp(0, 255) as u8
    };
    Rgb {
        r: channel(current.r, target.r),
        g: channel(current.g, target.g),
        b: channel(current.b, target.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::codec::encode;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsv_to_rgb(0, 255, 255), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(120, 255, 255), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240, 255, 255), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(360, 255, 255), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        assert_eq!(hsv_to_rgb(200, 0, 128), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_dead_cell_is_black() {
        assert_eq!(target_color(0), Rgb::BLACK);
    }

    #[test]
    fn test_energy_dims_color() {
        let genome = 120 + 360;
        assert_eq!(target_color(encode(0, genome)), Rgb::new(0, 255, 0));
        assert_eq!(target_color(encode(155, genome)), Rgb::new(0, 100, 0));
        assert_eq!(target_color(encode(255, genome)), Rgb::BLACK);
    }

    #[test]
    fn test_fade_rates_asymmetric() {
        let black = Rgb::BLACK;
        let white = Rgb::new(255, 255, 255);

        let up = fade_toward(black, white, 6, 2);
        assert_eq!(up, Rgb::new(6, 6, 6));

        let down = fade_toward(white, black, 6, 2);
        assert_eq!(down, Rgb::new(253, 253, 253));
    }

    #[test]
    fn test_fade_does_not_overshoot() {
        let current = Rgb::new(100, 100, 100);
        let target = Rgb::new(103, 98, 100);
        assert_eq!(fade_toward(current, target, 255, 255), target);
        assert_eq!(fade_toward(current, target, 2, 1), Rgb::new(102, 99, 100));
    }

    #[test]
    fn test_packed() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_packed(), 0x123456);
    }
}
