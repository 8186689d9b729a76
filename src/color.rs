//! Maps a pitch onto a visible-light color.
//!
//! The audible range is stretched linearly over the visible band of light
//! frequencies (420 THz to 780 THz), converted to a wavelength, and the
//! wavelength is rendered with a piecewise-linear spectrum. The mapping is an
//! aesthetic one: pitches up to roughly 20 kHz land inside the visible range,
//! anything above fades to black.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

const SPEED_OF_LIGHT_NM: f64 = 299_792_458e9;
const LIGHT_FREQUENCY_LOW: f64 = 420e12;
const LIGHT_FREQUENCY_HIGH: f64 = 780e12;
const AUDIO_SPAN: f64 = 20e3;

const GAMMA: f64 = 0.8;
const INTENSITY_MAX: f64 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ColorRgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Text color that stays readable on top of a [`ColorRgb`] background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    Black,
    White,
}

impl ColorRgb {
    pub const BLACK: ColorRgb = ColorRgb::new(0, 0, 0);
    pub const WHITE: ColorRgb = ColorRgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        ColorRgb { red, green, blue }
    }

    /// CSS functional notation, e.g. `rgb(255,0,0)`.
    pub fn css(&self) -> String {
        self.to_string()
    }

    /// Perceived brightness on a 0-255 scale (ITU-R BT.601 weights).
    pub fn brightness(&self) -> u8 {
        let weighted =
            299 * u32::from(self.red) + 587 * u32::from(self.green) + 114 * u32::from(self.blue);
        ((weighted as f64 / 1000.0).round()) as u8
    }

    pub fn contrast(&self) -> Contrast {
        if self.brightness() > 125 {
            Contrast::Black
        } else {
            Contrast::White
        }
    }
}

impl fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contrast::Black => write!(f, "black"),
            Contrast::White => write!(f, "white"),
        }
    }
}

/// Wavelength in nanometres (rounded to the nearest integer) that the pitch
/// `frequency` and its `note` number map to.
pub fn light_wavelength(frequency: f64, note: i32) -> Result<f64> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(Error::invalid(
            "frequency",
            frequency,
            "frequency must be finite and positive",
        ));
    }
    let light_frequency = ((frequency + note as f64) / AUDIO_SPAN)
        * (LIGHT_FREQUENCY_HIGH - LIGHT_FREQUENCY_LOW)
        + LIGHT_FREQUENCY_LOW;
    Ok((SPEED_OF_LIGHT_NM / light_frequency).round())
}

/// Color for a detected pitch.
///
/// ```
/// use pitchdetect::color::{frequency_to_color, ColorRgb};
///
/// // A4 lands deep in the red end of the spectrum.
/// let color = frequency_to_color(440.0, 69).unwrap();
/// assert_eq!(color, ColorRgb::new(196, 0, 0));
/// ```
pub fn frequency_to_color(frequency: f64, note: i32) -> Result<ColorRgb> {
    Ok(wavelength_to_rgb(light_wavelength(frequency, note)?))
}

/// Raw channel weights for each band. Every band is half-open; `[380, 781)`
/// is covered exactly once.
fn spectrum_weights(wavelength: f64) -> (f64, f64, f64) {
    match wavelength {
        w if (380.0..440.0).contains(&w) => (-(w - 440.0) / (440.0 - 380.0), 0.0, 0.9),
        w if (440.0..490.0).contains(&w) => (0.0, (w - 440.0) / (490.0 - 430.0), 0.75),
        w if (490.0..510.0).contains(&w) => (0.0, 0.85, -(w - 510.0) / (510.0 - 490.0)),
        w if (510.0..580.0).contains(&w) => ((w - 510.0) / (580.0 - 510.0), 0.85, 0.0),
        w if (580.0..645.0).contains(&w) => (1.0, -(w - 645.0) / (645.0 - 573.0), 0.0),
        w if (645.0..781.0).contains(&w) => (1.0, 0.0, 0.0),
        _ => (0.0, 0.0, 0.0),
    }
}

/// Intensity roll-off near the limits of vision.
fn intensity_factor(wavelength: f64) -> f64 {
    match wavelength {
        w if (380.0..420.0).contains(&w) => 0.15 + 0.7 * (w - 380.0) / (420.0 - 380.0),
        w if (420.0..645.0).contains(&w) => 1.0,
        w if (645.0..781.0).contains(&w) => 0.3 + 0.7 * (780.0 - w) / (780.0 - 645.0),
        _ => 0.0,
    }
}

fn gamma_correct(weight: f64, factor: f64) -> u8 {
    if weight == 0.0 {
        return 0;
    }
    (INTENSITY_MAX * (weight * factor).powf(GAMMA))
        .round()
        .clamp(0.0, INTENSITY_MAX) as u8
}

/// Render a wavelength in nanometres. Wavelengths outside `[380, 781)` are black.
pub fn wavelength_to_rgb(wavelength: f64) -> ColorRgb {
    let (red, green, blue) = spectrum_weights(wavelength);
    let factor = intensity_factor(wavelength);
    ColorRgb {
        red: gamma_correct(red, factor),
        green: gamma_correct(green, factor),
        blue: gamma_correct(blue, factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_red_at_650() {
        let color = wavelength_to_rgb(650.0);
        assert!(color.red > 200);
        assert_eq!(color.green, 0);
        assert_eq!(color.blue, 0);
    }

    #[test]
    fn blue_dominant_at_450() {
        let color = wavelength_to_rgb(450.0);
        assert_eq!(color.red, 0);
        assert!(color.blue > color.green);
        assert_eq!(color, ColorRgb::new(0, 61, 203));
    }

    #[test]
    fn band_edge_uses_upper_band() {
        // 440 belongs to [440, 490): blue weight 0.75, not the 0.9 of the band below.
        let at_edge = wavelength_to_rgb(440.0);
        assert_eq!(at_edge, ColorRgb::new(0, 0, 203));

        let below = wavelength_to_rgb(439.0);
        assert_eq!(below.blue, 234);
        assert!(below.red > 0);
    }

    #[test]
    fn edges_belong_to_the_band_above() {
        // Each edge takes the upper band's formula evaluated at its start.
        assert_eq!(spectrum_weights(490.0), (0.0, 0.85, 1.0));
        assert_eq!(spectrum_weights(510.0), (0.0, 0.85, 0.0));
        assert_eq!(spectrum_weights(580.0), (1.0, 65.0 / 72.0, 0.0));
        assert_eq!(spectrum_weights(645.0), (1.0, 0.0, 0.0));
        assert_eq!(intensity_factor(420.0), 1.0);
        assert_eq!(intensity_factor(645.0), 1.0);
    }

    #[test]
    fn outside_visible_range_is_black() {
        assert_eq!(wavelength_to_rgb(379.0), ColorRgb::BLACK);
        assert_eq!(wavelength_to_rgb(781.0), ColorRgb::BLACK);
        assert_eq!(wavelength_to_rgb(1200.0), ColorRgb::BLACK);
    }

    #[test]
    fn a4_maps_to_red() {
        assert_eq!(light_wavelength(440.0, 69).unwrap(), 699.0);
        assert_eq!(frequency_to_color(440.0, 69).unwrap(), ColorRgb::new(196, 0, 0));
    }

    #[test]
    fn high_pitches_climb_the_spectrum() {
        assert_eq!(light_wavelength(4000.0, 107).unwrap(), 607.0);
        assert_eq!(frequency_to_color(4000.0, 107).unwrap(), ColorRgb::new(255, 153, 0));
    }

    #[test]
    fn ultrasonic_fades_to_black() {
        assert_eq!(frequency_to_color(40_000.0, 200).unwrap(), ColorRgb::BLACK);
    }

    #[test]
    fn color_is_deterministic() {
        let first = frequency_to_color(329.63, 64).unwrap();
        let second = frequency_to_color(329.63, 64).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_invalid_frequency() {
        assert!(frequency_to_color(0.0, 69).is_err());
        assert!(frequency_to_color(-5.0, 69).is_err());
        assert!(frequency_to_color(f64::NAN, 69).is_err());
    }

    #[test]
    fn css_and_contrast() {
        let red = ColorRgb::new(255, 0, 0);
        assert_eq!(red.css(), "rgb(255,0,0)");
        assert_eq!(red.contrast(), Contrast::White);
        assert_eq!(ColorRgb::WHITE.contrast(), Contrast::Black);
        assert_eq!(ColorRgb::BLACK.contrast(), Contrast::White);
        assert_eq!(ColorRgb::new(0, 255, 0).contrast(), Contrast::Black);
    }
}
