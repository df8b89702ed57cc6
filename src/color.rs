//! Photometric derivations from raw channel counts
//!
//! Everything in here is pure: no bus traffic and no delays. The driver calls
//! these after an acquisition, and they can equally be applied to a
//! [`RawSample`] obtained elsewhere.

use core::fmt;

use crate::RawSample;

/// Normalized colour with each channel in 0-255
///
/// This is the canonical form returned by the driver. The packed integer,
/// hex string and triple encodings are adapters over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black, also what an absent sensor reads as
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a colour from its three channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0xRRGGBB`
    pub const fn to_packed(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Ordered `[r, g, b]` triple
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// `#RRGGBB` with upper-case hex digits
    pub fn to_hex(self) -> heapless::String<7> {
        use core::fmt::Write;

        let mut hex = heapless::String::new();
        // Seven bytes always fit.
        let _ = write!(hex, "{self}");
        hex
    }
}

impl From<u32> for Rgb {
    /// Unpack `0xRRGGBB`, ignoring the top byte
    fn from(packed: u32) -> Self {
        Self::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }
}

impl From<Rgb> for u32 {
    fn from(rgb: Rgb) -> Self {
        rgb.to_packed()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> Self {
        rgb.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Reference colours used for nearest-colour classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ColorName {
    /// 0, 0, 0
    Black = 0,
    /// 255, 255, 255
    White = 1,
    /// 255, 0, 0
    Red = 2,
    /// 0, 255, 0
    Green = 3,
    /// 0, 0, 255
    Blue = 4,
    /// 255, 255, 0
    Yellow = 5,
    /// 0, 255, 255
    Cyan = 6,
    /// 255, 0, 255
    Magenta = 7,
    /// 255, 165, 0
    Orange = 8,
    /// 128, 0, 128
    Purple = 9,
    /// 165, 42, 42
    Brown = 10,
    /// 128, 128, 128
    Gray = 11,
    /// 192, 192, 192
    LightGray = 12,
    /// 139, 0, 0
    DarkRed = 13,
    /// 0, 100, 0
    DarkGreen = 14,
    /// 0, 0, 139
    DarkBlue = 15,
}

impl ColorName {
    /// Palette in classification order. Earlier entries win ties.
    pub const PALETTE: [(ColorName, Rgb); 16] = [
        (ColorName::Black, Rgb::new(0, 0, 0)),
        (ColorName::White, Rgb::new(255, 255, 255)),
        (ColorName::Red, Rgb::new(255, 0, 0)),
        (ColorName::Green, Rgb::new(0, 255, 0)),
        (ColorName::Blue, Rgb::new(0, 0, 255)),
        (ColorName::Yellow, Rgb::new(255, 255, 0)),
        (ColorName::Cyan, Rgb::new(0, 255, 255)),
        (ColorName::Magenta, Rgb::new(255, 0, 255)),
        (ColorName::Orange, Rgb::new(255, 165, 0)),
        (ColorName::Purple, Rgb::new(128, 0, 128)),
        (ColorName::Brown, Rgb::new(165, 42, 42)),
        (ColorName::Gray, Rgb::new(128, 128, 128)),
        (ColorName::LightGray, Rgb::new(192, 192, 192)),
        (ColorName::DarkRed, Rgb::new(139, 0, 0)),
        (ColorName::DarkGreen, Rgb::new(0, 100, 0)),
        (ColorName::DarkBlue, Rgb::new(0, 0, 139)),
    ];

    /// Reference value of this colour
    pub const fn rgb(self) -> Rgb {
        Self::PALETTE[self as usize].1
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            ColorName::Black => "Black",
            ColorName::White => "White",
            ColorName::Red => "Red",
            ColorName::Green => "Green",
            ColorName::Blue => "Blue",
            ColorName::Yellow => "Yellow",
            ColorName::Cyan => "Cyan",
            ColorName::Magenta => "Magenta",
            ColorName::Orange => "Orange",
            ColorName::Purple => "Purple",
            ColorName::Brown => "Brown",
            ColorName::Gray => "Gray",
            ColorName::LightGray => "Light Gray",
            ColorName::DarkRed => "Dark Red",
            ColorName::DarkGreen => "Dark Green",
            ColorName::DarkBlue => "Dark Blue",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Scale the colour channels against the clear channel into 0-255.
///
/// A zero clear channel gives black. That covers both darkness and a
/// saturated-to-zero reading, which cannot be told apart here.
pub fn normalize(sample: &RawSample) -> Rgb {
    if sample.clear == 0 {
        return Rgb::BLACK;
    }

    let scale = 255.0 / f64::from(sample.clear);
    let channel = |value: u16| libm::round(f64::from(value) * scale).clamp(0.0, 255.0) as u8;

    Rgb::new(
        channel(sample.red),
        channel(sample.green),
        channel(sample.blue),
    )
}

/// Closest palette entry by squared Euclidean distance in RGB space
pub fn nearest_color(rgb: Rgb) -> ColorName {
    let mut closest = ColorName::Black;
    let mut min_distance = u32::MAX;

    for (name, reference) in ColorName::PALETTE {
        let distance = squared_distance(rgb, reference);
        // Strict comparison keeps the first of equally close entries.
        if distance < min_distance {
            min_distance = distance;
            closest = name;
        }
    }

    closest
}

fn squared_distance(a: Rgb, b: Rgb) -> u32 {
    let dr = i32::from(a.r) - i32::from(b.r);
    let dg = i32::from(a.g) - i32::from(b.g);
    let db = i32::from(a.b) - i32::from(b.b);
    (dr * dr + dg * dg + db * db) as u32
}

/// CIE XYZ tristimulus estimate from raw red, green and blue counts
pub fn tristimulus(red: u16, green: u16, blue: u16) -> (f64, f64, f64) {
    let (r, g, b) = (f64::from(red), f64::from(green), f64::from(blue));

    let x = -0.14282 * r + 1.54924 * g - 0.95641 * b;
    let y = luminance(r, g, b);
    let z = -0.68202 * r + 0.77073 * g + 0.56332 * b;

    (x, y, z)
}

fn luminance(r: f64, g: f64, b: f64) -> f64 {
    -0.32466 * r + 1.57837 * g - 0.73191 * b
}

/// Upper end of the colour temperatures the approximation is trusted for
const MAX_CCT_KELVIN: f64 = 100_000.0;

/// Correlated colour temperature in Kelvin using McCamy's approximation.
///
/// Returns 0 for an all-zero sample, a zero tristimulus sum, or a
/// chromaticity at or near the pole of the approximation (anything above
/// 100 000 K).
pub fn color_temperature(sample: &RawSample) -> u32 {
    if sample.red == 0 && sample.green == 0 && sample.blue == 0 {
        return 0;
    }

    let (x, y, z) = tristimulus(sample.red, sample.green, sample.blue);
    temperature_from_tristimulus(x, y, z)
}

fn temperature_from_tristimulus(x: f64, y: f64, z: f64) -> u32 {
    let sum = x + y + z;
    if sum == 0.0 {
        return 0;
    }

    mccamy(x / sum, y / sum)
}

fn mccamy(xc: f64, yc: f64) -> u32 {
    let n = (xc - 0.3320) / (0.1858 - yc);
    let cct = 449.0 * libm::pow(n, 3.0) + 3525.0 * libm::pow(n, 2.0) + 6823.3 * n + 5520.33;

    if !cct.is_finite() || cct > MAX_CCT_KELVIN {
        return 0;
    }

    libm::round(cct.max(0.0)) as u32
}

/// Illuminance in lux, never negative
pub fn illuminance(sample: &RawSample) -> u32 {
    let lux = luminance(
        f64::from(sample.red),
        f64::from(sample.green),
        f64::from(sample.blue),
    );
    libm::round(lux.max(0.0)) as u32
}
