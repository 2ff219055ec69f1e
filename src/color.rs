use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Named palettes
// ---------------------------------------------------------------------------

// Ordered from the low end (-1) to the high end (+1) of the scale.
const PIYG_11: [u32; 11] = [
    0x276419, 0x4d9221, 0x7fbc41, 0xb8e186, 0xe6f5d0, 0xf7f7f7, 0xfde0ef, 0xf1b6da, 0xde77ae,
    0xc51b7d, 0x8e0152,
];
const RDBU_11: [u32; 11] = [
    0x053061, 0x2166ac, 0x4393c3, 0x92c5de, 0xd1e5f0, 0xf7f7f7, 0xfddbc7, 0xf4a582, 0xd6604d,
    0xb2182b, 0x67001f,
];
const VIRIDIS_11: [u32; 11] = [
    0x440154, 0x482172, 0x423d84, 0x38578c, 0x2d6f8e, 0x24858d, 0x1e9a89, 0x2ab07e, 0x51c468,
    0x86d549, 0xc0df25,
];

/// Palette used for the heatmap cells and the color bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPalette {
    /// Pink/yellow-green diverging, green for -1, pink for +1.
    #[default]
    PiYG,
    /// Red/blue diverging, blue for -1, red for +1.
    RdBu,
    /// Sequential.
    Viridis,
}

impl ColorPalette {
    pub const ALL: [ColorPalette; 3] = [Self::PiYG, Self::RdBu, Self::Viridis];

    pub fn name(self) -> &'static str {
        match self {
            Self::PiYG => "PiYG",
            Self::RdBu => "RdBu",
            Self::Viridis => "Viridis",
        }
    }

    pub fn colors(self) -> Vec<Color32> {
        let hex: &[u32] = match self {
            Self::PiYG => &PIYG_11,
            Self::RdBu => &RDBU_11,
            Self::Viridis => &VIRIDIS_11,
        };
        hex.iter()
            .map(|&h| Color32::from_rgb((h >> 16) as u8, (h >> 8) as u8, h as u8))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Color mapping: coefficient → Color32
// ---------------------------------------------------------------------------

/// Linear mapper from `[low, high]` onto a list of colours, either binned
/// (one palette colour per equal-width bin) or smoothly interpolated.
#[derive(Debug, Clone)]
pub struct ColorMapper {
    colors: Vec<Color32>,
    pub low: f64,
    pub high: f64,
    pub smooth: bool,
    nan_color: Color32,
}

impl ColorMapper {
    /// Mapper over the correlation range `[-1, 1]`.
    pub fn new(palette: ColorPalette) -> Self {
        ColorMapper {
            colors: palette.colors(),
            low: -1.0,
            high: 1.0,
            smooth: false,
            nan_color: Color32::GRAY,
        }
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn nan_color(&self) -> Color32 {
        self.nan_color
    }

    /// Look up the colour for a value.  Values outside the range clamp to the
    /// end colours, `NaN` gets the no-data colour.
    pub fn color_for(&self, value: f64) -> Color32 {
        if value.is_nan() || self.colors.is_empty() {
            return self.nan_color;
        }
        let n = self.colors.len();
        let t = ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0);
        if self.smooth {
            return self.gradient_at(t);
        }
        let idx = ((t * n as f64).floor() as usize).min(n - 1);
        self.colors[idx]
    }

    /// Smoothly interpolated colour at `t ∈ [0, 1]` along the palette,
    /// mixed in linear light.
    pub fn gradient_at(&self, t: f64) -> Color32 {
        let n = self.colors.len();
        if n == 0 {
            return self.nan_color;
        }
        let pos = t.clamp(0.0, 1.0) as f32 * (n - 1) as f32;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let mixed = to_linear(self.colors[lo]).mix(to_linear(self.colors[hi]), pos - lo as f32);
        let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// Same colour with the given opacity.
    pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

fn to_linear(c: Color32) -> LinSrgb {
    Srgb::new(c.r(), c.g(), c.b()).into_format::<f32>().into_linear()
}
