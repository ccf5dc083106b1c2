//! Colors as the DWIN panels understand them, the per-element color table of the UI, and the
//! rainbow gradient used to shade bed mesh points.

/// A 16-bit color with 5 bits of red, 6 bits of green and 5 bits of blue, packed the way the
/// display controller expects it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(u16);

impl Rgb565 {
    pub const MAX_RED: u8 = 0b1_1111;
    pub const MAX_GREEN: u8 = 0b11_1111;
    pub const MAX_BLUE: u8 = 0b1_1111;

    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const YELLOW: Self = Self(0xFF0F);
    pub const BG_BLACK: Self = Self(0x0841);
    pub const BG_WINDOW: Self = Self(0x31E8);
    pub const LIGHT_RED: Self = Self(0xFC0F);
    pub const SELECT: Self = Self(0x33BB);
    pub const POPUP_TEXT: Self = Self(0xD6BA);
    pub const PERCENT: Self = Self(0xFE29);
    pub const BARFILL: Self = Self(0x10E4);

    /// Pack the three components.  Bits above each component's width are discarded.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(
            ((red & Self::MAX_RED) as u16) << 11
                | ((green & Self::MAX_GREEN) as u16) << 5
                | (blue & Self::MAX_BLUE) as u16,
        )
    }

    /// Pack the three components, saturating each one at its maximum instead of wrapping.
    pub fn saturating(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red.min(Self::MAX_RED),
            green.min(Self::MAX_GREEN),
            blue.min(Self::MAX_BLUE),
        )
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 11) as u8 & Self::MAX_RED
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 5) as u8 & Self::MAX_GREEN
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8 & Self::MAX_BLUE
    }
}

/// The UI elements whose color can be customized, numbered the way `C11 E<n>` addresses them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::FromRepr, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum UiElement {
    Background = 2,
    Cursor = 3,
    TitleBackground = 4,
    TitleText = 5,
    Text = 6,
    Selected = 7,
    SplitLine = 8,
    Highlight = 9,
    StatusBackground = 10,
    StatusText = 11,
    PopupBackground = 12,
    PopupText = 13,
    AlertBackground = 14,
    AlertText = 15,
    PercentText = 16,
    BarFill = 17,
    Indicator = 18,
    Coordinate = 19,
}

const ELEMENT_COUNT: usize = 18;
const FIRST_ELEMENT: u8 = UiElement::Background as u8;

impl UiElement {
    pub fn from_id(id: u8) -> Option<Self> {
        Self::from_repr(id)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        (self as u8 - FIRST_ELEMENT) as usize
    }

    /// The factory color of this element
    pub fn default_color(self) -> Rgb565 {
        match self {
            Self::Background => Rgb565::BG_BLACK,
            Self::Cursor => Rgb565::new(20, 49, 31),
            Self::TitleBackground => Rgb565::new(0, 23, 16),
            Self::TitleText => Rgb565::WHITE,
            Self::Text => Rgb565::WHITE,
            Self::Selected => Rgb565::SELECT,
            Self::SplitLine => Rgb565::new(0, 23, 16),
            Self::Highlight => Rgb565::WHITE,
            Self::StatusBackground => Rgb565::new(0, 23, 16),
            Self::StatusText => Rgb565::YELLOW,
            Self::PopupBackground => Rgb565::BG_WINDOW,
            Self::PopupText => Rgb565::POPUP_TEXT,
            Self::AlertBackground => Rgb565::LIGHT_RED,
            Self::AlertText => Rgb565::YELLOW,
            Self::PercentText => Rgb565::PERCENT,
            Self::BarFill => Rgb565::BARFILL,
            Self::Indicator => Rgb565::WHITE,
            Self::Coordinate => Rgb565::WHITE,
        }
    }
}

/// Current color of every [`UiElement`].
///
/// Persisting the table is up to the firmware's settings storage; this only holds the live values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorTable([Rgb565; ELEMENT_COUNT]);

impl ColorTable {
    pub fn get(&self, element: UiElement) -> Rgb565 {
        self.0[element.index()]
    }

    pub fn set(&mut self, element: UiElement, color: Rgb565) {
        self.0[element.index()] = color;
    }

    /// Restore every element to its factory color
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        use strum::VariantArray;

        let mut colors = [Rgb565::BLACK; ELEMENT_COUNT];
        for element in UiElement::VARIANTS {
            colors[element.index()] = element.default_color();
        }

        Self(colors)
    }
}

const RAINBOW_MAX_RED: f32 = 28.0;
const RAINBOW_MAX_GREEN: f32 = 38.0;
const RAINBOW_MAX_BLUE: f32 = 28.0;

/// Map `value` within `min..=max` onto a blue → green → yellow → red gradient.
///
/// When the range straddles zero the gradient is centered on zero, so zero is always pure green
/// and the two halves are scaled by the larger of `|min|` and `|max|`.  Otherwise the range is
/// mapped onto the green → red half.  Out-of-range values saturate at the ends.
///
/// Along the gradient the red component never decreases and the blue component never increases.
pub fn rainbow(value: i16, min: i16, max: i16) -> Rgb565 {
    let n = if min >= 0 {
        let span = max as f32 - min as f32;
        if span > 0.0 {
            (value as f32 - min as f32) / span
        } else {
            0.0
        }
    } else {
        let limit = libm::fabsf(min as f32).max(libm::fabsf(max as f32));
        value as f32 / limit
    };
    let n = n.clamp(-1.0, 1.0);

    let (red, green, blue) = if n < 0.0 {
        (0.0, (1.0 + n) * RAINBOW_MAX_GREEN, -n * RAINBOW_MAX_BLUE)
    } else if n < 0.5 {
        (RAINBOW_MAX_RED * n * 2.0, RAINBOW_MAX_GREEN, 0.0)
    } else {
        (RAINBOW_MAX_RED, RAINBOW_MAX_GREEN * (1.0 - n), 0.0)
    };

    Rgb565::new(red as u8, green as u8, blue as u8)
}
