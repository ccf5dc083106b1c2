//! Display fonts and the fixed-format number labels drawn next to mesh points.
//!
//! Labels are rendered into a fixed-capacity [`Label`].  If a value is too large to fit, the
//! label holds as much of it as fits; that only happens for heights nobody could print with.

use core::fmt::Write;

/// Capacity of a [`Label`]
pub const LABEL_LEN: usize = 16;

/// Text of a single label
pub type Label = heapless::String<LABEL_LEN>;

/// The monospaced fonts built into the display controller
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    Font6x12,
    Font8x16,
}

impl Font {
    pub fn width(self) -> u16 {
        match self {
            Self::Font6x12 => 6,
            Self::Font8x16 => 8,
        }
    }

    pub fn height(self) -> u16 {
        match self {
            Self::Font6x12 => 12,
            Self::Font8x16 => 16,
        }
    }
}

/// Render `value` with `decimals` digits after the point and no sign column.
pub fn fixed(value: f32, decimals: usize) -> Label {
    let mut label = Label::new();
    let _ = write!(label, "{:.*}", decimals, value);
    label
}

/// Render `value` with a leading sign column: `-` for negative values, a space otherwise, so
/// positive and negative labels line up.
pub fn signed(value: f32, decimals: usize) -> Label {
    let mut label = Label::new();
    let sign = if value < 0.0 { '-' } else { ' ' };
    let _ = write!(label, "{}{:.*}", sign, decimals, libm::fabsf(value));
    label
}

/// Render a height in hundredths of a millimetre strictly between -1 and 1 without the leading
/// zero (`.05`, `-.42`, or `0` for zero), which is as wide as dense mesh grids allow.
///
/// Returns `None` if the value needs an integer part.
pub fn compact_centi(centi: i32) -> Option<Label> {
    let mut label = Label::new();
    match centi {
        -99..=-1 => write!(label, "-.{:02}", -centi).ok()?,
        0 => label.push('0').ok()?,
        1..=99 => write!(label, ".{:02}", centi).ok()?,
        _ => return None,
    }

    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn fonts_are_taller_than_wide() {
        for font in Font::VARIANTS {
            assert!(font.height() > font.width());
        }
    }

    #[test]
    fn fixed_labels() {
        assert_eq!("0.00", fixed(0.0, 2).as_str());
        assert_eq!("1.25", fixed(1.25, 2).as_str());
        assert_eq!("-0.1", fixed(-0.1, 1).as_str());
    }

    #[test]
    fn signed_labels_keep_a_sign_column() {
        assert_eq!("-0.12", signed(-0.12, 2).as_str());
        assert_eq!(" 0.12", signed(0.12, 2).as_str());
        assert_eq!(" 1.5", signed(1.5, 1).as_str());
        assert_eq!(signed(-0.5, 2).len(), signed(0.5, 2).len());
    }

    #[test]
    fn compact_labels() {
        struct TestCase {
            centi: i32,
            expected: Option<&'static str>,
        }

        const TEST_CASES: &[TestCase] = &[
            TestCase {
                centi: 0,
                expected: Some("0"),
            },
            TestCase {
                centi: 5,
                expected: Some(".05"),
            },
            TestCase {
                centi: 99,
                expected: Some(".99"),
            },
            TestCase {
                centi: -7,
                expected: Some("-.07"),
            },
            TestCase {
                centi: -99,
                expected: Some("-.99"),
            },
            TestCase {
                centi: 100,
                expected: None,
            },
            TestCase {
                centi: -100,
                expected: None,
            },
        ];

        for tc in TEST_CASES {
            let label = compact_centi(tc.centi);
            assert_eq!(tc.expected, label.as_deref(), "centi {}", tc.centi);
        }
    }

    #[test]
    fn oversized_values_truncate() {
        let label = signed(1.0e30, 2);
        assert!(label.len() <= LABEL_LEN);
        assert!(label.starts_with(' '));
    }
}
