//! Parameter words of a G-code command (`E3 R31 G0 B0`), as seen by the custom G-code handlers.
//!
//! Firmware that already has a G-code parser implements [`Parameters`] on top of it.  [`Words`]
//! is a small standalone implementation for everything else.

use core::fmt;

/// Maximum number of distinct parameter letters [`Words`] holds
pub const MAX_WORDS: usize = 16;

/// Read access to the parameter words of the command being executed.
///
/// Letters are upper case.
pub trait Parameters {
    /// True if `letter` appears in the command, with or without a value
    fn seen(&self, letter: char) -> bool;

    /// The numeric value following `letter`, if it appears and has one
    fn value(&self, letter: char) -> Option<f32>;

    fn float(&self, letter: char) -> Option<f32> {
        self.value(letter)
    }

    /// Value truncated towards zero, saturating at the `i32` limits
    fn int(&self, letter: char) -> Option<i32> {
        self.value(letter).map(|value| value as i32)
    }

    /// Value truncated towards zero and constrained to `0..=255`
    fn byte(&self, letter: char) -> Option<u8> {
        self.int(letter).map(|value| value.clamp(0, u8::MAX as i32) as u8)
    }

    /// A letter on its own counts as `true`; otherwise any non-zero value is `true`
    fn flag(&self, letter: char) -> Option<bool> {
        if !self.seen(letter) {
            return None;
        }

        Some(self.value(letter).map_or(true, |value| value != 0.0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// A word that doesn't start with a letter
    MalformedWord,
    /// A value that isn't a number, e.g. `Xabc`
    InvalidNumber,
    /// More distinct letters than [`MAX_WORDS`]
    TooManyWords,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedWord => f.write_str("parameter word must start with a letter"),
            Self::InvalidNumber => f.write_str("parameter value is not a number"),
            Self::TooManyWords => write!(f, "more than {} parameter words", MAX_WORDS),
        }
    }
}

/// Parameter words stored by letter
#[derive(Clone, Debug, Default)]
pub struct Words(heapless::FnvIndexMap<char, Option<f32>, MAX_WORDS>);

impl Words {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the parameter part of a command line, e.g. `E3 R31 G0 B0`.
    ///
    /// Letters are case-insensitive; anything after a `;` is a comment.  When a letter repeats,
    /// the last occurrence wins.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = match text.split_once(';') {
            Some((words, _comment)) => words,
            None => text,
        };

        let mut words = Self::new();
        for word in text.split_whitespace() {
            let mut chars = word.chars();
            let letter = match chars.next() {
                Some(letter) if letter.is_ascii_alphabetic() => letter,
                _ => return Err(ParseError::MalformedWord),
            };

            let value = chars.as_str();
            let value = if value.is_empty() {
                None
            } else {
                Some(
                    value
                        .parse::<f32>()
                        .map_err(|_| ParseError::InvalidNumber)?,
                )
            };

            words.insert(letter, value)?;
        }

        Ok(words)
    }

    /// Set `letter` to `value`, replacing any previous value
    pub fn insert(&mut self, letter: char, value: Option<f32>) -> Result<(), ParseError> {
        self.0
            .insert(letter.to_ascii_uppercase(), value)
            .map_err(|_| ParseError::TooManyWords)?;

        Ok(())
    }

    /// Builder-style [`Self::insert`] for a letter with a value
    pub fn with(mut self, letter: char, value: f32) -> Result<Self, ParseError> {
        self.insert(letter, Some(value))?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Parameters for Words {
    fn seen(&self, letter: char) -> bool {
        self.0.contains_key(&letter)
    }

    fn value(&self, letter: char) -> Option<f32> {
        self.0.get(&letter).copied().flatten()
    }
}
