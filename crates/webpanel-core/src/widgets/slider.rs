//! Slider: bounded integer input.

use std::borrow::Cow;

use crate::driver::Driver;
use crate::element::{Element, ElementState};
use crate::revision::Revision;

/// A range input holding an integer between `min` and `max`.
#[derive(Debug, Clone)]
pub struct Slider {
    state: ElementState,
    min: i16,
    max: i16,
    value: i16,
}

impl Slider {
    pub fn new(id: impl Into<Cow<'static, str>>, min: i16, max: i16, initial: i16) -> Self {
        Self {
            state: ElementState::new(id),
            min,
            max,
            value: initial,
        }
    }

    pub fn value(&self) -> i16 {
        self.value
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    /// Set the value from server-side logic. Not clamped.
    pub fn set_value(&mut self, value: i16, revision: Revision) {
        self.value = value;
        self.state.mark_changed(revision);
    }

    fn clamp(&self, value: i64) -> i16 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value.clamp(i64::from(low), i64::from(high)) as i16
    }
}

impl Element for Slider {
    fn state(&self) -> &ElementState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    fn value_property(&self) -> &'static str {
        "value"
    }

    fn value(&self) -> Cow<'_, str> {
        Cow::Owned(self.value.to_string())
    }

    fn render(&self, driver: &mut dyn Driver) {
        driver.print_content("<input");
        self.state.render_attributes(driver);
        driver.print_content(&format!(
            " type=\"range\" min=\"{}\" max=\"{}\" value=\"{}\"",
            self.min, self.max, self.value
        ));
        driver.print_content(" onChange=\"doRequest(this.id, this.value);\"/>");
    }

    /// Reads the leading integer (see [`parse_leading_int`]); the result is
    /// clamped to the range.
    fn apply_client_value(&mut self, value: &str) {
        self.value = self.clamp(parse_leading_int(value));
    }
}

/// Optional sign followed by decimal digits, after leading whitespace.
///
/// Trailing garbage is ignored (`"75.0"` reads as 75) and input without
/// digits reads as zero. Saturates instead of overflowing.
fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
