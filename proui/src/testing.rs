//! Recording implementations of the [`crate::hal`] traits for tests

use crate::color::{Rgb565, UiElement};
use crate::font::Font;
use crate::hal::{Area, Button, Canvas, Host, Popup, Screens, Watchdog};

/// One drawing primitive, as issued to [`RecordingCanvas`]
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ClearMainArea,
    Rectangle(Rgb565, u16, u16, u16, u16),
    VLine(Rgb565, u16, u16, u16),
    HLine(Rgb565, u16, u16, u16),
    Circle(Rgb565, u16, u16, u16),
    Box(Rgb565, Area),
    String(Font, Rgb565, Rgb565, u16, u16, String),
    Button(Button, u16, u16),
    Highlight(bool, u16),
    Caption(String),
    Status(String),
}

/// Error returned by a [`RecordingCanvas`] set up to fail
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawFailed;

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<Call>,
    fail_on: Option<usize>,
}

impl RecordingCanvas {
    /// A canvas whose call number `index` (counting from 0) fails.  The failing call is still
    /// recorded.
    pub fn failing_on(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(index),
        }
    }

    /// Text of every string drawn, in order
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            Call::String(.., text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn record(&mut self, call: Call) -> Result<(), DrawFailed> {
        let index = self.calls.len();
        self.calls.push(call);
        if self.fail_on == Some(index) {
            Err(DrawFailed)
        } else {
            Ok(())
        }
    }
}

impl Canvas for RecordingCanvas {
    type Error = DrawFailed;

    fn clear_main_area(&mut self) -> Result<(), Self::Error> {
        self.record(Call::ClearMainArea)
    }

    fn draw_rectangle(
        &mut self,
        color: Rgb565,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Self::Error> {
        self.record(Call::Rectangle(color, x0, y0, x1, y1))
    }

    fn draw_vline(
        &mut self,
        color: Rgb565,
        x: u16,
        y: u16,
        height: u16,
    ) -> Result<(), Self::Error> {
        self.record(Call::VLine(color, x, y, height))
    }

    fn draw_hline(&mut self, color: Rgb565, x: u16, y: u16, width: u16) -> Result<(), Self::Error> {
        self.record(Call::HLine(color, x, y, width))
    }

    fn fill_circle(
        &mut self,
        color: Rgb565,
        x: u16,
        y: u16,
        radius: u16,
    ) -> Result<(), Self::Error> {
        self.record(Call::Circle(color, x, y, radius))
    }

    fn fill_box(&mut self, color: Rgb565, area: Area) -> Result<(), Self::Error> {
        self.record(Call::Box(color, area))
    }

    fn draw_string(
        &mut self,
        font: Font,
        foreground: Rgb565,
        background: Rgb565,
        x: u16,
        y: u16,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.record(Call::String(
            font,
            foreground,
            background,
            x,
            y,
            text.to_string(),
        ))
    }

    fn draw_button(&mut self, button: Button, x: u16, y: u16) -> Result<(), Self::Error> {
        self.record(Call::Button(button, x, y))
    }

    fn draw_select_highlight(&mut self, save_selected: bool, y: u16) -> Result<(), Self::Error> {
        self.record(Call::Highlight(save_selected, y))
    }

    fn show_caption(&mut self, caption: &str) -> Result<(), Self::Error> {
        self.record(Call::Caption(caption.to_string()))
    }

    fn set_status(&mut self, text: &str) -> Result<(), Self::Error> {
        self.record(Call::Status(text.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct RecordingWatchdog {
    pub refreshes: usize,
}

impl Watchdog for RecordingWatchdog {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

/// Returns immediately
pub struct NoDelay;

impl embedded_hal_1::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub pauses_ms: Vec<u32>,
}

impl embedded_hal_1::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pauses_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
    }
}

#[derive(Debug)]
pub struct RecordingScreens {
    pub valid: bool,
    pub popups: Vec<Popup>,
    pub returns: usize,
    pub saves: usize,
}

impl RecordingScreens {
    /// Screens of a firmware that does (or doesn't) have a valid mesh
    pub fn new(valid: bool) -> Self {
        Self {
            valid,
            popups: Vec::new(),
            returns: 0,
            saves: 0,
        }
    }
}

impl Screens for RecordingScreens {
    fn leveling_is_valid(&self) -> bool {
        self.valid
    }

    fn open_popup(&mut self, popup: Popup) {
        self.popups.push(popup);
    }

    fn return_screen(&mut self) {
        self.returns += 1;
    }

    fn save_mesh(&mut self) {
        self.saves += 1;
    }
}

/// A side effect requested from [`RecordingHost`], other than console output
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    UnknownCommand,
    RedrawScreen,
    RefreshBacklightTimeout,
    RefreshBrightness,
    DoneBuzz(bool),
    ApplyColor(UiElement, Rgb565),
    LockScreen,
    UnlockScreen,
    Tram(u8),
    TrammingWizard,
    RebootScreen,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Lines sent to the console
    pub lines: Vec<String>,
    pub effects: Vec<Effect>,
}

impl RecordingHost {
    pub fn warnings(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| **effect == Effect::UnknownCommand)
            .count()
    }
}

impl Host for RecordingHost {
    fn echo(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn unknown_command_warning(&mut self) {
        self.effects.push(Effect::UnknownCommand);
    }

    fn redraw_screen(&mut self) {
        self.effects.push(Effect::RedrawScreen);
    }

    fn refresh_backlight_timeout(&mut self) {
        self.effects.push(Effect::RefreshBacklightTimeout);
    }

    fn refresh_brightness(&mut self) {
        self.effects.push(Effect::RefreshBrightness);
    }

    fn done_buzz(&mut self, ok: bool) {
        self.effects.push(Effect::DoneBuzz(ok));
    }

    fn apply_color(&mut self, element: UiElement, color: Rgb565) {
        self.effects.push(Effect::ApplyColor(element, color));
    }

    fn lock_screen(&mut self) {
        self.effects.push(Effect::LockScreen);
    }

    fn unlock_screen(&mut self) {
        self.effects.push(Effect::UnlockScreen);
    }

    fn tram(&mut self, point: u8) {
        self.effects.push(Effect::Tram(point));
    }

    fn tramming_wizard(&mut self) {
        self.effects.push(Effect::TrammingWizard);
    }

    fn reboot_screen(&mut self) {
        self.effects.push(Effect::RebootScreen);
    }

    fn freeze(&mut self) -> ! {
        panic!("frozen");
    }
}
