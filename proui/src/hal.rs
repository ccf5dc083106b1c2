//! Traits through which the UI reaches the rest of the firmware: the display driver, the host's
//! console and feedback devices, screen navigation and the watchdog.
//!
//! None of these are implemented here, except for a watchdog implementation for the RP2040 behind
//! the `embassy-rp` feature.  The firmware supplies the rest in terms of whatever display driver
//! and menu system it uses.

use crate::color::{Rgb565, UiElement};
use crate::font::Font;

/// A rectangular area of the screen
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// The stock buttons the display firmware knows how to draw
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Save,
    Continue,
}

/// Popups the UI asks the navigation layer to open
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Popup {
    MeshViewer,
}

/// Drawing primitives of the display.
///
/// Coordinates are in pixels with the origin in the top left corner of the panel.  Every
/// primitive is fallible if the underlying link to the display is; the error is handed back to
/// the caller untouched.
pub trait Canvas {
    type Error;

    /// Clear everything between the title bar and the status line
    fn clear_main_area(&mut self) -> Result<(), Self::Error>;

    /// Outline of the rectangle with corners `(x0, y0)` and `(x1, y1)`, in any order
    fn draw_rectangle(
        &mut self,
        color: Rgb565,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Self::Error>;

    /// Vertical line from `(x, y)` downwards
    fn draw_vline(&mut self, color: Rgb565, x: u16, y: u16, height: u16)
        -> Result<(), Self::Error>;

    /// Horizontal line from `(x, y)` to the right
    fn draw_hline(&mut self, color: Rgb565, x: u16, y: u16, width: u16)
        -> Result<(), Self::Error>;

    fn fill_circle(&mut self, color: Rgb565, x: u16, y: u16, radius: u16)
        -> Result<(), Self::Error>;

    fn fill_box(&mut self, color: Rgb565, area: Area) -> Result<(), Self::Error>;

    /// Draw `text` with its top left corner at `(x, y)`
    fn draw_string(
        &mut self,
        font: Font,
        foreground: Rgb565,
        background: Rgb565,
        x: u16,
        y: u16,
        text: &str,
    ) -> Result<(), Self::Error>;

    fn draw_button(&mut self, button: Button, x: u16, y: u16) -> Result<(), Self::Error>;

    /// Highlight either the left (`save_selected`) or the right button of a two-button row at
    /// height `y`
    fn draw_select_highlight(&mut self, save_selected: bool, y: u16) -> Result<(), Self::Error>;

    /// Replace the text in the title bar
    fn show_caption(&mut self, caption: &str) -> Result<(), Self::Error>;

    /// Replace the text in the status line
    fn set_status(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Side effects of the custom G-codes on the rest of the firmware.
///
/// Methods tied to optional features have empty default implementations, so a host only needs to
/// provide what its build actually uses.
pub trait Host {
    /// Write one line to the serial console
    fn echo(&mut self, line: &str);

    /// Let the G-code source know the last command was not understood
    fn unknown_command_warning(&mut self);

    /// Redraw the current screen from scratch
    fn redraw_screen(&mut self);

    /// Start over the backlight timeout as if the user had touched the knob
    fn refresh_backlight_timeout(&mut self) {}

    /// Turn the backlight back on at the configured brightness
    fn refresh_brightness(&mut self);

    /// Sound the "done" (or "failed") tune
    fn done_buzz(&mut self, ok: bool);

    /// A UI element's color changed and should be applied to the live theme
    fn apply_color(&mut self, _element: UiElement, _color: Rgb565) {}

    fn lock_screen(&mut self) {}

    fn unlock_screen(&mut self) {}

    /// Move to tramming point `point`: 0 to 3 are the corners, 4 the center of the bed
    fn tram(&mut self, _point: u8) {}

    /// Run the probe-assisted tramming wizard
    fn tramming_wizard(&mut self) {}

    /// Restart the display controller
    fn reboot_screen(&mut self) {}

    /// Stop responding until the watchdog resets the printer
    fn freeze(&mut self) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Screen navigation, owned by the firmware's menu system
pub trait Screens {
    /// True if the firmware holds a complete, valid bed mesh
    fn leveling_is_valid(&self) -> bool;

    fn open_popup(&mut self, popup: Popup);

    /// Go back to the screen that was active before the current one
    fn return_screen(&mut self);

    /// Persist the current bed mesh
    fn save_mesh(&mut self);
}

/// A watchdog that has to be fed while drawing takes long
pub trait Watchdog {
    fn refresh(&mut self);
}

#[cfg(feature = "embassy-rp")]
mod embassy_rp_watchdog {
    use embassy_rp::watchdog::Watchdog as RpWatchdog;

    impl super::Watchdog for RpWatchdog {
        fn refresh(&mut self) {
            self.feed();
        }
    }
}

/// Capacity of a single line sent through [`Host::echo`]
pub const ECHO_LEN: usize = 64;

/// Format one line and send it to the host console.  Lines longer than [`ECHO_LEN`] are cut short.
pub(crate) fn echo<H: Host + ?Sized>(host: &mut H, args: core::fmt::Arguments<'_>) {
    use core::fmt::Write;

    let mut line = heapless::String::<ECHO_LEN>::new();
    if line.write_fmt(args).is_err() {
        warn!("console line truncated");
    }
    host.echo(&line);
}
