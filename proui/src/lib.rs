#![cfg_attr(not(test), no_std)]

//! Custom G-codes and the bed mesh viewer of the PRO UI for DWIN and TJC printer displays.
//!
//! [`ProUi`] owns all the state the UI keeps: the theme colors, a handful of flags and the machine
//! settings the extended G-codes adjust.  Everything else the UI touches belongs to the firmware,
//! and is reached through the traits in [`hal`]:
//!
//! - [`Canvas`] draws on the display
//! - [`Host`] is the serial console and the rest of the firmware's side effects (buzzer,
//!   backlight, screen lock, tramming...)
//! - [`Screens`] navigates between screens
//! - [`Watchdog`] is fed while drawing the mesh
//!
//! ```
//! use proui::{ProUi, Words};
//! # struct Console;
//! # impl proui::Host for Console {
//! #     fn echo(&mut self, line: &str) {}
//! #     fn unknown_command_warning(&mut self) {}
//! #     fn redraw_screen(&mut self) {}
//! #     fn refresh_brightness(&mut self) {}
//! #     fn done_buzz(&mut self, ok: bool) {}
//! # }
//! # let mut host = Console;
//! let mut ui = ProUi::builder().build();
//!
//! // C108 cancels a wait for user
//! ui.flags.wait_for_user = true;
//! ui.dispatch(108, &Words::new(), &mut host).unwrap();
//! assert!(!ui.flags.wait_for_user);
//!
//! // Anything else that isn't known is reported to the host and handed back as an error
//! assert!(ui.dispatch(4242, &Words::new(), &mut host).is_err());
//! ```

#[macro_use]
mod fmt;

pub mod codes;
pub mod color;
mod dispatch;
pub mod font;
pub mod hal;
pub mod mesh_viewer;
pub mod params;
pub mod settings;

#[cfg(test)]
mod testing;

use embedded_hal_1::delay::DelayNs;

pub use codes::CustomCode;
pub use color::{ColorTable, Rgb565, UiElement};
pub use dispatch::UnknownCode;
pub use hal::{Area, Button, Canvas, Host, Popup, Screens, Watchdog};
pub use mesh_viewer::{BedMesh, DisplayProfile, MeshViewer, ViewerOptions};
pub use params::{Parameters, Words};
pub use settings::MachineSettings;

/// Display settings the firmware persists along with the rest of its configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HmiData {
    pub colors: ColorTable,
    /// Show the thumbnail embedded in a G-code file before printing it
    pub enable_preview: bool,
}

impl Default for HmiData {
    fn default() -> Self {
        Self {
            colors: ColorTable::default(),
            enable_preview: true,
        }
    }
}

/// Runtime flags of the UI
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiFlags {
    /// The mesh viewer draws the mesh again instead of only its buttons
    pub mesh_redraw: bool,
    /// The left button (Save) of a two-button popup is highlighted
    pub select_flag: bool,
    /// The firmware is blocked waiting for the user to press the knob
    pub wait_for_user: bool,
    /// The backlight is on
    pub backlight: bool,
    pub screen_locked: bool,
    /// The file being printed was marked as a configuration file by `C10`
    pub config_file: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            mesh_redraw: true,
            select_flag: false,
            wait_for_user: false,
            backlight: true,
            screen_locked: false,
            config_file: false,
        }
    }
}

/// Builder for [`ProUi`]; every setting not given keeps its default.
#[derive(Clone, Debug, Default)]
pub struct ProUiBuilder {
    profile: DisplayProfile,
    hmi: HmiData,
    settings: MachineSettings,
}

impl ProUiBuilder {
    /// The kind of panel attached; defaults to [`DisplayProfile::Dwin`]
    pub fn with_profile(mut self, profile: DisplayProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Display settings restored from storage
    pub fn with_hmi_data(mut self, hmi: HmiData) -> Self {
        self.hmi = hmi;
        self
    }

    /// Machine settings restored from storage
    pub fn with_settings(mut self, settings: MachineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> ProUi {
        ProUi {
            hmi: self.hmi,
            flags: UiFlags::default(),
            settings: self.settings,
            mesh_viewer: MeshViewer::new(self.profile),
        }
    }
}

/// State of the PRO UI.
///
/// Custom G-codes are run with [`Self::dispatch`]; the mesh viewer screen is reached with
/// [`Self::goto_mesh_viewer`].
#[derive(Clone, Debug)]
pub struct ProUi {
    pub hmi: HmiData,
    pub flags: UiFlags,
    pub settings: MachineSettings,
    mesh_viewer: MeshViewer,
}

impl ProUi {
    pub fn builder() -> ProUiBuilder {
        ProUiBuilder::default()
    }

    pub fn profile(&self) -> DisplayProfile {
        self.mesh_viewer.profile()
    }

    pub fn mesh_viewer(&self) -> &MeshViewer {
        &self.mesh_viewer
    }

    /// Show the mesh viewer if the firmware has a valid mesh, otherwise go back to where we came
    /// from.  With `redraw` unset, the viewer only redraws its buttons over whatever mesh is on
    /// screen.
    pub fn goto_mesh_viewer<S: Screens>(&mut self, redraw: bool, screens: &mut S) {
        self.flags.mesh_redraw = redraw;
        if screens.leveling_is_valid() {
            screens.open_popup(Popup::MeshViewer);
        } else {
            debug!("no valid mesh to show");
            screens.return_screen();
        }
    }

    /// Draw the mesh viewer popup, with Save and Continue buttons
    pub fn draw_mesh_viewer<C: Canvas, W: Watchdog, D: DelayNs>(
        &mut self,
        canvas: &mut C,
        mesh: &BedMesh,
        watchdog: &mut W,
        delay: &mut D,
    ) -> Result<(), C::Error> {
        let options = ViewerOptions {
            with_save: true,
            redraw: self.flags.mesh_redraw,
            save_selected: self.flags.select_flag,
        };

        self.mesh_viewer
            .draw(canvas, mesh, &self.hmi.colors, options, watchdog, delay)
    }

    /// The knob was pressed in the mesh viewer popup: save the mesh if Save is highlighted, then
    /// leave
    pub fn on_click_mesh_viewer<S: Screens>(&mut self, screens: &mut S) {
        if self.flags.select_flag {
            info!("saving mesh");
            screens.save_mesh();
        }
        screens.return_screen();
    }
}
