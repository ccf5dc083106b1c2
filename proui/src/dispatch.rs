//! Dispatch of custom `C<n>` G-codes to their handlers.
//!
//! Handlers never fail: a parameter that is missing or out of range is ignored (and logged), and
//! whatever else the command asked for still happens.

use core::fmt;

use crate::codes::CustomCode;
use crate::hal::{echo, Host};
use crate::params::Parameters;
use crate::ProUi;

#[cfg(feature = "custom-colors")]
use crate::color::{Rgb565, UiElement};
#[cfg(feature = "proui-ex")]
use crate::settings::{
    clamp_grid_points, Position, HOTEND_MAX_TEMP_FLOOR, MAX_POSITION_RANGE, MIN_POSITION_RANGE,
    THERMISTOR_MAX_TEMP,
};

/// A code that isn't one of the [`CustomCode`]s of this build
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCode(pub i16);

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown command: C{}", self.0)
    }
}

impl ProUi {
    /// Run custom G-code `C<code>` with the given parameters.
    ///
    /// Unknown codes are reported to the host with [`Host::unknown_command_warning`], once, and
    /// returned as an error; nothing else happens for them.
    pub fn dispatch<P: Parameters, H: Host>(
        &mut self,
        code: i16,
        params: &P,
        host: &mut H,
    ) -> Result<CustomCode, UnknownCode> {
        let Some(custom) = CustomCode::from_number(code) else {
            warn!("unknown custom G-code C{}", code);
            host.unknown_command_warning();
            return Err(UnknownCode(code));
        };

        debug!("C{}", code);

        match custom {
            #[cfg(all(feature = "proui-ex", feature = "media"))]
            CustomCode::MarkConfigFile => self.mark_config_file(host),
            #[cfg(feature = "custom-colors")]
            CustomCode::SetElementColor => self.set_element_color(params, host),
            #[cfg(all(feature = "proui-ex", feature = "mesh"))]
            CustomCode::MeshSettings => self.set_mesh_settings(params),
            #[cfg(feature = "bed-tramming")]
            CustomCode::BedTramming => self.bed_tramming(params, host),
            #[cfg(feature = "proui-ex")]
            CustomCode::PhysicalMinimums => self.set_physical_minimums(params),
            #[cfg(feature = "proui-ex")]
            CustomCode::PhysicalMaximums => self.set_physical_maximums(params),
            #[cfg(feature = "proui-ex")]
            CustomCode::BedSize => self.set_bed_size(params),
            #[cfg(feature = "proui-ex")]
            CustomCode::HotendMaxTemp => self.set_hotend_max_temp(params),
            CustomCode::CancelWaitForUser => self.cancel_wait_for_user(host),
            #[cfg(feature = "proui-ex")]
            CustomCode::Info => self.echo_info(host),
            #[cfg(all(feature = "proui-ex", feature = "nozzle-park"))]
            CustomCode::ParkPosition => self.set_park_position(params),
            #[cfg(feature = "gcode-preview")]
            CustomCode::Preview => self.set_preview(params, host),
            #[cfg(all(feature = "proui-ex", feature = "runout-sensor"))]
            CustomCode::RunoutMode => self.set_runout_mode(params),
            #[cfg(feature = "lockscreen")]
            CustomCode::LockScreen => self.lock_screen(params, host),
            #[cfg(feature = "proui-ex")]
            CustomCode::InvertExtruder => self.set_extruder_inversion(params),
            #[cfg(all(feature = "proui-ex", feature = "toolbar"))]
            CustomCode::Toolbar => self.set_toolbar(params),
            #[cfg(feature = "proui-ex")]
            CustomCode::ProbeSettings => self.set_probe_settings(params),
            #[cfg(feature = "debug-dwin")]
            CustomCode::SimulateFreeze => self.simulate_freeze(host),
        }

        Ok(custom)
    }

    /// Echo every setting the extended codes manage as the command that restores it
    #[cfg(feature = "proui-ex")]
    pub fn report<H: Host>(&self, for_replay: bool, host: &mut H) {
        self.settings.report(for_replay, host);
    }

    #[cfg(all(feature = "proui-ex", feature = "media"))]
    fn mark_config_file<H: Host>(&mut self, host: &mut H) {
        self.flags.config_file = true;
        host.echo("Configuration file");
    }

    /// `C11`: an element id of 0 (or none) just redraws the screen, to show off colors set so
    /// far.  Components beyond 5 bits (6 for green) saturate.
    #[cfg(feature = "custom-colors")]
    fn set_element_color<P: Parameters, H: Host>(&mut self, params: &P, host: &mut H) {
        let id = params.byte('E').unwrap_or(0);
        if id == 0 {
            host.redraw_screen();
            return;
        }

        let Some(element) = UiElement::from_id(id) else {
            warn!("C11: no UI element {}", id);
            return;
        };

        let color = Rgb565::saturating(
            params.byte('R').unwrap_or(0),
            params.byte('G').unwrap_or(0),
            params.byte('B').unwrap_or(0),
        );
        self.hmi.colors.set(element, color);
        host.apply_color(element, color);
    }

    /// `C29`: the probing area has to lie on the bed with its minimum below its maximum,
    /// otherwise the area is left alone.  Grid sizes are clamped.
    #[cfg(all(feature = "proui-ex", feature = "mesh"))]
    fn set_mesh_settings<P: Parameters>(&mut self, params: &P) {
        let mut mesh = self.settings.mesh;
        let bed = self.settings.bed_size;

        if let Some(min_x) = params.float('L') {
            mesh.min_x = min_x;
        }
        if let Some(max_x) = params.float('R') {
            mesh.max_x = max_x;
        }
        if let Some(min_y) = params.float('F') {
            mesh.min_y = min_y;
        }
        if let Some(max_y) = params.float('B') {
            mesh.max_y = max_y;
        }

        let on_bed = |min: f32, max: f32, size: f32| 0.0 <= min && min < max && max <= size;
        if on_bed(mesh.min_x, mesh.max_x, bed.x) && on_bed(mesh.min_y, mesh.max_y, bed.y) {
            self.settings.mesh.min_x = mesh.min_x;
            self.settings.mesh.max_x = mesh.max_x;
            self.settings.mesh.min_y = mesh.min_y;
            self.settings.mesh.max_y = mesh.max_y;
        } else {
            warn!("C29: probing area outside of the bed, ignored");
        }

        if let Some(points) = params.byte('N') {
            let points = clamp_grid_points(points);
            self.settings.mesh.grid_x = points;
            self.settings.mesh.grid_y = points;
        }
        if let Some(points) = params.byte('X') {
            self.settings.mesh.grid_x = clamp_grid_points(points);
        }
        if let Some(points) = params.byte('Y') {
            self.settings.mesh.grid_y = clamp_grid_points(points);
        }
    }

    /// `C35`: `T0` to `T3` are the corners and `T4` the center.  Without `T`, probe-equipped
    /// machines get the tramming wizard.
    #[cfg(feature = "bed-tramming")]
    fn bed_tramming<P: Parameters, H: Host>(&mut self, params: &P, host: &mut H) {
        if let Some(point) = params.int('T') {
            match u8::try_from(point) {
                Ok(point @ 0..=4) => host.tram(point),
                _ => warn!("C35: no tramming point {}", point),
            }
            return;
        }

        #[cfg(feature = "bed-probe")]
        host.tramming_wizard();
    }

    #[cfg(feature = "proui-ex")]
    fn set_physical_minimums<P: Parameters>(&mut self, params: &P) {
        set_axes(&mut self.settings.min_position, params, &MIN_POSITION_RANGE, "C100");
    }

    #[cfg(feature = "proui-ex")]
    fn set_physical_maximums<P: Parameters>(&mut self, params: &P) {
        set_axes(&mut self.settings.max_position, params, &MAX_POSITION_RANGE, "C101");
    }

    #[cfg(feature = "proui-ex")]
    fn set_bed_size<P: Parameters>(&mut self, params: &P) {
        let bed = &mut self.settings.bed_size;
        for (letter, size) in [('X', &mut bed.x), ('Y', &mut bed.y)] {
            if let Some(value) = params.float(letter) {
                if MAX_POSITION_RANGE.contains(&value) {
                    *size = value;
                } else {
                    warn!("C102: bed size {} out of range", value);
                }
            }
        }
    }

    /// `C104`: capped at what the thermistor table covers
    #[cfg(feature = "proui-ex")]
    fn set_hotend_max_temp<P: Parameters>(&mut self, params: &P) {
        let Some(temp) = params.int('S') else {
            return;
        };

        if temp < HOTEND_MAX_TEMP_FLOOR as i32 {
            warn!("C104: max temp {} too low", temp);
            return;
        }

        self.settings.hotend_max_temp = temp.min(THERMISTOR_MAX_TEMP as i32) as i16;
    }

    /// `C108`
    fn cancel_wait_for_user<H: Host>(&mut self, host: &mut H) {
        #[cfg(feature = "debug-dwin")]
        echo(
            host,
            format_args!("wait_for_user was {}", self.flags.wait_for_user as u8),
        );

        host.refresh_backlight_timeout();
        if !self.flags.backlight {
            host.refresh_brightness();
            self.flags.backlight = true;
        }
        self.flags.wait_for_user = false;
        host.done_buzz(true);
    }

    #[cfg(feature = "proui-ex")]
    fn echo_info<H: Host>(&self, host: &mut H) {
        echo(host, format_args!("PRO UI EX {}", env!("CARGO_PKG_VERSION")));
        echo(
            host,
            format_args!(
                "Display: {}",
                match self.profile() {
                    crate::DisplayProfile::Dwin => "DWIN",
                    crate::DisplayProfile::Tjc => "TJC",
                }
            ),
        );
        echo(
            host,
            format_args!("Grid limit: {}", crate::mesh_viewer::GRID_LIMIT),
        );
    }

    #[cfg(all(feature = "proui-ex", feature = "nozzle-park"))]
    fn set_park_position<P: Parameters>(&mut self, params: &P) {
        let min = self.settings.min_position;
        let max = self.settings.max_position;
        let park = &mut self.settings.park_position;

        for (letter, value, low, high) in [
            ('X', &mut park.x, min.x, max.x),
            ('Y', &mut park.y, min.y, max.y),
            ('Z', &mut park.z, min.z, max.z),
        ] {
            if let Some(position) = params.float(letter) {
                if (low..=high).contains(&position) {
                    *value = position;
                } else {
                    warn!("C125: park position {} outside of the machine", position);
                }
            }
        }
    }

    /// `C250`: reports the setting whether or not it changed
    #[cfg(feature = "gcode-preview")]
    fn set_preview<P: Parameters, H: Host>(&mut self, params: &P, host: &mut H) {
        if let Some(value) = params.byte('P') {
            self.hmi.enable_preview = value != 0;
        }
        echo(
            host,
            format_args!("PREVIEW:{}", self.hmi.enable_preview as u8),
        );
    }

    #[cfg(all(feature = "proui-ex", feature = "runout-sensor"))]
    fn set_runout_mode<P: Parameters>(&mut self, params: &P) {
        let Some(mode) = params.byte('M') else {
            return;
        };

        match crate::settings::RunoutMode::from_repr(mode) {
            Some(mode) => self.settings.runout_mode = mode,
            None => warn!("C412: no runout mode {}", mode),
        }
    }

    /// `C510`: unlocks with a non-zero `U`, locks otherwise
    #[cfg(feature = "lockscreen")]
    fn lock_screen<P: Parameters, H: Host>(&mut self, params: &P, host: &mut H) {
        if params.int('U').is_some_and(|unlock| unlock != 0) {
            self.flags.screen_locked = false;
            host.unlock_screen();
        } else {
            self.flags.screen_locked = true;
            host.lock_screen();
        }
    }

    #[cfg(feature = "proui-ex")]
    fn set_extruder_inversion<P: Parameters>(&mut self, params: &P) {
        if let Some(invert) = params.flag('E') {
            self.settings.invert_extruder = invert;
        }
    }

    /// `C810`: letters `A` to `E` fill the toolbar slots from left to right
    #[cfg(all(feature = "proui-ex", feature = "toolbar"))]
    fn set_toolbar<P: Parameters>(&mut self, params: &P) {
        use crate::settings::{TOOLBAR_ITEMS, TOOLBAR_SLOTS};

        const SLOT_LETTERS: [char; TOOLBAR_SLOTS] = ['A', 'B', 'C', 'D', 'E'];

        for (slot, letter) in SLOT_LETTERS.iter().enumerate() {
            if let Some(item) = params.byte(*letter) {
                if item <= TOOLBAR_ITEMS {
                    self.settings.toolbar[slot] = item;
                } else {
                    warn!("C810: no toolbar item {}", item);
                }
            }
        }
    }

    /// `C851`: `S` feed rate and `M` probes per point with a probe, `Z` manual offset without
    #[cfg(feature = "proui-ex")]
    fn set_probe_settings<P: Parameters>(&mut self, params: &P) {
        #[cfg(feature = "bed-probe")]
        {
            use crate::settings::MAX_MULTIPLE_PROBING;

            if let Some(feedrate) = params.int('S') {
                match u16::try_from(feedrate) {
                    Ok(feedrate) if feedrate > 0 => self.settings.probe.z_feedrate = feedrate,
                    _ => warn!("C851: probe feed rate {} out of range", feedrate),
                }
            }
            if let Some(count) = params.byte('M') {
                if (1..=MAX_MULTIPLE_PROBING).contains(&count) {
                    self.settings.probe.multiple_probing = count;
                } else {
                    warn!("C851: {} probes per point out of range", count);
                }
            }
        }

        #[cfg(not(feature = "bed-probe"))]
        if let Some(offset) = params.float('Z') {
            if offset.is_finite() {
                self.settings.manual_z_offset = offset;
            }
        }
    }

    /// `C997`: leave the watchdog to reset the printer
    #[cfg(feature = "debug-dwin")]
    fn simulate_freeze<H: Host>(&mut self, host: &mut H) -> ! {
        host.reboot_screen();
        host.echo("Simulating a printer freeze");
        host.freeze()
    }
}

/// Set each of `X`, `Y` and `Z` that is given and within `range`
#[cfg(feature = "proui-ex")]
fn set_axes<P: Parameters>(
    position: &mut Position,
    params: &P,
    range: &core::ops::RangeInclusive<f32>,
    code: &str,
) {
    for (letter, axis) in [
        ('X', &mut position.x),
        ('Y', &mut position.y),
        ('Z', &mut position.z),
    ] {
        if let Some(value) = params.float(letter) {
            if range.contains(&value) {
                *axis = value;
            } else {
                warn!("{}: {} out of range", code, value);
            }
        }
    }
}
