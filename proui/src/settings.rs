//! Machine settings the extended custom G-codes adjust at runtime, and the report that prints them
//! back as replayable commands.

use crate::hal::{echo, Host};
use crate::mesh_viewer::GRID_LIMIT;

/// Range accepted for each physical minimum (`C100`), in mm
pub const MIN_POSITION_RANGE: core::ops::RangeInclusive<f32> = -100.0..=100.0;

/// Range accepted for each physical maximum (`C101`) and the bed size (`C102`), in mm
pub const MAX_POSITION_RANGE: core::ops::RangeInclusive<f32> = 100.0..=999.0;

/// Highest temperature the hotend thermistor table covers, in °C
pub const THERMISTOR_MAX_TEMP: i16 = 300;

/// Lowest hotend max temperature `C104` accepts, in °C
pub const HOTEND_MAX_TEMP_FLOOR: i16 = 180;

/// Fewest probe points per mesh axis
pub const GRID_MIN_POINTS: u8 = 3;

/// Most probes `C851 M` allows per point
pub const MAX_MULTIPLE_PROBING: u8 = 5;

/// Number of configurable toolbar slots
pub const TOOLBAR_SLOTS: usize = 5;

/// Number of items that can go into a toolbar slot; 0 leaves the slot empty
pub const TOOLBAR_ITEMS: u8 = 20;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BedSize {
    pub x: f32,
    pub y: f32,
}

/// Which level the filament runout sensor reports when filament is present
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::FromRepr, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RunoutMode {
    Low = 0,
    High = 1,
    /// Motion sensor: runout is detected by the absence of pulses
    Motion = 2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeSettings {
    /// Z feed rate while probing, in mm/min
    pub z_feedrate: u16,
    /// Number of probes taken per point
    pub multiple_probing: u8,
}

/// Probing area and grid size of mesh bed leveling
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeshSettings {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub grid_x: u8,
    pub grid_y: u8,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineSettings {
    pub min_position: Position,
    pub max_position: Position,
    pub bed_size: BedSize,
    pub hotend_max_temp: i16,
    pub park_position: Position,
    pub runout_mode: RunoutMode,
    pub invert_extruder: bool,
    pub probe: ProbeSettings,
    /// Z offset used when no probe is fitted, in mm
    pub manual_z_offset: f32,
    pub mesh: MeshSettings,
    pub toolbar: [u8; TOOLBAR_SLOTS],
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            min_position: Position::new(0.0, 0.0, 0.0),
            max_position: Position::new(235.0, 235.0, 250.0),
            bed_size: BedSize { x: 230.0, y: 230.0 },
            hotend_max_temp: 275,
            park_position: Position::new(10.0, 225.0, 20.0),
            runout_mode: RunoutMode::High,
            invert_extruder: false,
            probe: ProbeSettings {
                z_feedrate: 240,
                multiple_probing: 2,
            },
            manual_z_offset: 0.0,
            mesh: MeshSettings {
                min_x: 25.0,
                max_x: 205.0,
                min_y: 25.0,
                max_y: 205.0,
                grid_x: 5,
                grid_y: 5,
            },
            toolbar: [1, 2, 3, 4, 5],
        }
    }
}

/// Clamp a mesh grid size into the range the firmware can store
pub fn clamp_grid_points(points: u8) -> u8 {
    points.clamp(GRID_MIN_POINTS, GRID_LIMIT as u8)
}

impl MachineSettings {
    /// Echo the settings as the commands that would restore them, e.g. `C100 X0.00 Y0.00 Z0.00`.
    ///
    /// Unless `for_replay` is set, each command is preceded by a `;` comment naming it.
    pub fn report<H: Host + ?Sized>(&self, for_replay: bool, host: &mut H) {
        let heading = |host: &mut H, title: &str| {
            if !for_replay {
                echo(host, format_args!("; {}", title));
            }
        };

        heading(host, "Physical minimums");
        let min = &self.min_position;
        echo(host, format_args!("  C100 X{:.2} Y{:.2} Z{:.2}", min.x, min.y, min.z));

        heading(host, "Physical maximums");
        let max = &self.max_position;
        echo(host, format_args!("  C101 X{:.2} Y{:.2} Z{:.2}", max.x, max.y, max.z));

        heading(host, "Bed size");
        echo(
            host,
            format_args!("  C102 X{:.2} Y{:.2}", self.bed_size.x, self.bed_size.y),
        );

        #[cfg(feature = "mesh")]
        {
            heading(host, "Mesh bed leveling");
            let mesh = &self.mesh;
            echo(
                host,
                format_args!(
                    "  C29 L{:.2} R{:.2} F{:.2} B{:.2} X{} Y{}",
                    mesh.min_x, mesh.max_x, mesh.min_y, mesh.max_y, mesh.grid_x, mesh.grid_y
                ),
            );
        }

        heading(host, "Hotend max temp");
        echo(host, format_args!("  C104 S{}", self.hotend_max_temp));

        #[cfg(feature = "nozzle-park")]
        {
            heading(host, "Park position");
            let park = &self.park_position;
            echo(
                host,
                format_args!("  C125 X{:.2} Y{:.2} Z{:.2}", park.x, park.y, park.z),
            );
        }

        #[cfg(feature = "runout-sensor")]
        {
            heading(host, "Runout sensor mode");
            echo(host, format_args!("  C412 M{}", self.runout_mode as u8));
        }

        heading(host, "Invert extruder");
        echo(host, format_args!("  C562 E{}", self.invert_extruder as u8));

        #[cfg(feature = "bed-probe")]
        {
            heading(host, "Probe settings");
            echo(
                host,
                format_args!(
                    "  C851 S{} M{}",
                    self.probe.z_feedrate, self.probe.multiple_probing
                ),
            );
        }

        #[cfg(not(feature = "bed-probe"))]
        {
            heading(host, "Manual Z offset");
            echo(host, format_args!("  C851 Z{:.2}", self.manual_z_offset));
        }
    }
}
