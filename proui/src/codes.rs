//! The custom `C<n>` G-codes understood by the UI.
//!
//! Which codes exist depends on the enabled features, just like the matching firmware options:
//! a code whose feature is off is unknown, and is treated like any other unknown code.

/// A known custom G-code, with its number as the discriminant
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::FromRepr, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i16)]
pub enum CustomCode {
    /// `C10`: mark the G-code file being printed as a configuration file
    #[cfg(all(feature = "proui-ex", feature = "media"))]
    MarkConfigFile = 10,

    /// `C11 E<element> R<red> G<green> B<blue>`: set the color of a UI element
    #[cfg(feature = "custom-colors")]
    SetElementColor = 11,

    /// `C29 L R F B N X Y`: mesh probing area and grid size
    #[cfg(all(feature = "proui-ex", feature = "mesh"))]
    MeshSettings = 29,

    /// `C35 [T<point>]`: tram a corner, or start the tramming wizard
    #[cfg(feature = "bed-tramming")]
    BedTramming = 35,

    /// `C100 X Y Z`: physical minimums
    #[cfg(feature = "proui-ex")]
    PhysicalMinimums = 100,

    /// `C101 X Y Z`: physical maximums
    #[cfg(feature = "proui-ex")]
    PhysicalMaximums = 101,

    /// `C102 X Y`: bed size
    #[cfg(feature = "proui-ex")]
    BedSize = 102,

    /// `C104 S<temp>`: hotend max temperature
    #[cfg(feature = "proui-ex")]
    HotendMaxTemp = 104,

    /// `C108`: cancel a wait for user without an emergency parser
    CancelWaitForUser = 108,

    /// `C115`: PRO UI build info
    #[cfg(feature = "proui-ex")]
    Info = 115,

    /// `C125 X Y Z`: nozzle park position
    #[cfg(all(feature = "proui-ex", feature = "nozzle-park"))]
    ParkPosition = 125,

    /// `C250 P<bool>`: enable or disable the G-code preview
    #[cfg(feature = "gcode-preview")]
    Preview = 250,

    /// `C412 M<mode>`: runout sensor active mode
    #[cfg(all(feature = "proui-ex", feature = "runout-sensor"))]
    RunoutMode = 412,

    /// `C510 [U<bool>]`: lock or unlock the screen
    #[cfg(feature = "lockscreen")]
    LockScreen = 510,

    /// `C562 E<bool>`: invert the extruder direction
    #[cfg(feature = "proui-ex")]
    InvertExtruder = 562,

    /// `C810 A B C D E`: toolbar layout
    #[cfg(all(feature = "proui-ex", feature = "toolbar"))]
    Toolbar = 810,

    /// `C851`: probe feed rate and multi-probing, or the manual Z offset without a probe
    #[cfg(feature = "proui-ex")]
    ProbeSettings = 851,

    /// `C997`: simulate a printer freeze
    #[cfg(feature = "debug-dwin")]
    SimulateFreeze = 997,
}

impl CustomCode {
    /// Look up a code by its number
    pub fn from_number(number: i16) -> Option<Self> {
        Self::from_repr(number)
    }

    pub fn number(self) -> i16 {
        self as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn numbers_round_trip() {
        for code in CustomCode::VARIANTS {
            assert_eq!(Some(*code), CustomCode::from_number(code.number()));
        }
    }

    #[test]
    fn numbers_are_the_firmware_ones() {
        assert_eq!(Some(CustomCode::CancelWaitForUser), CustomCode::from_number(108));
        assert_eq!(None, CustomCode::from_number(0));
        assert_eq!(None, CustomCode::from_number(-108));
        assert_eq!(None, CustomCode::from_number(109));

        #[cfg(feature = "custom-colors")]
        assert_eq!(Some(CustomCode::SetElementColor), CustomCode::from_number(11));
        #[cfg(not(feature = "debug-dwin"))]
        assert_eq!(None, CustomCode::from_number(997));
    }
}
