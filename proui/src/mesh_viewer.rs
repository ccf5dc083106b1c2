//! Graphical view of the bed leveling mesh.
//!
//! Every probed point is drawn as a filled circle on a grid spanning the width of the panel.  The
//! circle's color runs along a rainbow gradient and its radius grows with the height of the
//! point, both saturating at ±0.20 mm, and the height is printed on top of it.  Below the grid
//! sit the buttons and the status line shows the lowest and highest point.

use embedded_hal_1::delay::DelayNs;

use crate::color::{rainbow, ColorTable, UiElement};
use crate::font::{self, Font, Label};
use crate::hal::{Area, Button, Canvas, Watchdog};

/// Most probe points per mesh axis
pub const GRID_LIMIT: usize = 9;

/// Width of the panel in portrait orientation
pub const DISPLAY_WIDTH: u16 = 272;

/// Space left of, right of and below the grid
pub const MARGIN: u16 = 25;

/// Distance between the top of the panel and the top of the main area
pub const TITLE_OFFSET: u16 = 30;

/// Width (and height) spanned by the grid
pub const GRID_WIDTH: u16 = DISPLAY_WIDTH - 2 * MARGIN;

/// Radius of the circle drawn for the lowest point
pub const RADIUS_MIN: u16 = 5;

/// Lowest height the gradient and the radius distinguish, in hundredths of a mm
pub const CENTI_MIN: i16 = -20;

/// Highest height the gradient and the radius distinguish, in hundredths of a mm
pub const CENTI_MAX: i16 = 20;

/// Height of the row of buttons below the grid
pub const BUTTON_ROW_Y: u16 = 305;

/// Area cleared instead of drawing the grid when only the buttons need to be redrawn
const BUTTON_STRIP: Area = Area {
    x: 89,
    y: BUTTON_ROW_Y,
    width: 99,
    height: 38,
};

const CAPTION: &str = "Mesh Viewer";

/// Capacity of the min/max status text, enough for two `f32`s of any finite magnitude
const STATUS_LEN: usize = 112;

/// The flavor of display the viewer draws on
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, strum::VariantArray)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayProfile {
    /// DWIN T5L panels as shipped with the printer
    #[default]
    Dwin,
    /// TJC panels, which run the DWIN protocol but are slower to draw and use a larger font
    Tjc,
}

impl DisplayProfile {
    pub fn font(self) -> Font {
        match self {
            Self::Dwin => Font::Font6x12,
            Self::Tjc => Font::Font8x16,
        }
    }

    /// Meshes with at least this many columns get the compact labels, since the full ones
    /// would overlap
    pub fn compact_label_columns(self) -> u8 {
        match self {
            Self::Dwin => 9,
            Self::Tjc => 8,
        }
    }

    /// Pause after each point so the panel can keep up
    pub fn point_delay_ms(self) -> u32 {
        match self {
            Self::Dwin => 0,
            Self::Tjc => 100,
        }
    }
}

/// Bed leveling mesh heights, in mm.
///
/// Storage is always `GRID_LIMIT × GRID_LIMIT`; only the first `x_points × y_points` are in use.
/// Points that weren't probed are NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct BedMesh {
    z: [[f32; GRID_LIMIT]; GRID_LIMIT],
    x_points: u8,
    y_points: u8,
}

impl BedMesh {
    /// An unprobed mesh.  Dimensions are clamped to `2..=GRID_LIMIT`.
    pub fn new(x_points: u8, y_points: u8) -> Self {
        Self {
            z: [[f32::NAN; GRID_LIMIT]; GRID_LIMIT],
            x_points: x_points.clamp(2, GRID_LIMIT as u8),
            y_points: y_points.clamp(2, GRID_LIMIT as u8),
        }
    }

    /// A mesh whose heights are given by `height(x, y)`
    pub fn from_fn(x_points: u8, y_points: u8, mut height: impl FnMut(u8, u8) -> f32) -> Self {
        let mut mesh = Self::new(x_points, y_points);
        for x in 0..mesh.x_points {
            for y in 0..mesh.y_points {
                mesh.z[x as usize][y as usize] = height(x, y);
            }
        }

        mesh
    }

    pub fn x_points(&self) -> u8 {
        self.x_points
    }

    pub fn y_points(&self) -> u8 {
        self.y_points
    }

    /// Height at `(x, y)`, or NaN outside of the mesh
    pub fn get(&self, x: u8, y: u8) -> f32 {
        if x < self.x_points && y < self.y_points {
            self.z[x as usize][y as usize]
        } else {
            f32::NAN
        }
    }

    /// Set the height at `(x, y)`.  Returns `false`, leaving the mesh alone, if the point lies
    /// outside of it.
    pub fn set(&mut self, x: u8, y: u8, z: f32) -> bool {
        if x < self.x_points && y < self.y_points {
            self.z[x as usize][y as usize] = z;
            true
        } else {
            false
        }
    }
}

/// Lowest and highest height seen while drawing a mesh.  NaN heights are not counted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeightRange {
    bounds: Option<(f32, f32)>,
}

impl HeightRange {
    pub fn observe(&mut self, z: f32) {
        if z.is_nan() {
            return;
        }

        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(z), max.max(z)),
            None => (z, z),
        });
    }

    pub fn min(&self) -> Option<f32> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f32> {
        self.bounds.map(|(_, max)| max)
    }
}

/// Convert a height in mm to hundredths of a mm, rounded, with NaN read as level
fn centi(z: f32) -> i32 {
    if z.is_nan() {
        0
    } else {
        libm::roundf(z * 100.0) as i32
    }
}

/// Height in hundredths of a mm, clamped to the range the gradient and the radius cover.  NaN
/// counts as level.
pub fn height_to_centi(z: f32) -> i16 {
    centi(z).clamp(CENTI_MIN as i32, CENTI_MAX as i32) as i16
}

/// Pixel geometry of a grid of `size_x × size_y` points
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridLayout {
    size_x: u8,
    size_y: u8,
    radius_max: u16,
}

impl GridLayout {
    /// Sizes are clamped to `2..=GRID_LIMIT`
    pub fn new(size_x: u8, size_y: u8) -> Self {
        let size_x = size_x.clamp(2, GRID_LIMIT as u8);
        let size_y = size_y.clamp(2, GRID_LIMIT as u8);

        // Half the distance between columns, so neighbouring circles never overlap, but never
        // wider than the margin
        let radius_max = (GRID_WIDTH / (2 * (size_x as u16 - 1)))
            .min(MARGIN - 2)
            .max(RADIUS_MIN);

        Self {
            size_x,
            size_y,
            radius_max,
        }
    }

    pub fn size_x(&self) -> u8 {
        self.size_x
    }

    pub fn size_y(&self) -> u8 {
        self.size_y
    }

    pub fn radius_max(&self) -> u16 {
        self.radius_max
    }

    /// Horizontal pixel position of column `x`
    pub fn px(&self, x: u8) -> u16 {
        MARGIN + (x as u32 * GRID_WIDTH as u32 / (self.size_x as u32 - 1)) as u16
    }

    /// Vertical pixel position of row `y`; row 0 is at the bottom, as the bed is seen from the
    /// front
    pub fn py(&self, y: u8) -> u16 {
        (TITLE_OFFSET + DISPLAY_WIDTH - MARGIN)
            .saturating_sub(y as u16 * GRID_WIDTH / (self.size_y as u16 - 1))
    }

    /// Circle radius for a height in hundredths of a mm.
    ///
    /// Grows linearly from [`RADIUS_MIN`] at [`CENTI_MIN`] to [`Self::radius_max`] at
    /// [`CENTI_MAX`], and saturates outside of that range.
    pub fn radius(&self, centi: i16) -> u16 {
        let centi = centi.clamp(CENTI_MIN, CENTI_MAX) as i32;
        let span = (self.radius_max - RADIUS_MIN) as i32;

        ((centi - CENTI_MIN as i32) * span / (CENTI_MAX - CENTI_MIN) as i32 + RADIUS_MIN as i32)
            as u16
    }
}

/// What the viewer screen should show
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ViewerOptions {
    /// Offer a Save button next to Continue
    pub with_save: bool,
    /// Draw the mesh again; otherwise only the buttons are redrawn over the existing mesh
    pub redraw: bool,
    /// Save, rather than Continue, is the highlighted button
    pub save_selected: bool,
}

/// Draws the bed mesh and keeps the height range of the last drawing for the status line
#[derive(Clone, Debug, Default)]
pub struct MeshViewer {
    profile: DisplayProfile,
    range: HeightRange,
}

impl MeshViewer {
    pub fn new(profile: DisplayProfile) -> Self {
        Self {
            profile,
            range: HeightRange::default(),
        }
    }

    pub fn profile(&self) -> DisplayProfile {
        self.profile
    }

    /// Height range of the most recent mesh drawing
    pub fn range(&self) -> HeightRange {
        self.range
    }

    /// Draw the whole viewer screen: title, mesh (or just the button strip), buttons and the
    /// min/max status line.
    pub fn draw<C: Canvas, W: Watchdog, D: DelayNs>(
        &mut self,
        canvas: &mut C,
        mesh: &BedMesh,
        colors: &ColorTable,
        options: ViewerOptions,
        watchdog: &mut W,
        delay: &mut D,
    ) -> Result<(), C::Error> {
        canvas.show_caption(CAPTION)?;

        if options.redraw {
            self.draw_mesh(canvas, mesh, colors, watchdog, delay)?;
        } else {
            canvas.fill_box(colors.get(UiElement::Background), BUTTON_STRIP)?;
        }

        if options.with_save {
            canvas.draw_button(Button::Save, 26, BUTTON_ROW_Y)?;
            canvas.draw_button(Button::Continue, 146, BUTTON_ROW_Y)?;
            canvas.draw_select_highlight(options.save_selected, BUTTON_ROW_Y)?;
        } else {
            canvas.draw_button(Button::Continue, 86, BUTTON_ROW_Y)?;
        }

        canvas.set_status(&self.status())
    }

    /// Draw the grid and every point of `mesh`, feeding the watchdog once per row.
    pub fn draw_mesh<C: Canvas, W: Watchdog, D: DelayNs>(
        &mut self,
        canvas: &mut C,
        mesh: &BedMesh,
        colors: &ColorTable,
        watchdog: &mut W,
        delay: &mut D,
    ) -> Result<(), C::Error> {
        let layout = self.draw_mesh_grid(canvas, mesh.x_points(), mesh.y_points(), colors)?;

        for y in 0..layout.size_y() {
            watchdog.refresh();
            for x in 0..layout.size_x() {
                self.draw_mesh_point(canvas, &layout, x, y, mesh.get(x, y), colors)?;

                let pause = self.profile.point_delay_ms();
                if pause > 0 {
                    delay.delay_ms(pause);
                }
            }
        }

        debug!(
            "mesh drawn, {} x {} points",
            layout.size_x(),
            layout.size_y()
        );

        Ok(())
    }

    /// Clear the main area and draw the outline and inner lines of the grid.  Starts a new height
    /// range.
    pub fn draw_mesh_grid<C: Canvas>(
        &mut self,
        canvas: &mut C,
        size_x: u8,
        size_y: u8,
        colors: &ColorTable,
    ) -> Result<GridLayout, C::Error> {
        let layout = GridLayout::new(size_x, size_y);
        let color = colors.get(UiElement::SplitLine);
        let (last_x, last_y) = (layout.size_x() - 1, layout.size_y() - 1);

        self.range = HeightRange::default();

        canvas.clear_main_area()?;
        canvas.draw_rectangle(
            color,
            layout.px(0),
            layout.py(0),
            layout.px(last_x),
            layout.py(last_y),
        )?;
        for x in 1..last_x {
            canvas.draw_vline(color, layout.px(x), layout.py(last_y), GRID_WIDTH)?;
        }
        for y in 1..last_y {
            canvas.draw_hline(color, layout.px(0), layout.py(y), GRID_WIDTH)?;
        }

        Ok(layout)
    }

    /// Draw the circle and the label of a single point
    pub fn draw_mesh_point<C: Canvas>(
        &mut self,
        canvas: &mut C,
        layout: &GridLayout,
        x: u8,
        y: u8,
        z: f32,
        colors: &ColorTable,
    ) -> Result<(), C::Error> {
        let font = self.profile.font();
        let fs = font.width();
        let v = height_to_centi(z);
        self.range.observe(z);

        let (cx, cy) = (layout.px(x), layout.py(y));
        trace!("point {} {} z={} v={}", x, y, z, v);

        canvas.fill_circle(rainbow(v, CENTI_MIN, CENTI_MAX), cx, cy, layout.radius(v))?;

        let label: Option<(u16, Label)> = if layout.size_x() < self.profile.compact_label_columns() {
            if v == 0 {
                Some((cx.saturating_sub(2 * fs), font::fixed(0.0, 2)))
            } else {
                Some((cx.saturating_sub(3 * fs), font::signed(z, 2)))
            }
        } else {
            // Compact labels follow the unclamped height
            match centi(z) {
                -999..=-100 | 100..=999 => Some((cx.saturating_sub(3 * fs), font::signed(z, 1))),
                0 => font::compact_centi(0).map(|label| (cx.saturating_sub(4), label)),
                value => font::compact_centi(value).map(|label| (cx.saturating_sub(2 * fs), label)),
            }
        };

        if let Some((label_x, text)) = label {
            canvas.draw_string(
                font,
                colors.get(UiElement::Text),
                colors.get(UiElement::Background),
                label_x,
                cy.saturating_sub(fs),
                &text,
            )?;
        }

        Ok(())
    }

    /// `Mesh minZ: -0.12, maxZ: 0.08`, or dashes if no point had a height
    pub fn status(&self) -> heapless::String<STATUS_LEN> {
        use core::fmt::Write;

        let mut status = heapless::String::new();
        let written = match (self.range.min(), self.range.max()) {
            (Some(min), Some(max)) => write!(status, "Mesh minZ: {:.2}, maxZ: {:.2}", min, max),
            _ => status.write_str("Mesh minZ: --, maxZ: --"),
        };
        if written.is_err() {
            warn!("mesh status truncated");
        }

        status
    }
}
