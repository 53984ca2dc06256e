//! Machine state tracking
//!
//! The tracker remembers what the controller has been told so far (position,
//! motion mode, feed, laser power, focus and ventilation) and only produces
//! G-code when a requested value would render differently from the last one
//! sent. All values are compared after the same rounding used for output.
//!
//! Coordinates arrive in millimetres in job space. They are clamped to the bed
//! and then mirrored into device space on every call.

use crate::property::CuttingProperty;
use lasercut_core::Point;
use lasercut_settings::DriverSettings;
use tracing::warn;

/// Motion mode of a position update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Travel with the laser off (`G00`)
    Rapid,
    /// Cut or engrave with the laser on (`G01`)
    Cut,
}

impl FeedMode {
    /// Modal motion word
    pub fn word(self) -> &'static str {
        match self {
            Self::Rapid => "G00",
            Self::Cut => "G01",
        }
    }
}

/// Round to the 4 decimals used for coordinates; `-0` becomes `0`.
fn quantize(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0 + 0.0
}

/// State of one emission run.
#[derive(Debug)]
pub struct MachineState<'a> {
    settings: &'a DriverSettings,
    x: Option<f64>,
    y: Option<f64>,
    mode: Option<FeedMode>,
    feed: Option<i64>,
    /// Rendered power of the laser while it is on; `None` when off or unknown.
    laser: Option<i64>,
    /// Focus as requested, before the pass depth offset
    focus: Option<f64>,
    /// Sum of the relative Z steps taken between passes
    z_offset: f64,
    ventilation: Option<bool>,
    power: f64,
    speed: f64,
    laser_delay: f64,
    clamp_warned: bool,
}

impl<'a> MachineState<'a> {
    /// Fresh state with everything unset
    pub fn new(settings: &'a DriverSettings) -> Self {
        Self {
            settings,
            x: None,
            y: None,
            mode: None,
            feed: None,
            laser: None,
            focus: None,
            z_offset: 0.0,
            ventilation: None,
            power: 0.0,
            speed: 0.0,
            laser_delay: 0.0,
            clamp_warned: false,
        }
    }

    /// Forget everything the controller was told
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    /// Record the power (percent) for the next cutting move
    pub fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    /// Record the cutting speed (mm/min) for the next cutting move
    pub fn set_feed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Record the dwell (ms) issued after the laser switches on
    pub fn set_laser_delay(&mut self, delay_ms: f64) {
        self.laser_delay = delay_ms.max(0.0);
    }

    /// Move the head. Returns nothing when the position would not change.
    pub fn set_position(&mut self, target: Point, mode: FeedMode) -> Option<String> {
        let (x, y) = self.to_device(target);
        let x_changed = self.x != Some(x);
        let y_changed = self.y != Some(y);
        if !x_changed && !y_changed {
            return None;
        }

        let mut lines = Vec::new();
        match mode {
            FeedMode::Rapid => lines.extend(self.laser_off()),
            FeedMode::Cut => lines.extend(self.laser_on_if_changed()),
        }
        lines.push(self.motion(mode, x, y, x_changed, y_changed));
        Some(lines.join("\n"))
    }

    /// Fire the laser at `target` even if the head is already there.
    ///
    /// Used for single pixel runs, which would otherwise be dropped as a
    /// zero length move.
    pub fn cut_point(&mut self, target: Point) -> String {
        let (x, y) = self.to_device(target);
        let mut lines: Vec<String> = self.laser_on_if_changed().into_iter().collect();
        // restate the motion word too, so the line is a complete G01
        self.mode = None;
        lines.push(self.motion(FeedMode::Cut, x, y, true, true));
        lines.join("\n")
    }

    /// Move the focus axis. Ignored when the machine has no focus support.
    pub fn set_focus(&mut self, focus: f64) -> Option<String> {
        if !self.settings.machine.supports_focus || self.focus == Some(quantize(focus)) {
            return None;
        }
        Some(self.force_focus(focus))
    }

    /// Move the focus axis unconditionally.
    ///
    /// The absolute target includes the Z steps taken so far, so a focus
    /// change never undoes the pass depth.
    pub fn force_focus(&mut self, focus: f64) -> String {
        let focus = quantize(focus);
        let mut lines: Vec<String> = self.laser_off().into_iter().collect();
        lines.push(format!("G00 Z{:.4}", quantize(focus + self.z_offset)));
        self.focus = Some(focus);
        self.mode = None;
        lines.join("\n")
    }

    /// Return the focus axis to zero and drop the pass depth offset
    pub fn park_focus(&mut self) -> String {
        self.z_offset = 0.0;
        self.force_focus(0.0)
    }

    /// Switch ventilation. Ignored when the machine has no ventilation support.
    pub fn set_ventilation(&mut self, on: bool) -> Option<String> {
        if !self.settings.machine.supports_ventilation || self.ventilation == Some(on) {
            return None;
        }
        Some(self.force_ventilation(on))
    }

    /// Switch ventilation unconditionally
    pub fn force_ventilation(&mut self, on: bool) -> String {
        self.ventilation = Some(on);
        self.settings.gcode.ventilation_text(on)
    }

    /// Switch the laser off if it is on
    pub fn laser_off(&mut self) -> Option<String> {
        self.laser.take()?;
        Some(self.settings.gcode.laser_off_text())
    }

    /// Switch the laser off regardless of the tracked state
    pub fn force_laser_off(&mut self) -> String {
        self.laser = None;
        self.settings.gcode.laser_off_text()
    }

    /// Push every field of a property into the tracker.
    ///
    /// Focus and ventilation are emitted immediately; power, speed and delay
    /// take effect with the next cutting move.
    pub fn apply_property(&mut self, property: &CuttingProperty) -> Option<String> {
        let lines: Vec<String> = [
            self.set_focus(property.focus),
            self.set_ventilation(property.ventilation),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.set_power(property.power);
        self.set_feed(property.speed);
        self.set_laser_delay(property.laser_delay);

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    /// Lower the work by `depth` between passes
    pub fn step_z(&mut self, depth: f64) -> String {
        self.z_offset += depth;
        let mut lines: Vec<String> = self.laser_off().into_iter().collect();
        lines.push(format!("; Z step {:.4} mm", depth));
        lines.push(format!("G91 Z{:.4} G90", depth));
        lines.join("\n")
    }

    /// Clamp to the bed, then mirror into device space
    fn to_device(&mut self, target: Point) -> (f64, f64) {
        let machine = &self.settings.machine;
        let x = target.x.clamp(0.0, machine.bed_width);
        let y = target.y.clamp(0.0, machine.bed_height);
        if (x != target.x || y != target.y) && !self.clamp_warned {
            warn!(
                "Position {} lies outside the {}x{} mm bed; clamping",
                target, machine.bed_width, machine.bed_height
            );
            self.clamp_warned = true;
        }

        let x = if machine.mirror_x { -x } else { x };
        let y = if machine.mirror_y { -y } else { y };
        (quantize(x), quantize(y))
    }

    fn rendered_power(&self) -> i64 {
        if self.settings.machine.supports_power {
            (self.power * self.settings.machine.power_scale / 100.0).round() as i64
        } else {
            0
        }
    }

    fn laser_on_if_changed(&mut self) -> Option<String> {
        let power = self.rendered_power();
        if self.laser == Some(power) {
            return None;
        }
        self.laser = Some(power);

        let gcode = &self.settings.gcode;
        let mut text = gcode.laser_on_text();
        if self.settings.machine.supports_power {
            text.push_str(&format!(" S{}", power));
        }
        if self.laser_delay > 0.0 {
            text.push_str(&format!(
                "\n{}{:.3}",
                gcode.laser_delay_text(),
                self.laser_delay / 1000.0
            ));
        }
        Some(text)
    }

    fn motion(&mut self, mode: FeedMode, x: f64, y: f64, with_x: bool, with_y: bool) -> String {
        let mut words = Vec::new();
        let mode_changed = self.mode != Some(mode);
        if mode_changed {
            words.push(mode.word().to_string());
        }
        if with_x {
            words.push(format!("X{:.4}", x));
        }
        if with_y {
            words.push(format!("Y{:.4}", y));
        }

        let feed = match mode {
            FeedMode::Rapid => self.settings.machine.rapid_feed,
            FeedMode::Cut => Some(self.speed),
        };
        if let Some(feed) = feed.map(|f| f.round() as i64) {
            if mode_changed || self.feed != Some(feed) {
                words.push(format!("F{}", feed));
                self.feed = Some(feed);
            }
        }

        self.mode = Some(mode);
        self.x = Some(x);
        self.y = Some(y);
        words.join(" ")
    }
}
