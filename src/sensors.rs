// ── Attitude from motion sensors ──────────────────────────────────────────────
//
// Turns raw accelerometer (and optionally magnetometer) samples into a
// smoothed device attitude: roll, pitch, and — when a magnetic sample is
// supplied — heading.  Samples arrive in the device's natural axes
// (x right, y toward the top edge, z out of the screen); the filter first
// remaps them for the current display rotation so that a device used in
// landscape reads the same as one used upright.
//
// This module is pure math.  Feeding it samples is the host's job; nothing
// here talks to the platform.

use crate::display::Rotation;

/// Standard gravity in m/s², used to normalize accelerometer samples.
pub const STANDARD_GRAVITY: f64 = 9.80665;

// Smoothing weight applied to each new sample, picked between these two
// ends by the filter's responsiveness setting.
const AVERAGING_MIN: f64 = 0.01;
const AVERAGING_MAX: f64 = 0.1;

fn mix(x: f64, y: f64, t: f64) -> f64 {
    x * (1.0 - t) + y * t
}

fn rot2d(x: &mut f64, y: &mut f64, a: f64) {
    let (sn, cs) = a.sin_cos();
    let x2 = *x * cs - *y * sn;
    let y2 = *x * sn + *y * cs;
    *x = x2;
    *y = y2;
}

/// Remap a sensor vector from natural device axes into the axes of the
/// display as currently rotated.  The z axis is unaffected.
pub fn remap_axes(v: [f64; 3], rotation: Rotation) -> [f64; 3] {
    let [x, y, z] = v;
    match rotation {
        Rotation::Deg0 => [x, y, z],
        Rotation::Deg90 => [-y, x, z],
        Rotation::Deg180 => [-x, -y, z],
        Rotation::Deg270 => [y, -x, z],
    }
}

// ── Attitude ──────────────────────────────────────────────────────────────────

/// Device orientation estimate.  Angles are radians.
///
/// `heading_rad` uses a south-zero azimuth: 0 when the top edge points
/// magnetic south, π/2 east, π north.  It is `None` when no magnetometer
/// sample has been folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll_rad: f64,
    pub pitch_rad: f64,
    pub heading_rad: Option<f64>,
}

impl Attitude {
    pub fn roll_deg(&self) -> f64 {
        self.roll_rad.to_degrees()
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_rad.to_degrees()
    }

    pub fn heading_deg(&self) -> Option<f64> {
        self.heading_rad.map(f64::to_degrees)
    }
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// Exponential smoothing filter over sensor samples.
///
/// The first sample after construction (or [`reset`]) is taken as-is so the
/// estimate does not crawl from zero; later samples are blended in with a
/// weight set by `responsiveness` (0.0 = steadiest, 1.0 = quickest).
/// Smoothing happens in natural device axes; rotation remapping is applied
/// per query so a rotation change never pollutes the filtered state.
///
/// [`reset`]: AttitudeFilter::reset
#[derive(Debug, Clone)]
pub struct AttitudeFilter {
    responsiveness: f64,
    accel: [f64; 3],
    magnet: [f64; 3],
    first_measure: bool,
}

impl AttitudeFilter {
    pub fn new(responsiveness: f64) -> Self {
        Self {
            responsiveness: responsiveness.clamp(0.0, 1.0),
            accel: [0.0; 3],
            magnet: [0.0; 3],
            first_measure: true,
        }
    }

    /// Forget the filtered state; the next sample snaps.
    pub fn reset(&mut self) {
        self.first_measure = true;
    }

    pub fn responsiveness(&self) -> f64 {
        self.responsiveness
    }

    pub fn set_responsiveness(&mut self, responsiveness: f64) {
        self.responsiveness = responsiveness.clamp(0.0, 1.0);
    }

    fn averaging_coef(&self) -> f64 {
        if self.first_measure {
            1.0
        } else {
            mix(AVERAGING_MIN, AVERAGING_MAX, self.responsiveness)
        }
    }

    fn blend(state: &mut [f64; 3], sample: [f64; 3], coef: f64) {
        for (s, v) in state.iter_mut().zip(sample) {
            *s = mix(*s, v, coef);
        }
    }

    /// Fold in an accelerometer sample (m/s², natural device axes) and
    /// return the updated attitude.  Heading is left `None`.
    pub fn update(&mut self, accel: [f64; 3], rotation: Rotation) -> Attitude {
        let coef = self.averaging_coef();
        self.first_measure = false;
        Self::blend(&mut self.accel, accel.map(|v| v / STANDARD_GRAVITY), coef);

        let [x, y, z] = remap_axes(self.accel, rotation);
        let roll = (-x).atan2(y);
        let pitch = (-z).atan2((x * x + y * y).sqrt());
        Attitude {
            roll_rad: roll,
            pitch_rad: pitch,
            heading_rad: None,
        }
    }

    /// Fold in an accelerometer plus magnetometer sample pair and return
    /// the attitude with heading filled in.  The magnetic vector is
    /// de-rolled and de-pitched with the freshly computed angles before the
    /// azimuth is read off.
    pub fn update_with_heading(
        &mut self,
        accel: [f64; 3],
        magnet: [f64; 3],
        rotation: Rotation,
    ) -> Attitude {
        let coef = self.averaging_coef();
        let mut attitude = self.update(accel, rotation);
        Self::blend(&mut self.magnet, magnet, coef);

        let [mut x, mut y, mut z] = remap_axes(self.magnet, rotation);
        rot2d(&mut x, &mut y, -attitude.roll_rad);
        rot2d(&mut y, &mut z, attitude.pitch_rad);
        attitude.heading_rad = Some((-x).atan2(z));
        attitude
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn remap_matches_rotation_table() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(remap_axes(v, Rotation::Deg0), [1.0, 2.0, 3.0]);
        assert_eq!(remap_axes(v, Rotation::Deg90), [-2.0, 1.0, 3.0]);
        assert_eq!(remap_axes(v, Rotation::Deg180), [-1.0, -2.0, 3.0]);
        assert_eq!(remap_axes(v, Rotation::Deg270), [2.0, -1.0, 3.0]);
    }

    #[test]
    fn remap_never_touches_z() {
        let v = [0.3, -0.7, 42.0];
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            assert_eq!(remap_axes(v, rotation)[2], 42.0);
        }
    }

    #[test]
    fn remap_half_turn_is_a_point_reflection() {
        // Applying the 180° remap twice restores the sample; one application
        // negates x and y.
        let v = [1.5, -2.5, 3.5];
        let once = remap_axes(v, Rotation::Deg180);
        assert_eq!(once, [-1.5, 2.5, 3.5]);
        assert_eq!(remap_axes(once, Rotation::Deg180), v);
    }

    #[test]
    fn remap_quarter_turns_are_inverses() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(remap_axes(remap_axes(v, Rotation::Deg90), Rotation::Deg270), v);
        assert_eq!(remap_axes(remap_axes(v, Rotation::Deg270), Rotation::Deg90), v);
    }

    #[test]
    fn flat_on_back_pitches_straight_down() {
        // Screen up on a table: gravity reaction is all +z.
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update([0.0, 0.0, STANDARD_GRAVITY], Rotation::Deg0);
        assert!((a.pitch_rad + FRAC_PI_2).abs() < EPS);
        assert!(a.roll_rad.abs() < EPS);
    }

    #[test]
    fn upright_is_level() {
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update([0.0, STANDARD_GRAVITY, 0.0], Rotation::Deg0);
        assert!(a.roll_rad.abs() < EPS);
        assert!(a.pitch_rad.abs() < EPS);
    }

    #[test]
    fn rolled_onto_right_edge_reads_quarter_turn() {
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update([STANDARD_GRAVITY, 0.0, 0.0], Rotation::Deg0);
        assert!((a.roll_rad + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn display_rotation_cancels_physical_roll() {
        // Same physical pose as the rolled case, but the display has
        // followed the device into landscape; the remap makes it level.
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update([STANDARD_GRAVITY, 0.0, 0.0], Rotation::Deg90);
        assert!(a.roll_rad.abs() < EPS);
        assert!(a.pitch_rad.abs() < EPS);
    }

    #[test]
    fn first_sample_snaps_even_when_sluggish() {
        let mut filter = AttitudeFilter::new(0.0);
        let a = filter.update([0.0, 0.0, STANDARD_GRAVITY], Rotation::Deg0);
        assert!((a.pitch_rad + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn reset_snaps_the_next_sample() {
        let mut filter = AttitudeFilter::new(0.0);
        filter.update([0.0, 0.0, STANDARD_GRAVITY], Rotation::Deg0);
        filter.reset();
        let a = filter.update([0.0, STANDARD_GRAVITY, 0.0], Rotation::Deg0);
        assert!(a.pitch_rad.abs() < EPS);
    }

    #[test]
    fn later_samples_are_smoothed_in() {
        let mut filter = AttitudeFilter::new(1.0);
        filter.update([0.0, 0.0, STANDARD_GRAVITY], Rotation::Deg0);
        // A sudden swing to upright barely moves the estimate.
        let a = filter.update([0.0, STANDARD_GRAVITY, 0.0], Rotation::Deg0);
        assert!(a.pitch_deg() < -80.0);
        assert!(a.pitch_deg() > -90.0);
    }

    #[test]
    fn responsiveness_widens_the_step() {
        let swing = |responsiveness: f64| {
            let mut filter = AttitudeFilter::new(responsiveness);
            filter.update([0.0, 0.0, STANDARD_GRAVITY], Rotation::Deg0);
            filter
                .update([0.0, STANDARD_GRAVITY, 0.0], Rotation::Deg0)
                .pitch_rad
        };
        // Quicker settings move further toward the new pose per sample.
        assert!(swing(1.0) > swing(0.0));
    }

    #[test]
    fn responsiveness_is_clamped() {
        assert_eq!(AttitudeFilter::new(7.0).responsiveness(), 1.0);
        assert_eq!(AttitudeFilter::new(-3.0).responsiveness(), 0.0);
    }

    #[test]
    fn heading_flat_facing_north() {
        // Flat on a table, top edge toward magnetic north, field dipping
        // into the ground: south-zero azimuth reads ±π (the wrap point).
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update_with_heading(
            [0.0, 0.0, STANDARD_GRAVITY],
            [0.0, 30.0, -40.0],
            Rotation::Deg0,
        );
        assert!((a.heading_rad.unwrap().abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn heading_flat_facing_east() {
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update_with_heading(
            [0.0, 0.0, STANDARD_GRAVITY],
            [-30.0, 0.0, -40.0],
            Rotation::Deg0,
        );
        assert!((a.heading_rad.unwrap() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn accel_only_update_leaves_heading_unset() {
        let mut filter = AttitudeFilter::new(0.5);
        let a = filter.update([0.0, STANDARD_GRAVITY, 0.0], Rotation::Deg0);
        assert!(a.heading_rad.is_none());
        assert!(a.heading_deg().is_none());
    }
}
