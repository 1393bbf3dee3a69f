//! Thrust mixing for two-wheeled differential-drive vehicles.
//!
//! `MixerConfig` converts normalized steering/throttle commands into
//! independent left/right wheel thrusts. The command pair is treated as a 2-D
//! vector in polar form: as its heading moves away from a quadrant center,
//! the main wheel's thrust tapers off while the other wheel is boosted to
//! compensate, which turns the vehicle smoothly.
//!
//! # Example
//! ```rust
//! use ddr_core::utils::math::thrust::MixerConfig;
//! let mixer = MixerConfig::default();
//! let thrust = mixer.mix(0.0, 1.0);
//! assert!(thrust.left > 0.0 && thrust.left == thrust.right);
//! ```

use core::f32::consts::PI;
use libm;

/// Left/right wheel thrust pair, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelThrust {
    pub left: f32,
    pub right: f32,
}

/// Tuning parameters that scale operator input onto the command vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    /// Scale applied to the steering input (negative flips the turn direction).
    pub steering_gain: f32,
    /// Constant trim added after the steering gain.
    pub steering_offset: f32,
    /// Scale applied to the throttle input.
    pub throttle_gain: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        MixerConfig {
            steering_gain: -0.65,
            steering_offset: 0.0,
            throttle_gain: 0.8,
        }
    }
}

impl MixerConfig {
    /// Mix steering and throttle (each nominally in `[-1, 1]`) into wheel thrusts.
    ///
    /// Inputs are not validated; out-of-range values pass through the math
    /// and are only caught at the radius clamp in the thrust table and the
    /// final `[-1, 1]` bound on each component.
    pub fn mix(
        &self,
        steering: f32,
        throttle: f32,
    ) -> WheelThrust {
        let value_y = steering * self.steering_gain + self.steering_offset;
        let value_x = throttle * self.throttle_gain;

        // polar form of the command vector, radius as a percentage
        let theta = libm::atan2f(value_y, value_x);
        let radial_x = value_x.abs() * libm::cosf(theta);
        let radial_y = value_y.abs() * libm::sinf(theta);
        let radius = libm::sqrtf(radial_x * radial_x + radial_y * radial_y) * 100.0;
        let theta_deg = libm::atan2f(radial_y, radial_x) * (180.0 / PI);

        let (left, right) = throttle_angle_to_thrust(radius, theta_deg);
        WheelThrust {
            left: (left / 100.0).clamp(-1.0, 1.0),
            right: (right / 100.0).clamp(-1.0, 1.0),
        }
    }
}

/// Non-negative remainder of `a / m`, also for negative `a`.
fn floor_mod(
    a: f32,
    m: f32,
) -> f32 {
    let r = a % m;
    if r < 0.0 {
        r + m
    } else {
        r
    }
}

/// Map a polar drive command onto `(left, right)` thrust percentages.
///
/// `theta` is in degrees and `r` in percent (0 to 100). Within each 90°
/// quadrant the main wheel's thrust tapers linearly, crossing zero at the
/// quadrant center, while the other wheel is boosted to compensate, capped at
/// 100. Which wheel leads depends on the quadrant; the branch bounds are
/// exclusive on the upper side. Periodic in `theta` with period 360.
pub fn throttle_angle_to_thrust(
    r: f32,
    theta: f32,
) -> (f32, f32) {
    let theta = floor_mod(theta + 180.0, 360.0) - 180.0; // normalize value to [-180, 180)
    let r = r.clamp(0.0, 100.0); // normalize value to [0, 100]
    let main_falloff = r * (45.0 - floor_mod(theta, 90.0)) / 45.0;
    let compensation = 100.0_f32
        .min(2.0 * r + main_falloff)
        .min(2.0 * r - main_falloff);
    if theta < -90.0 {
        (-compensation, -main_falloff)
    } else if theta < 0.0 {
        (-main_falloff, compensation)
    } else if theta < 90.0 {
        (compensation, main_falloff)
    } else {
        (main_falloff, -compensation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(
        a: f32,
        b: f32,
    ) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_thrust_zero_radius() {
        assert_eq!(throttle_angle_to_thrust(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_thrust_straight_ahead() {
        // theta = 0 selects the third branch, not the negative one
        let (l, r) = throttle_angle_to_thrust(50.0, 0.0);
        assert!(close(l, 50.0), "left = {}", l);
        assert!(close(r, 50.0), "right = {}", r);
    }

    #[test]
    fn test_thrust_quadrant_center() {
        // at 45° the main wheel tapers all the way to zero
        let (l, r) = throttle_angle_to_thrust(50.0, 45.0);
        assert!(close(l, 100.0), "left = {}", l);
        assert!(close(r, 0.0), "right = {}", r);
    }

    #[test]
    fn test_thrust_quadrant_edges() {
        // ±90° are spin turns with both wheels at full radius
        let (l, r) = throttle_angle_to_thrust(50.0, 90.0);
        assert!(close(l, 50.0) && close(r, -50.0));
        let (l, r) = throttle_angle_to_thrust(50.0, -90.0);
        assert!(close(l, -50.0) && close(r, 50.0));
    }

    #[test]
    fn test_thrust_negative_theta_modulo() {
        // -45 mod 90 must be 45, not -45
        let (l, r) = throttle_angle_to_thrust(30.0, -45.0);
        assert!(close(l, 0.0), "left = {}", l);
        assert!(close(r, 60.0), "right = {}", r);
    }

    #[test]
    fn test_thrust_periodic() {
        for &r in &[0.0, 25.0, 60.0, 100.0] {
            for &theta in &[-170.0, -90.0, -45.0, 0.0, 30.0, 90.0, 135.0] {
                let a = throttle_angle_to_thrust(r, theta);
                let b = throttle_angle_to_thrust(r, theta + 360.0);
                assert!(
                    close(a.0, b.0) && close(a.1, b.1),
                    "not periodic at r={} theta={}",
                    r,
                    theta
                );
            }
        }
    }

    #[test]
    fn test_thrust_radius_clamped() {
        let (l, r) = throttle_angle_to_thrust(150.0, 0.0);
        assert!(close(l, 100.0) && close(r, 100.0));
        let (l, r) = throttle_angle_to_thrust(-20.0, 0.0);
        assert!(close(l, 0.0) && close(r, 0.0));
    }

    #[test]
    fn test_mix_idle() {
        let thrust = MixerConfig::default().mix(0.0, 0.0);
        assert_eq!(
            thrust,
            WheelThrust {
                left: 0.0,
                right: 0.0
            }
        );
    }

    #[test]
    fn test_mix_full_throttle() {
        let thrust = MixerConfig::default().mix(0.0, 1.0);
        assert!(close(thrust.left, 0.8), "left = {}", thrust.left);
        assert!(close(thrust.right, 0.8), "right = {}", thrust.right);
    }

    #[test]
    fn test_mix_full_steering() {
        // pure steering spins in place, scaled by the (negative) gain
        let thrust = MixerConfig::default().mix(1.0, 0.0);
        assert!(close(thrust.left, -0.65), "left = {}", thrust.left);
        assert!(close(thrust.right, 0.65), "right = {}", thrust.right);
    }

    #[test]
    fn test_mix_output_bounded() {
        let mixer = MixerConfig::default();
        for i in -8..=8 {
            for j in -8..=8 {
                let t = mixer.mix(i as f32 / 4.0, j as f32 / 4.0);
                assert!((-1.0..=1.0).contains(&t.left));
                assert!((-1.0..=1.0).contains(&t.right));
            }
        }
    }
}
