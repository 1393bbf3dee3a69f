//! Wheel actuation: thrust values to directed duty commands.
//!
//! `WheelDriver` turns one wheel's thrust scalar into a `(Direction, duty)`
//! pair and forwards it to the underlying `Actuator`. Dropping a driver
//! releases its actuator, so a wheel is never left energized past the driver's
//! lifetime.

use core::fmt::Debug;

/// Rotation direction of a wheel actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Direction-and-duty capability of one physical motor channel.
pub trait Actuator {
    type Error: Debug;

    /// Drive the channel at `duty` (0 to 255) in the given direction.
    fn set(
        &mut self,
        direction: Direction,
        duty: u8,
    ) -> Result<(), Self::Error>;

    /// Cut drive on the channel, letting the motor coast (no brake).
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// Maps one wheel's thrust in `[-1, 1]` onto its actuator.
///
/// Negative thrust commands `Forward` and non-negative thrust commands
/// `Backward`, matching the polarity the target chassis is wired for. Duty
/// saturates at 255 for inputs beyond `[-1, 1]`.
pub struct WheelDriver<A: Actuator> {
    actuator: A,
    released: bool,
}

impl<A: Actuator> WheelDriver<A> {
    pub fn new(actuator: A) -> Self {
        WheelDriver {
            actuator,
            released: false,
        }
    }

    /// Apply a thrust value, recomputing direction and duty.
    ///
    /// Errors from the actuator surface directly; the command is not retried.
    pub fn apply(
        &mut self,
        value: f32,
    ) -> Result<(), A::Error> {
        let mapped = libm::roundf(255.0 * value) as i32;
        let duty = mapped.unsigned_abs().min(255) as u8;
        let direction = if mapped < 0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.released = false;
        self.actuator.set(direction, duty)
    }

    /// Release the wheel; repeated calls after a release are no-ops.
    pub fn release(&mut self) -> Result<(), A::Error> {
        if self.released {
            return Ok(());
        }
        self.actuator.release()?;
        self.released = true;
        Ok(())
    }
}

impl<A: Actuator> Drop for WheelDriver<A> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("wheel release on drop failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;

    #[derive(Debug, Default)]
    struct Recorded {
        last: Option<(Direction, u8)>,
        sets: u32,
        releases: u32,
    }

    /// Actuator stand-in recording every command it receives.
    struct MockActuator<'a> {
        rec: &'a RefCell<Recorded>,
    }

    impl Actuator for MockActuator<'_> {
        type Error = Infallible;

        fn set(
            &mut self,
            direction: Direction,
            duty: u8,
        ) -> Result<(), Self::Error> {
            let mut rec = self.rec.borrow_mut();
            rec.last = Some((direction, duty));
            rec.sets += 1;
            Ok(())
        }

        fn release(&mut self) -> Result<(), Self::Error> {
            self.rec.borrow_mut().releases += 1;
            Ok(())
        }
    }

    #[test]
    fn test_apply_full_scale() {
        let rec = RefCell::new(Recorded::default());
        let mut driver = WheelDriver::new(MockActuator { rec: &rec });

        driver.apply(1.0).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Backward, 255)));

        driver.apply(-1.0).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Forward, 255)));
    }

    #[test]
    fn test_apply_rounds_half_up() {
        let rec = RefCell::new(Recorded::default());
        let mut driver = WheelDriver::new(MockActuator { rec: &rec });

        driver.apply(0.5).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Backward, 128)));
    }

    #[test]
    fn test_apply_zero_latches_backward() {
        let rec = RefCell::new(Recorded::default());
        let mut driver = WheelDriver::new(MockActuator { rec: &rec });

        driver.apply(0.0).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Backward, 0)));
    }

    #[test]
    fn test_apply_saturates_out_of_range() {
        let rec = RefCell::new(Recorded::default());
        let mut driver = WheelDriver::new(MockActuator { rec: &rec });

        driver.apply(1.5).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Backward, 255)));

        driver.apply(-2.0).unwrap();
        assert_eq!(rec.borrow().last, Some((Direction::Forward, 255)));
    }

    #[test]
    fn test_release_idempotent() {
        let rec = RefCell::new(Recorded::default());
        let mut driver = WheelDriver::new(MockActuator { rec: &rec });

        driver.apply(0.7).unwrap();
        driver.release().unwrap();
        driver.release().unwrap();
        assert_eq!(rec.borrow().releases, 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let rec = RefCell::new(Recorded::default());
        {
            let mut driver = WheelDriver::new(MockActuator { rec: &rec });
            driver.apply(0.7).unwrap();
        }
        assert_eq!(rec.borrow().releases, 1);
    }

    #[test]
    fn test_apply_rearms_release() {
        let rec = RefCell::new(Recorded::default());
        {
            let mut driver = WheelDriver::new(MockActuator { rec: &rec });
            driver.apply(0.7).unwrap();
            driver.release().unwrap();
            driver.apply(0.2).unwrap();
        }
        assert_eq!(rec.borrow().releases, 2);
    }
}
