//! Vehicle-level control surface.
//!
//! `Rover` holds the operator inputs and mixer tuning for a two-wheel
//! differential-drive vehicle. Whenever steering, throttle, or one of the
//! tuning parameters changes value, both wheel thrusts are recomputed and
//! pushed to the motors synchronously; writes that do not change a value
//! produce no bus traffic.

use core::fmt::Debug;

use embedded_hal::i2c::I2c;

use super::i2c::{DcMotor, DriveError, MotorChannel, MotorHat};
use super::motor::WheelDriver;
use super::DriveCommand;
use crate::utils::math::thrust::MixerConfig;

/// Two-wheel differential-drive vehicle bound to a motor controller.
pub struct Rover<'a, I2C: 'static + I2c> {
    config: MixerConfig,
    steering: f32,
    throttle: f32,
    left: WheelDriver<DcMotor<'a, I2C>>,
    right: WheelDriver<DcMotor<'a, I2C>>,
}

impl<'a, I2C, E> Rover<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: Debug,
{
    /// Create a rover over two motor ports of the hat.
    ///
    /// Steering and throttle start at zero and no command is sent until an
    /// input changes. Both wheels are released when the rover is dropped.
    pub fn new(
        hat: &'a MotorHat<'a, I2C>,
        config: MixerConfig,
        left: MotorChannel,
        right: MotorChannel,
    ) -> Self {
        Rover {
            config,
            steering: 0.0,
            throttle: 0.0,
            left: WheelDriver::new(hat.motor(left)),
            right: WheelDriver::new(hat.motor(right)),
        }
    }

    /// Set the steering input, nominally in `[-1, 1]`.
    pub fn set_steering(
        &mut self,
        value: f32,
    ) -> Result<(), DriveError<E>> {
        if self.steering == value {
            return Ok(());
        }
        self.steering = value;
        self.propagate()
    }

    /// Set the throttle input, nominally in `[-1, 1]`.
    pub fn set_throttle(
        &mut self,
        value: f32,
    ) -> Result<(), DriveError<E>> {
        if self.throttle == value {
            return Ok(());
        }
        self.throttle = value;
        self.propagate()
    }

    /// Set the steering gain.
    pub fn set_steering_gain(
        &mut self,
        value: f32,
    ) -> Result<(), DriveError<E>> {
        if self.config.steering_gain == value {
            return Ok(());
        }
        self.config.steering_gain = value;
        self.propagate()
    }

    /// Set the steering offset (trim).
    pub fn set_steering_offset(
        &mut self,
        value: f32,
    ) -> Result<(), DriveError<E>> {
        if self.config.steering_offset == value {
            return Ok(());
        }
        self.config.steering_offset = value;
        self.propagate()
    }

    /// Set the throttle gain.
    pub fn set_throttle_gain(
        &mut self,
        value: f32,
    ) -> Result<(), DriveError<E>> {
        if self.config.throttle_gain == value {
            return Ok(());
        }
        self.config.throttle_gain = value;
        self.propagate()
    }

    /// Current steering input.
    pub fn steering(&self) -> f32 {
        self.steering
    }

    /// Current throttle input.
    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    /// Current mixer tuning.
    pub fn config(&self) -> MixerConfig {
        self.config
    }

    /// Release both wheels, leaving the motors to coast.
    pub fn release(&mut self) -> Result<(), DriveError<E>> {
        self.left.release()?;
        self.right.release()
    }

    /// Execute a single drive command.
    pub fn execute(
        &mut self,
        command: DriveCommand,
    ) -> Result<(), DriveError<E>> {
        match command {
            DriveCommand::S { v } => self.set_steering(v),
            DriveCommand::T { v } => self.set_throttle(v),
            DriveCommand::Sg { v } => self.set_steering_gain(v),
            DriveCommand::So { v } => self.set_steering_offset(v),
            DriveCommand::Tg { v } => self.set_throttle_gain(v),
            DriveCommand::Stop => self.release(),
        }
    }

    /// Recompute both wheel thrusts and push them to the motors.
    fn propagate(&mut self) -> Result<(), DriveError<E>> {
        let thrust = self.config.mix(self.steering, self.throttle);
        tracing::debug!("thrust update: left={} right={}", thrust.left, thrust.right);
        self.left.apply(thrust.left)?;
        self.right.apply(thrust.right)
    }
}
