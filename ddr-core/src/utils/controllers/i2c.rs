//! PCA9685 motor-controller access for the rover.
//!
//! The motor driver board puts four H-bridge DC motor ports behind a single
//! PCA9685 PWM chip on a shared I2C bus: each port uses one chip channel for
//! duty and two for the H-bridge direction inputs. `MotorHat` owns the chip
//! and hands out per-port `DcMotor` handles that share it.

use core::cell::RefCell;
use core::fmt::Debug;

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

use super::motor::{Actuator, Direction};

/// Default I2C address of the motor controller board.
pub const MOTOR_HAT_ADDRESS: u8 = 0x60;

/// Prescale for ~1.6 kHz motor PWM (25 MHz oscillator / 4096 steps).
const MOTOR_PWM_PRESCALE: u8 = 3;

/// Errors that can occur when commanding the motor controller.
#[derive(Debug)]
pub enum DriveError<E: Debug> {
    /// The PWM chip rejected a command or the bus transaction failed.
    Pwm(PwmError<E>),
}

/// Physical motor ports on the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorChannel {
    M1,
    M2,
    M3,
    M4,
}

impl MotorChannel {
    /// PCA9685 channel triple `(pwm, in1, in2)` wired to this port.
    fn pins(self) -> (Channel, Channel, Channel) {
        match self {
            MotorChannel::M1 => (Channel::C8, Channel::C10, Channel::C9),
            MotorChannel::M2 => (Channel::C13, Channel::C11, Channel::C12),
            MotorChannel::M3 => (Channel::C2, Channel::C4, Channel::C3),
            MotorChannel::M4 => (Channel::C7, Channel::C5, Channel::C6),
        }
    }
}

/// Shared motor-controller resource on the I2C bus.
///
/// The chip sits behind a `RefCell` so the per-port handles obtained from
/// `motor` cannot interleave their multi-write command sequences.
pub struct MotorHat<'a, I2C: 'static> {
    i2c: &'a RefCell<I2C>,
    pwm: RefCell<Pca9685<RefCellDevice<'a, I2C>>>,
}

impl<'a, I2C, E> MotorHat<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: Debug,
{
    /// Bind the PWM chip at `address` on the shared bus.
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        address: u8,
    ) -> Result<Self, DriveError<E>> {
        let pwm = Pca9685::new(RefCellDevice::new(i2c_bus), PwmAddress::from(address))
            .map_err(DriveError::Pwm)?;
        Ok(MotorHat {
            i2c: i2c_bus,
            pwm: RefCell::new(pwm),
        })
    }

    /// Wake the PWM chip and set the motor PWM frequency.
    pub fn configure(&self) -> Result<(), DriveError<E>> {
        let mut pwm = self.pwm.borrow_mut();
        pwm.enable().map_err(DriveError::Pwm)?;
        tracing::info!("PWM enabled");
        pwm.set_prescale(MOTOR_PWM_PRESCALE)
            .map_err(DriveError::Pwm)?;
        tracing::info!("PWM prescale set to 1.6kHz");
        Ok(())
    }

    /// Scan the I2C bus for devices and log any found addresses.
    pub fn scan_bus(&self) {
        let mut bus = self.i2c.borrow_mut();
        for addr in 0x03..0x78 {
            if bus.write(addr, &[]).is_ok() {
                tracing::warn!("I2C device found at 0x{:02X}", addr);
            }
        }
    }

    /// Obtain the actuator handle for one motor port.
    ///
    /// The port binding is fixed for the lifetime of the handle.
    pub fn motor(
        &'a self,
        channel: MotorChannel,
    ) -> DcMotor<'a, I2C> {
        DcMotor {
            pwm: &self.pwm,
            channel,
        }
    }
}

/// One DC motor port on the controller board.
pub struct DcMotor<'a, I2C: 'static> {
    pwm: &'a RefCell<Pca9685<RefCellDevice<'a, I2C>>>,
    channel: MotorChannel,
}

impl<I2C, E> Actuator for DcMotor<'_, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: Debug,
{
    type Error = DriveError<E>;

    fn set(
        &mut self,
        direction: Direction,
        duty: u8,
    ) -> Result<(), Self::Error> {
        let (pwm_ch, in1, in2) = self.channel.pins();
        let mut pwm = self.pwm.borrow_mut();
        // 8-bit duty onto the chip's 12-bit counter
        pwm.set_channel_on_off(pwm_ch, 0, u16::from(duty) * 16)
            .map_err(DriveError::Pwm)?;
        match direction {
            Direction::Forward => {
                pwm.set_channel_full_off(in2).map_err(DriveError::Pwm)?;
                pwm.set_channel_full_on(in1, 0).map_err(DriveError::Pwm)?;
            }
            Direction::Backward => {
                pwm.set_channel_full_off(in1).map_err(DriveError::Pwm)?;
                pwm.set_channel_full_on(in2, 0).map_err(DriveError::Pwm)?;
            }
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        let (_, in1, in2) = self.channel.pins();
        let mut pwm = self.pwm.borrow_mut();
        pwm.set_channel_full_off(in1).map_err(DriveError::Pwm)?;
        pwm.set_channel_full_off(in2).map_err(DriveError::Pwm)?;
        Ok(())
    }
}
