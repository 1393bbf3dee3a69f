//! Module Exports
//!
//! This file exports the control modules of the rover:
//!
//! - `i2c`: shared PCA9685 motor controller and its per-port motor handles
//! - `motor`: wheel drivers mapping thrust onto directed duty commands
//! - `rover`: vehicle-level steering/throttle surface

pub mod i2c;
pub mod motor;
pub mod rover;

use core::fmt::Debug;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use crate::utils::math::thrust::MixerConfig;

pub use i2c::{DriveError, MotorChannel, MotorHat, MOTOR_HAT_ADDRESS};
pub use motor::{Actuator, Direction, WheelDriver};
pub use rover::Rover;

/// Channel used to receive drive commands (`DriveCommand` messages).
pub static DRIVE_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, DriveCommand, 16> =
    embassy_sync::channel::Channel::new();

/// Drive command variants for vehicle motion and mixer tuning.
///
/// Serialized as JSON with tag `"dc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "dc", rename_all = "snake_case")]
pub enum DriveCommand {
    /// Steering input in `[-1, 1]`.
    S { v: f32 },
    /// Throttle input in `[-1, 1]`.
    T { v: f32 },
    /// Steering gain.
    Sg { v: f32 },
    /// Steering offset (trim).
    So { v: f32 },
    /// Throttle gain.
    Tg { v: f32 },
    /// Release both wheels.
    Stop,
}

/// High-level drive controller: hardware bring-up plus the command loop.
pub struct DriveController<'a, I2C: 'static + embedded_hal::i2c::I2c> {
    pub rover: Option<Rover<'a, I2C>>,
}

impl<'a, I2C, E> DriveController<'a, I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E> + 'static,
    E: Debug,
{
    /// Configure the motor controller and bind the rover to ports M1/M2.
    ///
    /// On bring-up failure the bus is scanned for diagnostics and the
    /// controller runs without a rover, logging incoming commands.
    pub fn new(
        hat: &'a MotorHat<'a, I2C>,
        config: Option<MixerConfig>,
    ) -> Self {
        let rover = match hat.configure() {
            Ok(()) => Some(Rover::new(
                hat,
                config.unwrap_or_default(),
                MotorChannel::M1,
                MotorChannel::M2,
            )),
            Err(e) => {
                tracing::warn!("motor controller init failed, scanning instead: {:?}", e);
                hat.scan_bus();
                None
            }
        };

        DriveController { rover }
    }

    /// Receive and execute drive commands until the task is cancelled.
    ///
    /// Failed commands are logged and not retried; each incoming command is
    /// an independent attempt.
    pub async fn drive_ch(&mut self) -> ! {
        loop {
            let command = DRIVE_CHANNEL.receiver().receive().await;
            tracing::info!("Received drive command: {:?}", command);
            if let Some(rover) = self.rover.as_mut() {
                match rover.execute(command) {
                    Ok(()) => tracing::info!("drive command executed"),
                    Err(e) => tracing::error!("drive command failed: {:?}", e),
                }
            } else {
                tracing::warn!(
                    "drive command received but motor controller not initialized: {:?}",
                    command
                );
            }
        }
    }
}
