use clap::Parser;
use core::cell::RefCell;
use ddr_core::mk_static;
use ddr_core::utils::controllers::{
    DriveCommand, DriveController, MotorHat, DRIVE_CHANNEL, MOTOR_HAT_ADDRESS,
};
use embassy_executor::{Executor, Spawner};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use static_cell::StaticCell;
use tracing::{error, info};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// drive command as JSON, e.g. '{"dc":"t","v":0.5}' (repeatable)
    #[clap(long = "cmd")]
    cmds: Vec<String>,
}

/// I2C bus stand-in that logs every transaction instead of touching hardware.
struct TraceI2c;

impl ErrorType for TraceI2c {
    type Error = ErrorKind;
}

impl I2c for TraceI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    info!("i2c write @0x{:02X}: {:02X?}", address, bytes);
                }
                Operation::Read(buffer) => {
                    buffer.fill(0);
                    info!("i2c read @0x{:02X}: {} bytes", address, buffer.len());
                }
            }
        }
        Ok(())
    }
}

#[embassy_executor::task]
async fn drive_task(mut ctrl: DriveController<'static, TraceI2c>) -> ! {
    ctrl.drive_ch().await
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner) {
    let i2c_bus = mk_static!(RefCell<TraceI2c>, RefCell::new(TraceI2c));
    let hat = mk_static!(
        MotorHat<'static, TraceI2c>,
        MotorHat::new(i2c_bus, MOTOR_HAT_ADDRESS).unwrap()
    );

    let ctrl = DriveController::new(hat, None);
    spawner.spawn(drive_task(ctrl)).unwrap();

    let opts: Opts = Opts::parse();
    let commands: Vec<DriveCommand> = if opts.cmds.is_empty() {
        // short demo run: pull away, sweep the steering, stop
        vec![
            DriveCommand::T { v: 0.5 },
            DriveCommand::S { v: 0.3 },
            DriveCommand::S { v: 0.0 },
            DriveCommand::Stop,
        ]
    } else {
        opts.cmds
            .iter()
            .filter_map(|raw| match serde_json::from_str(raw) {
                Ok(cmd) => Some(cmd),
                Err(e) => {
                    error!("bad command {:?}: {}", raw, e);
                    None
                }
            })
            .collect()
    };

    for cmd in commands {
        DRIVE_CHANNEL.sender().send(cmd).await;
    }
    info!("all commands queued; Ctrl-C to exit");
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner)).unwrap();
    });
}
