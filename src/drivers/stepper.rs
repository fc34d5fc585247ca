//! Open-loop stepper driver for the door mechanism.
//!
//! Drives a step/direction/enable stepper interface through
//! `embedded-hal` pins. A traversal is a fixed pulse count at a fixed
//! interval — there is no endstop or position feedback; hitting the
//! mechanical limit early is accepted and absorbed by the coupling.
//!
//! ## Safety contract
//!
//! - `run` leaves the driver **disabled** on return, whichever direction
//!   ran. No code path exits with the motor energised.
//! - `run` is non-reentrant. `&mut self` already serializes callers in
//!   safe Rust; the in-flight flag additionally rejects overlap when the
//!   driver is placed in a static and reached from interrupt context.
//!
//! The enable line is active-low, as on common stepper driver boards:
//! high parks the motor.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::{Direction, DoorPort};
use crate::config::DoorConfig;

pub struct StepperDriver<Step, Dir, En, D> {
    step: Step,
    dir: Dir,
    enable: En,
    delay: D,
    steps_to_endstop: u32,
    step_interval_us: u32,
    in_flight: AtomicBool,
}

impl<Step, Dir, En, D> StepperDriver<Step, Dir, En, D>
where
    Step: OutputPin,
    Dir: OutputPin,
    En: OutputPin,
    D: DelayNs,
{
    pub fn new(step: Step, dir: Dir, enable: En, delay: D, config: &DoorConfig) -> Self {
        Self {
            step,
            dir,
            enable,
            delay,
            steps_to_endstop: config.steps_to_endstop,
            step_interval_us: config.step_interval_us,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a traversal is currently executing. Always `false` between
    /// dispatch-loop events.
    pub fn is_idle(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }
}

impl<Step, Dir, En, D> DoorPort for StepperDriver<Step, Dir, En, D>
where
    Step: OutputPin,
    Dir: OutputPin,
    En: OutputPin,
    D: DelayNs,
{
    fn park(&mut self) {
        self.dir.set_high().ok();
        // Active-low enable: high = disabled.
        self.enable.set_high().ok();
        info!("stepper: parked (disabled)");
    }

    fn run(&mut self, direction: Direction) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Unreachable under the single dispatch queue; guards a
            // misconfigured multi-context deployment.
            warn!("stepper: run already in flight, {direction:?} ignored");
            return;
        }

        info!(
            "stepper: running {direction:?} ({} steps, {} us/edge)",
            self.steps_to_endstop, self.step_interval_us
        );

        self.enable.set_low().ok();
        match direction {
            Direction::Open => self.dir.set_high().ok(),
            Direction::Close => self.dir.set_low().ok(),
        };

        for _ in 0..self.steps_to_endstop {
            self.step.set_high().ok();
            self.delay.delay_us(self.step_interval_us);
            self.step.set_low().ok();
            self.delay.delay_us(self.step_interval_us);
        }

        // Safe-park: never return with the motor energised.
        self.enable.set_high().ok();
        self.in_flight.store(false, Ordering::Release);
    }
}
