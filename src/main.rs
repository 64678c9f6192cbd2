//! Lift controller firmware — main entry point.
//!
//! Hexagonal architecture with a tick-paced control loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter        HostLinkAdapter    LogEventSink  │
//! │  (encoder+relay+servo)  (UART + RX queue)  (EventSink)   │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │           LiftService (pure logic)             │      │
//! │  │  frame parser · lift controller · Idle/Moving  │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every main-loop cycle drains the host byte queue first, then runs one
//! control tick per pending timer tick, so commands always land before
//! the control decision of the cycle they arrived in.

#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use liftctl::adapters::hardware::HardwareAdapter;
use liftctl::adapters::host_link::HostLinkAdapter;
use liftctl::adapters::log_sink::LogEventSink;
use liftctl::app::service::LiftService;
use liftctl::config::SystemConfig;
use liftctl::drivers::encoder::EncoderDriver;
use liftctl::drivers::gripper::ServoGripper;
use liftctl::drivers::relay::RelayDriver;
use liftctl::drivers::{hw_init, hw_timer};
use liftctl::events;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
#[cfg(target_os = "espidf")]
use liftctl::pins;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::init();

    info!("liftctl v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripheral bring-up ────────────────────────────────
    let config = SystemConfig::default();
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("hw init: {e}"))?;
    hw_init::start_host_rx_pump().map_err(|e| anyhow::anyhow!("rx pump: {e}"))?;
    hw_timer::start_control_timer(config.control_loop_interval_ms)
        .map_err(|e| anyhow::anyhow!("tick timer: {e}"))?;

    // ── 3. Construct adapters ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    let relay = {
        // SAFETY: each relay pin number is claimed exactly once, here.
        let up = PinDriver::output(unsafe { AnyOutputPin::new(pins::RELAY_A_GPIO) })?;
        let down = PinDriver::output(unsafe { AnyOutputPin::new(pins::RELAY_B_GPIO) })?;
        RelayDriver::new(up, down).map_err(|e| anyhow::anyhow!("relay: {e}"))?
    };
    #[cfg(not(target_os = "espidf"))]
    let relay = RelayDriver::new(sim::NullPin, sim::NullPin)
        .map_err(|e| anyhow::anyhow!("relay: {e}"))?;

    let mut hw = HardwareAdapter::new(
        EncoderDriver::new(&config),
        relay,
        ServoGripper::new(&config),
    );
    let mut link = HostLinkAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 4. Construct and start the service ────────────────────
    let mut service = LiftService::new(&config);
    service.start(&mut sink);

    info!("system ready, entering control loop");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        // Pace the loop on host builds where no hardware timer runs.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(u64::from(
                config.control_loop_interval_ms,
            )));
            events::tick_isr();
        }

        // Commands first, then every pending control tick.
        service.poll_link(&mut link, &mut hw, &mut sink);
        while events::take_tick() {
            service.tick(&mut hw, &mut link, &mut sink);
        }

        #[cfg(target_os = "espidf")]
        FreeRtos::delay_ms(1);
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    //! Minimal pin stub for running the firmware loop on a host.

    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    pub struct NullPin;

    impl ErrorType for NullPin {
        type Error = Infallible;
    }

    impl OutputPin for NullPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }
}
