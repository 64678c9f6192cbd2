//! Two-channel relay drive for the lift motor.
//!
//! The relays are active-low: a channel energises when its pin is driven
//! low.  Channel A alone runs the motor upward, channel B alone runs it
//! downward, and both pins high releases the motor.  Both channels are
//! never energised together.
//!
//! Generic over [`OutputPin`] so host tests drive mock pins and the
//! target build drives real GPIO through `esp-idf-hal` pin drivers.

use embedded_hal::digital::OutputPin;

use crate::control::lift::LiftDirection;
use crate::error::ActuatorError;

pub struct RelayDriver<A: OutputPin, B: OutputPin> {
    up: A,
    down: B,
    state: LiftDirection,
}

impl<A: OutputPin, B: OutputPin> RelayDriver<A, B> {
    /// Take ownership of both relay pins and release the motor.
    pub fn new(mut up: A, mut down: B) -> Result<Self, ActuatorError> {
        up.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        down.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Self {
            up,
            down,
            state: LiftDirection::Stop,
        })
    }

    /// Drive the relays for the given direction.
    ///
    /// The released channel is always written before the energised one,
    /// so both relays can never be closed at once mid-switch.
    pub fn set_direction(&mut self, direction: LiftDirection) -> Result<(), ActuatorError> {
        match direction {
            LiftDirection::Stop => {
                self.up.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
                self.down.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
            }
            LiftDirection::Up => {
                self.down.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
                self.up.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
            }
            LiftDirection::Down => {
                self.up.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
                self.down.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
            }
        }
        self.state = direction;
        Ok(())
    }

    /// Last successfully commanded direction.
    pub fn state(&self) -> LiftDirection {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock pin that records its level.
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn construction_releases_both_channels() {
        let relay = RelayDriver::new(MockPin::new(), MockPin::new()).unwrap();
        assert!(relay.up.high);
        assert!(relay.down.high);
        assert_eq!(relay.state(), LiftDirection::Stop);
    }

    #[test]
    fn up_energises_only_channel_a() {
        let mut relay = RelayDriver::new(MockPin::new(), MockPin::new()).unwrap();
        relay.set_direction(LiftDirection::Up).unwrap();
        assert!(!relay.up.high);
        assert!(relay.down.high);
    }

    #[test]
    fn down_energises_only_channel_b() {
        let mut relay = RelayDriver::new(MockPin::new(), MockPin::new()).unwrap();
        relay.set_direction(LiftDirection::Down).unwrap();
        assert!(relay.up.high);
        assert!(!relay.down.high);
    }

    #[test]
    fn direction_reversal_passes_through_release() {
        let mut relay = RelayDriver::new(MockPin::new(), MockPin::new()).unwrap();
        relay.set_direction(LiftDirection::Up).unwrap();
        relay.set_direction(LiftDirection::Down).unwrap();
        assert!(relay.up.high);
        assert!(!relay.down.high);
        assert_eq!(relay.state(), LiftDirection::Down);
    }
}
