//! Host link adapter — the serial channel to the host controller.
//!
//! Receive side: pops bytes from the interrupt-fed [`HOST_RX`] queue
//! (filled by the UART RX pump task).  Transmit side: writes frames to
//! the host UART, appending CRLF.

use log::warn;

use crate::app::ports::HostLink;
use crate::drivers::hw_init;
use crate::events::{ByteQueue, HOST_RX};

/// Adapter over the host UART and its RX byte queue.
pub struct HostLinkAdapter {
    rx: &'static ByteQueue,
}

impl HostLinkAdapter {
    /// Bind to the global RX queue.
    pub fn new() -> Self {
        Self { rx: &HOST_RX }
    }
}

impl Default for HostLinkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HostLink for HostLinkAdapter {
    fn next_byte(&mut self) -> Option<u8> {
        self.rx.pop()
    }

    fn send_frame(&mut self, frame: &str) {
        // A lost notification is not retried; the host re-polls.
        if hw_init::host_uart_write(frame.as_bytes()).is_err()
            || hw_init::host_uart_write(b"\r\n").is_err()
        {
            warn!("host link: frame tx failed");
        }
    }
}
