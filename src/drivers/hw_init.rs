//! One-shot hardware peripheral initialization.
//!
//! Configures the PCNT quadrature-counter unit and the two UARTs (host
//! link, gripper servo bus) using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.
//!
//! On host/test builds every function is a logged no-op so the rest of
//! the firmware compiles and runs unchanged.

use crate::error::Result;

#[cfg(target_os = "espidf")]
use crate::error::{Error, LinkError};

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── UART port assignments ─────────────────────────────────────

#[cfg(target_os = "espidf")]
const HOST_UART: uart_port_t = 1;
#[cfg(target_os = "espidf")]
const GRIPPER_UART: uart_port_t = 2;

#[cfg(target_os = "espidf")]
const UART_RX_BUF: i32 = 512;
#[cfg(target_os = "espidf")]
const UART_TX_BUF: i32 = 512;

// ── Top-level init ────────────────────────────────────────────

/// Bring up every peripheral the control loop needs.
#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    init_encoder_counter()?;
    init_uart(
        HOST_UART,
        pins::HOST_UART_TX_GPIO,
        pins::HOST_UART_RX_GPIO,
        pins::HOST_UART_BAUD,
    )?;
    init_uart(
        GRIPPER_UART,
        pins::GRIPPER_UART_TX_GPIO,
        pins::GRIPPER_UART_RX_GPIO,
        pins::GRIPPER_UART_BAUD,
    )?;
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── PCNT quadrature counter ───────────────────────────────────

/// Configure PCNT unit 0 for quadrature decode on the encoder pins:
/// count on channel-A edges, direction from channel B.
#[cfg(target_os = "espidf")]
fn init_encoder_counter() -> Result<()> {
    let cfg = pcnt_config_t {
        pulse_gpio_num: pins::ENCODER_A_GPIO,
        ctrl_gpio_num: pins::ENCODER_B_GPIO,
        pos_mode: pcnt_count_mode_t_PCNT_COUNT_INC,
        neg_mode: pcnt_count_mode_t_PCNT_COUNT_DEC,
        lctrl_mode: pcnt_ctrl_mode_t_PCNT_MODE_REVERSE,
        hctrl_mode: pcnt_ctrl_mode_t_PCNT_MODE_KEEP,
        counter_h_lim: i16::MAX,
        counter_l_lim: i16::MIN,
        unit: pcnt_unit_t_PCNT_UNIT_0,
        channel: pcnt_channel_t_PCNT_CHANNEL_0,
    };
    // SAFETY: PCNT unit 0 is configured exactly once at boot from the
    // single main task, before the control loop reads it.
    unsafe {
        let ret = pcnt_unit_config(&cfg);
        if ret != ESP_OK {
            return Err(Error::Init("PCNT unit config failed"));
        }
        pcnt_counter_pause(pcnt_unit_t_PCNT_UNIT_0);
        pcnt_counter_clear(pcnt_unit_t_PCNT_UNIT_0);
        pcnt_counter_resume(pcnt_unit_t_PCNT_UNIT_0);
    }
    info!("hw_init: PCNT quadrature counter configured");
    Ok(())
}

/// Read the accumulated pulse delta since the last call and reset the
/// hardware counter to zero.
#[cfg(target_os = "espidf")]
pub fn pcnt_read_and_clear() -> i16 {
    let mut count: i16 = 0;
    // SAFETY: unit 0 was configured during init_encoder_counter();
    // read-then-clear is main-loop only, so at most one tick's worth of
    // counts lands between the read and the clear.
    unsafe {
        if pcnt_get_counter_value(pcnt_unit_t_PCNT_UNIT_0, &mut count) != ESP_OK {
            return 0;
        }
        pcnt_counter_clear(pcnt_unit_t_PCNT_UNIT_0);
    }
    count
}

#[cfg(not(target_os = "espidf"))]
pub fn pcnt_read_and_clear() -> i16 {
    0
}

// ── UART bring-up ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_uart(port: uart_port_t, tx: i32, rx: i32, baud: u32) -> Result<()> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        rx_flow_ctrl_thresh: 0,
        ..Default::default()
    };
    // SAFETY: each UART port is installed exactly once at boot from the
    // single main task.
    unsafe {
        let ret =
            uart_driver_install(port, UART_RX_BUF, UART_TX_BUF, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK {
            return Err(LinkError::UartInitFailed(ret).into());
        }
        let ret = uart_param_config(port, &cfg);
        if ret != ESP_OK {
            return Err(LinkError::UartInitFailed(ret).into());
        }
        let ret = uart_set_pin(port, tx, rx, -1, -1);
        if ret != ESP_OK {
            return Err(LinkError::UartInitFailed(ret).into());
        }
    }
    info!("hw_init: UART{port} configured ({baud} baud)");
    Ok(())
}

// ── Host link RX pump ─────────────────────────────────────────

/// Spawn the receive pump: a small task that blocks on the host UART and
/// pushes every byte into [`crate::events::HOST_RX`].
///
/// Started exactly once, after [`init_peripherals`], before the control
/// loop.  The queue is SPSC: this task is the only producer and the main
/// loop the only consumer.
#[cfg(target_os = "espidf")]
pub fn start_host_rx_pump() -> Result<()> {
    std::thread::Builder::new()
        .name("host_rx".into())
        .stack_size(3072)
        .spawn(|| {
            let mut buf = [0u8; 64];
            loop {
                let n = unsafe {
                    uart_read_bytes(
                        HOST_UART,
                        buf.as_mut_ptr() as *mut core::ffi::c_void,
                        buf.len() as u32,
                        20, // RTOS ticks
                    )
                };
                if n > 0 {
                    for &byte in &buf[..n as usize] {
                        crate::events::HOST_RX.push(byte);
                    }
                }
            }
        })
        .map_err(|_| Error::Init("host RX pump spawn failed"))?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_host_rx_pump() -> Result<()> {
    log::info!("hw_init(sim): host RX pump not started");
    Ok(())
}

// ── UART writes ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn uart_write(port: uart_port_t, data: &[u8]) -> Result<()> {
    // SAFETY: the port was installed during init; uart_write_bytes
    // copies into the driver's TX ring before returning.
    let written =
        unsafe { uart_write_bytes(port, data.as_ptr() as *const core::ffi::c_void, data.len()) };
    if written < 0 || written as usize != data.len() {
        return Err(LinkError::WriteFailed.into());
    }
    Ok(())
}

/// Transmit raw bytes on the host link.
#[cfg(target_os = "espidf")]
pub fn host_uart_write(data: &[u8]) -> Result<()> {
    uart_write(HOST_UART, data)
}

#[cfg(not(target_os = "espidf"))]
pub fn host_uart_write(data: &[u8]) -> Result<()> {
    log::debug!("host_uart(sim): tx {:?}", core::str::from_utf8(data));
    Ok(())
}

/// Transmit raw bytes on the gripper servo bus.
#[cfg(target_os = "espidf")]
pub fn gripper_uart_write(data: &[u8]) -> Result<()> {
    uart_write(GRIPPER_UART, data)
}

#[cfg(not(target_os = "espidf"))]
pub fn gripper_uart_write(data: &[u8]) -> Result<()> {
    log::debug!("gripper_uart(sim): tx {:?}", core::str::from_utf8(data));
    Ok(())
}
