//! Hardware tick timer using ESP-IDF's esp_timer API.
//!
//! A single periodic timer paces the control loop by bumping the pending
//! tick counter in [`crate::events`].  Timer callbacks execute in the
//! ESP timer task context (not ISR), so the atomic increment is safe.
//!
//! On simulation targets the main loop paces itself with sleeps instead.

use crate::error::Result;

#[cfg(target_os = "espidf")]
use crate::error::Error;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut CONTROL_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn control_tick_cb(_arg: *mut core::ffi::c_void) {
    crate::events::tick_isr();
}

/// Start the periodic control tick timer.
#[cfg(target_os = "espidf")]
pub fn start_control_timer(period_ms: u32) -> Result<()> {
    // SAFETY: CONTROL_TIMER is written here once at boot from the single
    // main-task context before any timer callbacks fire.  The callback
    // only bumps an atomic counter.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(control_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"control\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut CONTROL_TIMER);
        if ret != ESP_OK {
            return Err(Error::Init("control timer create failed"));
        }
        let ret = esp_timer_start_periodic(CONTROL_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK {
            return Err(Error::Init("control timer start failed"));
        }
    }
    info!("hw_timer: control tick @{period_ms}ms started");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_control_timer(period_ms: u32) -> Result<()> {
    log::info!("hw_timer(sim): control tick @{period_ms}ms driven by sleep loop");
    Ok(())
}
