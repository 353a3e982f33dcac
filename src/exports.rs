//! The exports the host links against in place of the system XInput.
//!
//! Names, calling convention and parameter layout match `xinput1_3.dll`.
//! Each one hands its arguments unchanged to the real library, or answers
//! `ERROR_DEVICE_NOT_CONNECTED` when the matching export was not resolved.

#![allow(non_snake_case)]

use crate::entry_point::Bool;
use crate::state;
use std::ffi::c_void;

#[no_mangle]
pub unsafe extern "system" fn XInputGetState(user_index: u32, gamepad_state: *mut c_void) -> u32 {
    state::forward(|t| t.get_state(user_index, gamepad_state))
}

#[no_mangle]
pub unsafe extern "system" fn XInputSetState(user_index: u32, vibration: *mut c_void) -> u32 {
    state::forward(|t| t.set_state(user_index, vibration))
}

#[no_mangle]
pub unsafe extern "system" fn XInputGetCapabilities(
    user_index: u32,
    flags: u32,
    capabilities: *mut c_void,
) -> u32 {
    state::forward(|t| t.get_capabilities(user_index, flags, capabilities))
}

#[no_mangle]
pub unsafe extern "system" fn XInputEnable(enable: Bool) -> u32 {
    state::forward(|t| t.enable(enable))
}

#[no_mangle]
pub unsafe extern "system" fn XInputGetBatteryInformation(
    user_index: u32,
    dev_type: u8,
    battery_information: *mut c_void,
) -> u32 {
    state::forward(|t| t.get_battery_information(user_index, dev_type, battery_information))
}

#[no_mangle]
pub unsafe extern "system" fn XInputGetKeystroke(
    user_index: u32,
    reserved: u32,
    keystroke: *mut c_void,
) -> u32 {
    state::forward(|t| t.get_keystroke(user_index, reserved, keystroke))
}
