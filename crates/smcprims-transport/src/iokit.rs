//! Minimal IOKit bindings for the SMC user client.

#![allow(non_camel_case_types)]

use std::ffi::CStr;

use libc::{c_char, c_int, c_uint, c_void};
use tracing::{debug, warn};

use crate::error::{KernReturn, Result, TransportError};

pub(crate) type kern_return_t = c_int;
pub(crate) type mach_port_t = c_uint;
pub(crate) type io_object_t = mach_port_t;
pub(crate) type io_iterator_t = io_object_t;
pub(crate) type io_service_t = io_object_t;
pub(crate) type io_connect_t = io_object_t;

const KERN_SUCCESS: kern_return_t = 0;
const MACH_PORT_NULL: mach_port_t = 0;

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOServiceMatching(name: *const c_char) -> *mut c_void;
    fn IOServiceGetMatchingServices(
        main_port: mach_port_t,
        matching: *mut c_void,
        existing: *mut io_iterator_t,
    ) -> kern_return_t;
    fn IOIteratorNext(iterator: io_iterator_t) -> io_object_t;
    fn IOObjectRelease(object: io_object_t) -> kern_return_t;
    fn IOServiceOpen(
        service: io_service_t,
        owning_task: mach_port_t,
        kind: u32,
        connect: *mut io_connect_t,
    ) -> kern_return_t;
    fn IOServiceClose(connect: io_connect_t) -> kern_return_t;
    fn IOConnectCallStructMethod(
        connection: mach_port_t,
        selector: u32,
        input: *const c_void,
        input_size: usize,
        output: *mut c_void,
        output_size: *mut usize,
    ) -> kern_return_t;
}

extern "C" {
    static mach_task_self_: mach_port_t;
}

/// Locate the first service matching `name` and open a user-client connection.
pub(crate) fn open_service(name: &CStr) -> Result<io_connect_t> {
    // SAFETY: `name` is a valid NUL-terminated string for the call duration.
    let matching = unsafe { IOServiceMatching(name.as_ptr()) };
    if matching.is_null() {
        return Err(TransportError::DeviceNotFound);
    }

    let mut iterator: io_iterator_t = 0;
    // SAFETY: `matching` is a fresh dictionary whose reference is consumed by
    // this call; `iterator` is a valid out-pointer.
    let kr = unsafe { IOServiceGetMatchingServices(MACH_PORT_NULL, matching, &mut iterator) };
    if kr != KERN_SUCCESS {
        warn!(code = format_args!("{kr:08x}"), "IOServiceGetMatchingServices failed");
        return Err(TransportError::DeviceNotFound);
    }

    // SAFETY: `iterator` was returned by a successful lookup and is released
    // exactly once.
    let device = unsafe {
        let device = IOIteratorNext(iterator);
        IOObjectRelease(iterator);
        device
    };
    if device == 0 {
        return Err(TransportError::DeviceNotFound);
    }

    let mut conn: io_connect_t = 0;
    // SAFETY: `device` is a live service object released exactly once below;
    // `conn` is a valid out-pointer.
    let kr = unsafe {
        let kr = IOServiceOpen(device, mach_task_self_, 0, &mut conn);
        IOObjectRelease(device);
        kr
    };
    if kr != KERN_SUCCESS {
        return Err(TransportError::OpenFailed(kr));
    }

    debug!(conn, "opened IOKit user client");
    Ok(conn)
}

/// Issue one struct-method call with equal-size input and output buffers.
pub(crate) fn call_struct_method(
    conn: io_connect_t,
    selector: u32,
    input: &[u8],
    output: &mut [u8],
) -> Result<()> {
    let mut output_size = output.len();
    // SAFETY: both buffers are valid for their stated lengths and `conn` is an
    // open connection owned by the caller.
    let kr = unsafe {
        IOConnectCallStructMethod(
            conn,
            selector,
            input.as_ptr().cast::<c_void>(),
            input.len(),
            output.as_mut_ptr().cast::<c_void>(),
            &mut output_size,
        )
    };
    if kr != KERN_SUCCESS {
        return Err(TransportError::Call(kr));
    }
    Ok(())
}

/// Close a user-client connection.
pub(crate) fn close(conn: io_connect_t) -> KernReturn {
    // SAFETY: `conn` is an open connection closed exactly once by its owner.
    unsafe { IOServiceClose(conn) }
}
