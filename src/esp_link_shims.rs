//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `critical-section` backs every `CriticalSectionRawMutex` in the crate,
//! including the ones written from GPIO ISRs, so the implementation must
//! be usable from interrupt context.  A FreeRTOS spinlock critical section
//! (`portENTER_CRITICAL`, i.e. `xPortEnterCriticalTimeout` with no
//! timeout) masks interrupts on the calling core and holds off the other
//! core; it nests, so a channel write inside the counter's own critical
//! section is fine.

use esp_idf_svc::sys::{
    SPINLOCK_FREE, portMUX_NO_TIMEOUT, portMUX_TYPE, vPortExitCritical, xPortEnterCriticalTimeout,
};

struct EspIsrCriticalSection;

// Only touched through the raw pointer handed to the port layer, which
// serialises access itself.
static mut CS_MUX: portMUX_TYPE = portMUX_TYPE {
    owner: SPINLOCK_FREE,
    count: 0,
};

critical_section::set_impl!(EspIsrCriticalSection);

unsafe impl critical_section::Impl for EspIsrCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        // SAFETY: CS_MUX is a valid, initialised spinlock for the whole
        // program lifetime.
        unsafe { xPortEnterCriticalTimeout(&raw mut CS_MUX, portMUX_NO_TIMEOUT) };
        <critical_section::RawRestoreState as Default>::default()
    }

    unsafe fn release(_token: critical_section::RawRestoreState) {
        // SAFETY: paired with the `acquire` above on the same core.
        unsafe { vPortExitCritical(&raw mut CS_MUX) };
    }
}
