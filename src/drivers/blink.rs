//! Square-wave blink generator for the single indicator LED.
//!
//! The main loop calls `tick()` each control cycle with the elapsed time
//! and writes the returned level to the indicator.  While inactive the
//! output is held low; activation restarts the cycle at the ON edge.
//!
//! ```text
//!   active:   ▔▔▔▔▔▔▔▁▁▁▁▁▔▔▔▔▔▔▔▁▁▁▁▁ …
//!             |<-on->|<off>|
//! ```

pub struct Blinker {
    on_ms: u32,
    off_ms: u32,
    phase_ms: u32,
    active: bool,
}

impl Blinker {
    pub fn new(on_ms: u32, off_ms: u32) -> Self {
        Self {
            on_ms,
            off_ms,
            phase_ms: 0,
            active: false,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if active != self.active {
            self.phase_ms = 0;
        }
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Level for the current cycle position, then advance by `delta_ms`.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if !self.active {
            return false;
        }
        let period = self.on_ms.saturating_add(self.off_ms).max(1);
        let level = self.phase_ms % period < self.on_ms;
        self.phase_ms = (self.phase_ms % period).wrapping_add(delta_ms);
        level
    }
}
