//! Power-mode transition: ordering and terminality.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;
use std::time::Duration;

use envnode::app::ports::Probe;
use envnode::drivers::delay::TaskDelay;
use envnode::error::SensorError;
use envnode::power::PowerController;
use envnode::readings::Readings;
use envnode::sampling::{Quantity, SamplingTask};

use super::mock_hw::{Call, Journal, PanickingSleeper, RecordingPin};

fn enter(ctl: &mut PowerController<PanickingSleeper>, pin: &mut RecordingPin, readings: &Readings) {
    ctl.enter_low_power(pin, readings);
}

struct Steady;

impl Probe for Steady {
    fn read(&mut self) -> Result<f32, SensorError> {
        Ok(50.0)
    }
}

#[test]
fn indicator_goes_low_before_the_chip_sleeps() {
    let readings = Readings::new();
    let journal = Journal::new();
    let mut pin = RecordingPin::new(journal.clone());
    let mut ctl = PowerController::new(PanickingSleeper {
        journal: journal.clone(),
    });

    let res = catch_unwind(AssertUnwindSafe(|| enter(&mut ctl, &mut pin, &readings)));

    assert!(res.is_err(), "deep_sleep must not return");
    assert_eq!(
        journal.calls(),
        vec![Call::Pin(false), Call::WakeArmed, Call::Slept]
    );
}

#[test]
fn no_channel_accepts_writes_after_the_transition() {
    let readings = Readings::new();
    readings.temperature.write(20.0);
    readings.events.write(3);

    let journal = Journal::new();
    let mut pin = RecordingPin::new(journal.clone());
    let mut ctl = PowerController::new(PanickingSleeper { journal });
    let _ = catch_unwind(AssertUnwindSafe(|| enter(&mut ctl, &mut pin, &readings)));

    assert!(!readings.temperature.write(21.0));
    assert!(!readings.humidity.write(40.0));
    assert!(!readings.light.write(10.0));
    assert!(!readings.events.write(4));
    assert!(!readings.alarm.write(true));

    // Values published before the transition stay readable.
    assert_eq!(readings.temperature.read(), Some(20.0));
    assert_eq!(readings.events.read(), Some(3));
}

#[test]
fn running_sampling_task_stops_on_transition() {
    let readings = Readings::new();
    let journal = Journal::new();
    let mut pin = RecordingPin::new(journal.clone());
    let mut ctl = PowerController::new(PanickingSleeper { journal });

    thread::scope(|s| {
        let task = SamplingTask::new(Quantity::Light, 1, Steady, TaskDelay, &readings.light);
        let handle = s.spawn(move || task.run());

        while readings.light.read().is_none() {
            thread::yield_now();
        }
        let _ = catch_unwind(AssertUnwindSafe(|| enter(&mut ctl, &mut pin, &readings)));
        let closed_at = readings.light.version();
        assert!(closed_at >= 1);

        // The task is still looping here; give it time to try again.
        thread::sleep(Duration::from_millis(20));
        handle.join().unwrap();

        assert_eq!(readings.light.version(), closed_at);
    });
}
