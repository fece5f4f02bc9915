//! MonitorService: events, alarm blinking, telemetry and idle sleep.

use envnode::app::events::AppEvent;
use envnode::app::service::{MonitorService, Tick};
use envnode::config::SystemConfig;
use envnode::events::{DebounceMode, EventCounter};
use envnode::readings::Readings;

use super::mock_hw::{CollectSink, Journal, RecordingPin};

fn cfg(idle_sleep_secs: u32, telemetry_interval_secs: u32) -> SystemConfig {
    SystemConfig {
        idle_sleep_secs,
        telemetry_interval_secs,
        ..SystemConfig::default()
    }
}

fn count_of(sink: &CollectSink, f: impl Fn(&AppEvent) -> bool) -> usize {
    sink.events.iter().filter(|e| f(e)).count()
}

#[test]
fn accepted_event_is_reported_once_and_delays_sleep() {
    let readings = Readings::new();
    let counter = EventCounter::new(700, DebounceMode::SinceAccepted, &readings.events);
    let mut svc = MonitorService::new(&cfg(10, 0), 0);
    let mut pin = RecordingPin::new(Journal::new());
    let mut sink = CollectSink::default();

    assert_eq!(svc.tick(5_000, 100, &readings, &mut pin, &mut sink), Tick::Continue);
    counter.on_trigger(9_000);
    assert_eq!(svc.tick(9_000, 100, &readings, &mut pin, &mut sink), Tick::Continue);
    assert_eq!(svc.tick(9_100, 100, &readings, &mut pin, &mut sink), Tick::Continue);
    assert_eq!(count_of(&sink, |e| matches!(e, AppEvent::EventCounted(1))), 1);

    // Idle timer restarted at 9 s.
    assert_eq!(svc.tick(18_999, 100, &readings, &mut pin, &mut sink), Tick::Continue);
    assert_eq!(svc.tick(19_000, 100, &readings, &mut pin, &mut sink), Tick::Sleep);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::EnteringLowPower { idle_secs: 10 })
    ));
}

#[test]
fn alarm_blinks_seven_on_five_off_then_clears_dark() {
    let readings = Readings::new();
    let journal = Journal::new();
    let mut pin = RecordingPin::new(journal.clone());
    let mut svc = MonitorService::new(&cfg(0, 0), 0);
    let mut sink = CollectSink::default();

    readings.temperature.write(35.0);
    for i in 0..12 {
        svc.tick(i * 100, 100, &readings, &mut pin, &mut sink);
    }
    let levels = journal.levels();
    assert_eq!(levels, [vec![true; 7], vec![false; 5]].concat());
    assert!(svc.alarm_active());
    assert_eq!(readings.alarm.read(), Some(true));

    readings.temperature.write(22.0);
    svc.tick(1_200, 100, &readings, &mut pin, &mut sink);
    assert_eq!(journal.levels().last(), Some(&false));
    assert_eq!(readings.alarm.read(), Some(false));

    let changes: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AlarmChanged(a) => Some(*a),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![true, false]);
}

#[test]
fn telemetry_follows_the_interval() {
    let readings = Readings::new();
    readings.light.write(12.5);
    let mut svc = MonitorService::new(&cfg(0, 60), 0);
    let mut pin = RecordingPin::new(Journal::new());
    let mut sink = CollectSink::default();

    svc.tick(59_999, 100, &readings, &mut pin, &mut sink);
    assert_eq!(count_of(&sink, |e| matches!(e, AppEvent::Telemetry(_))), 0);

    svc.tick(60_000, 100, &readings, &mut pin, &mut sink);
    svc.tick(60_100, 100, &readings, &mut pin, &mut sink);
    let snaps: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(snaps.len(), 1);
    assert_eq!(snaps[0].light_percent, Some(12.5));
    assert_eq!(snaps[0].temperature_c, None);
}
