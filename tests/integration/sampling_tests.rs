//! Sampling task → channel behaviour, end to end on the host.

use envnode::channel::Latest;
use envnode::config::SystemConfig;
use envnode::error::SensorError;
use envnode::readings::Readings;
use envnode::sampling::{Quantity, SamplingTask, Step};
use envnode::sensors::dht::{self, Dht, DhtHumidity, DhtTemperature};

use super::mock_hw::{CountingDelay, ScriptedProbe};

#[test]
fn invalid_readings_never_overwrite_the_last_good_value() {
    let ch = Latest::new();
    let probe = ScriptedProbe::new([
        Ok(21.0),
        Ok(f32::NAN),
        Err(SensorError::NoResponse),
        Ok(500.0),
        Ok(22.5),
    ]);
    let delay = CountingDelay::new(5, &ch);
    let periods = delay.periods_ms.clone();

    SamplingTask::new(Quantity::Temperature, 2500, probe, delay, &ch).run();

    assert_eq!(ch.read(), Some(22.5));
    assert_eq!(ch.version(), 2, "only the two valid readings were written");
    let periods = periods.lock().unwrap();
    assert_eq!(periods.len(), 5);
    assert!(periods.iter().all(|&p| p == 2500));
}

#[test]
fn tasks_use_their_own_periods_and_channels() {
    let cfg = SystemConfig::default();
    let readings = Readings::new();

    for (q, expected_ms) in [
        (Quantity::Temperature, 2500),
        (Quantity::Humidity, 3200),
        (Quantity::Light, 1600),
    ] {
        let ch = q.channel(&readings);
        let delay = CountingDelay::new(1, ch);
        let periods = delay.periods_ms.clone();
        SamplingTask::for_quantity(q, &cfg, &readings, ScriptedProbe::new([Ok(42.0)]), delay).run();

        assert_eq!(*periods.lock().unwrap(), vec![expected_ms]);
        assert_eq!(ch.read(), Some(42.0), "{}", q.label());
    }
}

#[test]
fn closed_channel_halts_before_reading() {
    let ch = Latest::new();
    ch.close();
    let mut probe = ScriptedProbe::new([Ok(1.0)]);
    let mut task = SamplingTask::new(
        Quantity::Light,
        1600,
        &mut probe,
        CountingDelay::new(usize::MAX, &ch),
        &ch,
    );
    assert_eq!(task.step(), Step::Halted);
    drop(task);
    assert_eq!(probe.reads, 0);
}

#[test]
fn shared_dht_serves_both_quantities_from_one_frame() {
    // 48.0 %RH, 26.3 °C
    dht::sim_set_dht_frame(Some([48, 0, 26, 3, 77]));
    let shared = dht::shared(Dht::new(13));
    let readings = Readings::new();

    let mut t = SamplingTask::new(
        Quantity::Temperature,
        2500,
        DhtTemperature(shared.clone()),
        CountingDelay::new(usize::MAX, &readings.temperature),
        &readings.temperature,
    );
    let mut h = SamplingTask::new(
        Quantity::Humidity,
        3200,
        DhtHumidity(shared.clone()),
        CountingDelay::new(usize::MAX, &readings.humidity),
        &readings.humidity,
    );

    assert!(matches!(t.step(), Step::Published(v) if (v - 26.3).abs() < 1e-4));
    assert_eq!(h.step(), Step::Published(48.0));
    assert_eq!(shared.lock().unwrap().bus_reads(), 1, "second read served from cache");
}
