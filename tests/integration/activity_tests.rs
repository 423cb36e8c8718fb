//! Activities wired to mock hardware, driven one period at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use airvent::app::activities::{
    ActuationActivity, InputActivity, PresentationActivity, SamplingActivity,
};
use airvent::app::presenter::{Page, PageSelector};
use airvent::cache::ReadingCache;
use airvent::config::SystemConfig;
use airvent::diagnostics::SampleStats;
use airvent::drivers::button::Button;
use airvent::drivers::stepper::{HALF_STEP_SEQUENCE, Stepper};
use airvent::scheduler::{Activity, PeriodicTimer, run_cycles};
use airvent::sensors::SensorReading;
use airvent::sensors::scd41::Scd41;

use crate::mock_hw::{
    FakeClock, FakeDelay, FakeScd41, LevelPin, MemoryStorage, RecordingDisplay, Screen,
    coil_levels, coil_pins,
};

struct SamplingRig {
    activity: SamplingActivity<FakeScd41, FakeDelay, FakeClock>,
    bus: FakeScd41,
    cache: Arc<ReadingCache>,
    stats: Arc<SampleStats>,
    storage: MemoryStorage,
    logging: Arc<AtomicBool>,
    clock: FakeClock,
}

fn sampling_rig() -> SamplingRig {
    let bus = FakeScd41::new();
    let cache = Arc::new(ReadingCache::new());
    let stats = Arc::new(SampleStats::new());
    let storage = MemoryStorage::default();
    let logging = Arc::new(AtomicBool::new(true));
    let clock = FakeClock::default();
    let activity = SamplingActivity::new(
        Scd41::new(bus.clone(), FakeDelay::default()),
        cache.clone(),
        stats.clone(),
        clock.clone(),
        &SystemConfig::default(),
    )
    .with_storage(Box::new(storage.clone()), logging.clone());
    SamplingRig {
        activity,
        bus,
        cache,
        stats,
        storage,
        logging,
        clock,
    }
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn sampling_publishes_and_logs_a_fresh_reading() {
    let mut rig = sampling_rig();
    rig.clock.advance(Duration::from_millis(5_021));
    rig.bus.publish([812, 30000, 25000]);

    rig.activity.run_once();

    let cached = rig.cache.get().expect("reading cached");
    assert_eq!(cached.co2_ppm, 812.0);
    let rows = rig.storage.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].timestamp_ms, 5_021);
    assert_eq!(rows[0].co2_ppm, 812.0);
    assert_eq!(rig.stats.snapshot().ok, 1);
}

#[test]
fn not_ready_leaves_cache_and_log_untouched() {
    let mut rig = sampling_rig();
    rig.bus.publish([900, 30000, 25000]);
    rig.activity.run_once();

    rig.activity.run_once();

    assert_eq!(rig.cache.get().map(|r| r.co2_ppm), Some(900.0));
    assert_eq!(rig.storage.rows().len(), 1);
    assert_eq!(rig.stats.snapshot().not_ready, 1);
}

#[test]
fn faults_keep_the_last_good_reading() {
    let mut rig = sampling_rig();
    rig.bus.publish([650, 30000, 25000]);
    rig.activity.run_once();

    rig.bus.publish([5000, 30000, 25000]);
    rig.bus.corrupt_next_response();
    rig.activity.run_once();
    rig.bus.set_offline(true);
    rig.activity.run_once();

    assert_eq!(rig.cache.get().map(|r| r.co2_ppm), Some(650.0));
    let s = rig.stats.snapshot();
    assert_eq!((s.ok, s.faults, s.consecutive_faults), (1, 2, 2));
}

#[test]
fn logging_flag_gates_storage_only() {
    let mut rig = sampling_rig();
    rig.logging.store(false, Ordering::Relaxed);
    rig.bus.publish([420, 30000, 25000]);

    rig.activity.run_once();

    assert!(rig.cache.has_reading());
    assert!(rig.storage.rows().is_empty());
}

#[test]
fn storage_failure_does_not_affect_the_cache() {
    let mut rig = sampling_rig();
    rig.storage.fail.store(true, Ordering::Relaxed);
    rig.bus.publish([1500, 30000, 25000]);

    rig.activity.run_once();

    assert_eq!(rig.cache.get().map(|r| r.co2_ppm), Some(1500.0));
}

// ── Actuation ─────────────────────────────────────────────────

#[test]
fn motor_idles_until_a_reading_exceeds_threshold() {
    let cache = Arc::new(ReadingCache::new());
    let (pins, levels) = coil_pins();
    let mut act = ActuationActivity::new(cache.clone(), Stepper::new(pins), &SystemConfig::default());

    act.run_once();
    assert_eq!(coil_levels(&levels), [false; 4], "no reading: coils released");

    cache.set(SensorReading::new(1000.0, 21.0, 40.0));
    act.run_once();
    assert_eq!(coil_levels(&levels), [false; 4], "threshold is exclusive");

    cache.set(SensorReading::new(1250.0, 21.0, 40.0));
    for _ in 0..3 {
        act.run_once();
        let phase = act.stepper().phase_index();
        assert_eq!(coil_levels(&levels), HALF_STEP_SEQUENCE[phase]);
    }
    assert_eq!(act.stepper().phase_index(), 3);
}

#[test]
fn motor_releases_and_resumes_phase_when_co2_drops() {
    let cache = Arc::new(ReadingCache::new());
    let (pins, levels) = coil_pins();
    let mut act = ActuationActivity::new(cache.clone(), Stepper::new(pins), &SystemConfig::default());

    cache.set(SensorReading::new(2000.0, 21.0, 40.0));
    act.run_once();
    act.run_once();

    cache.set(SensorReading::new(600.0, 21.0, 40.0));
    act.run_once();
    assert_eq!(coil_levels(&levels), [false; 4]);
    assert_eq!(act.stepper().phase_index(), 2);

    cache.set(SensorReading::new(2000.0, 21.0, 40.0));
    act.run_once();
    assert_eq!(act.stepper().phase_index(), 3);
    assert_eq!(coil_levels(&levels), HALF_STEP_SEQUENCE[3]);
}

#[test]
fn custom_threshold_is_respected() {
    let config = SystemConfig {
        co2_threshold_ppm: 600.0,
        ..SystemConfig::default()
    };
    let cache = Arc::new(ReadingCache::new());
    let (pins, levels) = coil_pins();
    let mut act = ActuationActivity::new(cache.clone(), Stepper::new(pins), &config);

    cache.set(SensorReading::new(700.0, 21.0, 40.0));
    act.run_once();

    assert!(coil_levels(&levels).iter().any(|&on| on));
}

// ── Presentation ──────────────────────────────────────────────

#[test]
fn display_waits_then_follows_selected_page() {
    let cache = Arc::new(ReadingCache::new());
    let pages = Arc::new(PageSelector::default());
    let display = RecordingDisplay::default();
    let mut pres = PresentationActivity::new(
        cache.clone(),
        pages.clone(),
        display.clone(),
        &SystemConfig::default(),
    );

    pres.run_once();
    assert_eq!(display.last(), Some(Screen::Waiting));

    cache.set(SensorReading::new(812.0, 22.5, 41.0));
    pres.run_once();
    pages.advance();
    pres.run_once();
    pages.advance();
    pres.run_once();

    assert_eq!(
        display.history(),
        vec![
            Screen::Waiting,
            Screen::Co2(812.0),
            Screen::Temperature(22.5),
            Screen::Humidity(41.0),
        ]
    );
}

// ── Inputs ────────────────────────────────────────────────────

struct InputRig {
    activity: InputActivity<LevelPin>,
    page_pin: LevelPin,
    log_pin: LevelPin,
    pages: Arc<PageSelector>,
    logging: Arc<AtomicBool>,
}

fn input_rig() -> InputRig {
    let config = SystemConfig::default();
    let page_pin = LevelPin::default();
    let log_pin = LevelPin::default();
    // Page button is active-high with a pull-down: released reads low.
    // Log button is active-low with a pull-up: released reads high.
    page_pin.drive(false);
    log_pin.drive(true);
    let pages = Arc::new(PageSelector::default());
    let logging = Arc::new(AtomicBool::new(false));
    let activity = InputActivity::new(
        Button::new("page", page_pin.clone(), true, config.debounce_samples),
        Button::new("log", log_pin.clone(), false, config.debounce_samples),
        pages.clone(),
        logging.clone(),
        &config,
    );
    InputRig {
        activity,
        page_pin,
        log_pin,
        pages,
        logging,
    }
}

fn poll(rig: &mut InputRig, times: usize) {
    for _ in 0..times {
        rig.activity.run_once();
    }
}

#[test]
fn idle_buttons_change_nothing() {
    let mut rig = input_rig();

    poll(&mut rig, 100);

    assert_eq!(rig.pages.current(), Page::Co2);
    assert!(!rig.logging.load(Ordering::Relaxed));
    assert!(!rig.page_pin.is_set());
    assert!(rig.log_pin.is_set());
}

#[test]
fn page_button_advances_once_per_press() {
    let mut rig = input_rig();

    rig.page_pin.drive(true);
    poll(&mut rig, 4);
    assert_eq!(rig.pages.current(), Page::Co2, "not yet settled");
    poll(&mut rig, 1);
    assert_eq!(rig.pages.current(), Page::Temperature);

    // Holding the button does not repeat.
    poll(&mut rig, 50);
    assert_eq!(rig.pages.current(), Page::Temperature);

    rig.page_pin.drive(false);
    poll(&mut rig, 5);
    rig.page_pin.drive(true);
    poll(&mut rig, 5);
    assert_eq!(rig.pages.current(), Page::Humidity);
}

#[test]
fn page_button_bounce_is_ignored() {
    let mut rig = input_rig();
    for _ in 0..10 {
        rig.page_pin.drive(true);
        poll(&mut rig, 2);
        rig.page_pin.drive(false);
        poll(&mut rig, 1);
    }
    assert_eq!(rig.pages.current(), Page::Co2);
}

#[test]
fn log_button_toggles_on_falling_edge() {
    let mut rig = input_rig();

    rig.log_pin.drive(false);
    poll(&mut rig, 5);
    assert!(rig.logging.load(Ordering::Relaxed));

    rig.log_pin.drive(true);
    poll(&mut rig, 5);
    assert!(rig.logging.load(Ordering::Relaxed), "release does not toggle");

    rig.log_pin.drive(false);
    poll(&mut rig, 5);
    assert!(!rig.logging.load(Ordering::Relaxed));
}

// ── Scheduled end to end ──────────────────────────────────────

#[test]
fn sampled_reading_drives_motor_and_display_on_virtual_time() {
    let config = SystemConfig::default();
    let mut rig = sampling_rig();
    let cache = rig.cache.clone();

    let (pins, levels) = coil_pins();
    let mut motor = ActuationActivity::new(cache.clone(), Stepper::new(pins), &config);
    let display = RecordingDisplay::default();
    let mut screen = PresentationActivity::new(
        cache.clone(),
        Arc::new(PageSelector::default()),
        display.clone(),
        &config,
    );

    // One timeline per activity, as if each ran on its own thread.
    let mut motor_timer = PeriodicTimer::new(FakeClock::default(), motor.period());
    let mut screen_timer = PeriodicTimer::new(FakeClock::default(), screen.period());
    let mut sample_timer = PeriodicTimer::new(rig.clock.clone(), rig.activity.period());

    // Nothing measured yet.
    run_cycles(&mut motor, &mut motor_timer, 10);
    run_cycles(&mut screen, &mut screen_timer, 1);
    assert_eq!(coil_levels(&levels), [false; 4]);
    assert_eq!(display.last(), Some(Screen::Waiting));

    rig.bus.publish([1800, 30000, 25000]);
    run_cycles(&mut rig.activity, &mut sample_timer, 1);
    run_cycles(&mut motor, &mut motor_timer, 8);
    run_cycles(&mut screen, &mut screen_timer, 1);

    assert_eq!(motor.stepper().phase_index(), 0, "eight half-steps wrap");
    assert_eq!(coil_levels(&levels), HALF_STEP_SEQUENCE[0]);
    assert_eq!(display.last(), Some(Screen::Co2(1800.0)));
    assert_eq!(motor_timer.overruns(), 0);
    assert_eq!(motor_timer.next_wake(), Duration::from_millis(5 * 19));
}
