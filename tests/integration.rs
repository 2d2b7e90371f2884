//! Integration tests for touchdeck: full menu + dispatch rounds on a mock board.

use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;

use embassy_futures::block_on;
use embedded_graphics::geometry::{Point, Size};
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;

use touchdeck::diag::bus_scan::BusProbe;
use touchdeck::diag::sensor::{EnvSensor, SamplingMode};
use touchdeck::dispatch::{Action, DemoRunner, Routine};
use touchdeck::error::{StorageOp, Result};
use touchdeck::exercises::{Clock, Storage, Transport};
use touchdeck::ui::assets::{Bitmap, SOUND_MUTED, SOUND_ON};
use touchdeck::ui::overlay::MuteControl;
use touchdeck::ui::surface::{Font, Surface};
use touchdeck::ui::{
    ButtonId, ButtonState, ButtonZone, NavEvent, NavInput, Screen, TouchAction, TouchEvent,
    TouchSource,
};
use touchdeck::{Application, Board, Devices, Error};

// Mock board

struct MockSurface {
    size: Size,
    frame: Vec<String>,
    flushes: usize,
}

impl Surface for MockSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_text(&mut self, _origin: Point, text: &str, _font: Font) {
        self.frame.push(text.to_string());
    }

    fn draw_bitmap(&mut self, _origin: Point, _bitmap: &Bitmap) {}

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// One entry per poll; a `None` entry ends the current drain.
#[derive(Default)]
struct ScriptedTouch {
    polls: VecDeque<Option<TouchEvent>>,
}

impl TouchSource for ScriptedTouch {
    async fn poll_touch(&mut self) -> Option<TouchEvent> {
        self.polls.pop_front().flatten()
    }
}

#[derive(Default)]
struct MockAudio {
    calls: Vec<bool>,
}

impl MuteControl for MockAudio {
    fn set_muted(&mut self, muted: bool) {
        self.calls.push(muted);
    }
}

/// Replays a key script, then stays idle; bails out of runaway loops.
struct ScriptedNav {
    events: VecDeque<NavEvent>,
    idle: usize,
}

impl NavInput for ScriptedNav {
    fn poll_nav(&mut self) -> Option<NavEvent> {
        let next = self.events.pop_front();
        if next.is_none() {
            self.idle += 1;
            assert!(self.idle < 10_000, "menu never confirmed or cancelled");
        }
        next
    }
}

/// Cancel button reads pressed from the (n+1)-th query on.
struct CancelAfter(usize);

impl ButtonState for CancelAfter {
    fn is_pressed(&mut self, zone: ButtonZone, button: ButtonId) -> bool {
        assert_eq!((zone, button), (ButtonZone::External, ButtonId::Left));
        if self.0 == 0 {
            true
        } else {
            self.0 -= 1;
            false
        }
    }
}

#[derive(Default)]
struct AckProbe {
    acked: Vec<u8>,
    probes: usize,
}

impl BusProbe for AckProbe {
    async fn is_device_ready(&mut self, address: u8, _attempts: u8) -> Result<()> {
        self.probes += 1;
        if self.acked.contains(&address) {
            Ok(())
        } else {
            Err(Error::BusNack)
        }
    }
}

struct FixedSensor {
    measure_fails: bool,
}

impl EnvSensor for FixedSensor {
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    async fn set_sampling(&mut self, _mode: SamplingMode) -> Result<()> {
        Ok(())
    }

    async fn take_measurement(&mut self) -> Result<()> {
        if self.measure_fails {
            Err(Error::BusNack)
        } else {
            Ok(())
        }
    }

    fn temperature_x100(&self) -> i32 {
        2508
    }

    fn pressure_x256(&self) -> i32 {
        25_767_233
    }

    fn humidity_x1024(&self) -> i32 {
        51_200
    }
}

#[derive(Default)]
struct MemStorage {
    fail_mount: bool,
    mounted: bool,
    open: Option<String>,
    files: BTreeMap<String, Vec<u8>>,
}

impl Storage for MemStorage {
    async fn mount(&mut self) -> Result<()> {
        if self.fail_mount {
            return Err(Error::Storage {
                op: StorageOp::Mount,
                code: 3,
            });
        }
        self.mounted = true;
        Ok(())
    }

    async fn open(&mut self, name: &str) -> Result<()> {
        assert!(self.mounted);
        self.files.insert(name.to_string(), Vec::new());
        self.open = Some(name.to_string());
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let name = self.open.as_ref().ok_or(Error::Storage {
            op: StorageOp::Write,
            code: 8,
        })?;
        self.files
            .get_mut(name)
            .ok_or(Error::BufferOverflow)?
            .extend_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.open.take().map(|_| ()).ok_or(Error::Storage {
            op: StorageOp::Close,
            code: 8,
        })
    }
}

/// Transport that goes idle after `busy_polls` idle checks (never if `None`).
#[derive(Default)]
struct LoopbackTransport {
    staged: Vec<u8>,
    sent: Vec<u8>,
    busy_polls: Option<usize>,
    remaining: Option<usize>,
}

impl Transport for LoopbackTransport {
    fn submit(&mut self, data: &[u8]) -> Result<()> {
        self.staged = data.to_vec();
        Ok(())
    }

    fn transmit(&mut self) -> Result<()> {
        self.sent = std::mem::take(&mut self.staged);
        self.remaining = self.busy_polls;
        Ok(())
    }

    fn is_idle(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => false,
            Some(0) => true,
            Some(n) => {
                *n -= 1;
                false
            }
        }
    }
}

#[derive(Default)]
struct MockPin {
    levels: Vec<bool>,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.levels.push(true);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDelay {
    total_us: u64,
}

impl RecordingDelay {
    fn total_ms(&self) -> u64 {
        self.total_us / 1_000
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_us += ns as u64 / 1_000;
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_us += ms as u64 * 1_000;
    }
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Records the routines it was asked to run; each run is one screen pass.
#[derive(Default)]
struct RecordingDemos {
    runs: Vec<Routine>,
}

impl DemoRunner<MockSurface, ScriptedTouch, MockAudio> for RecordingDemos {
    async fn run(
        &mut self,
        routine: Routine,
        screen: &mut Screen<MockSurface, ScriptedTouch, MockAudio>,
    ) {
        self.runs.push(routine);
        screen.begin_frame();
        screen.present().await;
    }
}

struct TestBoard;

impl Board for TestBoard {
    type Surface = MockSurface;
    type Touch = ScriptedTouch;
    type Audio = MockAudio;
    type Nav = ScriptedNav;
    type Buttons = CancelAfter;
    type Probe = AckProbe;
    type Sensor = FixedSensor;
    type Storage = MemStorage;
    type Transport = LoopbackTransport;
    type Servo = MockPin;
    type Delay = RecordingDelay;
    type Clock = FixedClock;
    type Demos = RecordingDemos;
}

fn app_with(keys: &[NavEvent], touch: &[Option<TouchEvent>]) -> Application<TestBoard> {
    let surface = MockSurface {
        size: Size::new(320, 240),
        frame: Vec::new(),
        flushes: 0,
    };
    let touch = ScriptedTouch {
        polls: touch.iter().copied().collect(),
    };
    let devices = Devices {
        nav: ScriptedNav {
            events: keys.iter().copied().collect(),
            idle: 0,
        },
        buttons: CancelAfter(1),
        probe: AckProbe {
            acked: vec![0x38, 0x76],
            probes: 0,
        },
        sensor: FixedSensor {
            measure_fails: false,
        },
        storage: MemStorage::default(),
        transport: LoopbackTransport {
            busy_polls: Some(3),
            ..LoopbackTransport::default()
        },
        servo: MockPin::default(),
        delay: RecordingDelay::default(),
        clock: FixedClock(1234),
        demos: RecordingDemos::default(),
    };
    Application::new(surface, touch, MockAudio::default(), devices)
}

fn app(keys: &[NavEvent]) -> Application<TestBoard> {
    app_with(keys, &[])
}

/// `n` presses of Down followed by Select.
fn select_row(n: usize) -> Vec<NavEvent> {
    let mut keys = vec![NavEvent::Down; n];
    keys.push(NavEvent::Select);
    keys
}

fn frame(app: &mut Application<TestBoard>) -> Vec<String> {
    app.screen().surface().frame.clone()
}

// Tests

#[test]
fn back_at_root_cancels_without_dispatch() {
    let mut app = app(&[NavEvent::Back]);

    assert_eq!(block_on(app.step()), None);

    let frame = frame(&mut app);
    assert_eq!(frame[0], "Main Menu");
    assert_eq!(frame[1], "> Tetris");
    assert!(frame.contains(&"  SD write test (x10)".to_string()));
    assert!(frame.contains(&"  Servo test (100 pulses)".to_string()));
}

#[test]
fn i2c_ping_sweeps_until_cancel_button() {
    let mut app = app(&select_row(10));

    assert_eq!(block_on(app.step()), Some(Action::Diagnostics));

    // Cancel reads pressed on the second check: two full sweeps.
    assert_eq!(app.devices().probe.probes, 2 * 128);

    let frame = frame(&mut app);
    assert!(frame.contains(&"3x| -- -- -- -- -- -- -- -- 38 -- -- -- -- -- -- --".to_string()));
    assert!(frame.contains(&"7x| -- -- -- -- -- -- 76 -- -- -- -- -- -- -- -- --".to_string()));
    assert_eq!(
        frame.last().map(String::as_str),
        Some("T=25.08C P=100653Pa H=50.00%")
    );
    // 10 menu frames plus one diagnostic period.
    assert_eq!(app.devices().delay.total_ms(), 10 * 20 + 100);
}

#[test]
fn i2c_ping_shows_error_marker_when_measurement_fails() {
    let mut app = app(&select_row(10));
    app.devices().sensor.measure_fails = true;

    block_on(app.step());

    let frame = frame(&mut app);
    assert_eq!(
        frame.last().map(String::as_str),
        Some("T=--C P=--Pa H=--% ERROR")
    );
}

#[test]
fn sd_write_test_writes_ten_lines_and_reports_success() {
    let mut app = app(&select_row(6));

    assert_eq!(block_on(app.step()), Some(Action::SdWrite));

    let line = "SD write test. Timestamp: 1234\r\n";
    let written = &app.devices().storage.files["TOUCHDK.TXT"];
    assert_eq!(written, &line.repeat(10).into_bytes());
    assert!(app.devices().storage.open.is_none());

    let frame = frame(&mut app);
    assert_eq!(frame, ["Success", "File written successfully"]);
    // 6 menu frames plus the 3 s notice.
    assert_eq!(app.devices().delay.total_ms(), 6 * 20 + 3000);
}

#[test]
fn sd_write_test_reports_mount_failure() {
    let mut app = app(&select_row(6));
    app.devices().storage.fail_mount = true;

    assert_eq!(block_on(app.step()), Some(Action::SdWrite));

    assert!(app.devices().storage.files.is_empty());
    assert_eq!(frame(&mut app), ["Error", "File write error"]);
}

#[test]
fn usb_test_sends_timestamp_line() {
    let mut app = app(&select_row(7));

    assert_eq!(block_on(app.step()), Some(Action::UsbTransmit));

    assert_eq!(
        app.devices().transport.sent,
        b"USB test. Timestamp: 1234\r\n".to_vec()
    );
    assert_eq!(frame(&mut app), ["Success", "USB packet sent"]);
}

#[test]
fn usb_test_times_out_when_transfer_never_completes() {
    let mut app = app(&select_row(7));
    app.devices().transport.busy_polls = None;

    block_on(app.step());

    assert_eq!(frame(&mut app), ["Error", "USB transmit error"]);
}

#[test]
fn servo_test_drives_full_pulse_train() {
    let mut app = app(&select_row(8));

    assert_eq!(block_on(app.step()), Some(Action::ServoPulse));

    let levels = &app.devices().servo.levels;
    assert_eq!(levels.len(), 200);
    assert!(levels.chunks(2).all(|c| c == [true, false]));
    assert_eq!(frame(&mut app), ["Success", "Servo pulses done"]);
}

#[test]
fn menu_reopens_on_the_last_selected_row() {
    let mut keys = select_row(8);
    keys.push(NavEvent::Select);
    let mut app = app(&keys);

    assert_eq!(block_on(app.step()), Some(Action::ServoPulse));
    assert_eq!(block_on(app.step()), Some(Action::ServoPulse));
    assert_eq!(app.devices().servo.levels.len(), 400);
}

#[test]
fn external_routines_go_to_the_demo_runner() {
    let mut keys = select_row(0);
    keys.extend(select_row(9));
    let mut app = app(&keys);

    assert_eq!(
        block_on(app.step()),
        Some(Action::External(Routine::Tetris))
    );
    assert_eq!(
        block_on(app.step()),
        Some(Action::External(Routine::TouchCalibrate))
    );
    assert_eq!(
        app.devices().demos.runs,
        [Routine::Tetris, Routine::TouchCalibrate]
    );
}

#[test]
fn overlay_stays_live_during_a_notice_and_keeps_state_after() {
    let tap = TouchEvent::new(TouchAction::Touch, 300, 220);
    // Seven menu passes see no touch; the notice's first pass gets the tap.
    let mut touch = vec![None; 7];
    touch.push(Some(tap));
    let mut keys = select_row(6);
    keys.push(NavEvent::Back);
    let mut app = app_with(&keys, &touch);

    assert_eq!(block_on(app.step()), Some(Action::SdWrite));
    assert!(app.screen().overlay().is_muted());
    assert_eq!(app.screen().overlay().glyph(), &SOUND_MUTED);
    assert_eq!(app.screen().overlay().audio().calls, [false, true]);

    // Back in the menu the overlay keeps its state.
    assert_eq!(block_on(app.step()), None);
    assert!(app.screen().overlay().is_muted());
}

#[test]
fn taps_outside_the_overlay_do_nothing() {
    let touch = [Some(TouchEvent::new(TouchAction::Touch, 10, 10))];
    let mut app = app_with(&[NavEvent::Back], &touch);

    block_on(app.step());

    assert!(!app.screen().overlay().is_muted());
    assert_eq!(app.screen().overlay().glyph(), &SOUND_ON);
    assert_eq!(app.screen().overlay().audio().calls, [false]);
}
