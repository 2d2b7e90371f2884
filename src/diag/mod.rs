//! I²C bus diagnostics - address sweep plus environmental sensor readout.
//!
//! One iteration is strictly ordered: full sweep, then one sensor cycle,
//! then render, then the cancel check. Cancellation is only observed
//! between iterations; a sweep or cycle in flight always completes.

pub mod bus_scan;
pub mod fixed_point;
pub mod sensor;

use embedded_graphics::geometry::Point;
use embedded_hal_async::delay::DelayNs;

use crate::config::{DIAG_CANCEL_BUTTON, DIAG_CANCEL_ZONE, DIAG_PERIOD_MS, GRID_ROWS};
use crate::ui::overlay::MuteControl;
use crate::ui::surface::{Font, Surface};
use crate::ui::{ButtonState, Screen, TouchSource};
use bus_scan::{BusProbe, BusScanner, ScanResult, GRID_HEADER, GRID_SEPARATOR};
use sensor::{CycleReport, EnvSensor, SensorSession};

/// Everything one iteration produced; owned by that iteration only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationReport {
    pub scan: ScanResult,
    pub cycle: CycleReport,
}

impl IterationReport {
    /// Draw the diagnostic screen: header, separator, grid rows, sensor line.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        let small = Font::Small.line_height();
        let mut y = 0;

        surface.draw_text(Point::new(0, y), GRID_HEADER, Font::Small);
        y += small;
        surface.draw_text(Point::new(0, y), GRID_SEPARATOR, Font::Small);
        y += small;
        for row in 0..GRID_ROWS {
            surface.draw_text(Point::new(0, y), &self.scan.grid_row(row), Font::Small);
            y += small;
        }

        y += small / 2;
        surface.draw_text(Point::new(0, y), &self.cycle.display_line(), Font::Large);
    }
}

/// Continuous bus sweep plus sensor acquisition, until cancelled.
pub struct DiagnosticLoop<P, S> {
    scanner: BusScanner<P>,
    session: SensorSession<S>,
}

impl<P: BusProbe, S: EnvSensor> DiagnosticLoop<P, S> {
    pub fn new(probe: P, sensor: S) -> Self {
        Self {
            scanner: BusScanner::new(probe),
            session: SensorSession::new(sensor),
        }
    }

    pub fn scanner(&self) -> &BusScanner<P> {
        &self.scanner
    }

    pub fn session(&self) -> &SensorSession<S> {
        &self.session
    }

    /// One sweep followed by one sensor cycle.
    ///
    /// Probe failures stay inside the scan result; they never reach the
    /// cycle's outcome.
    pub async fn iterate(&mut self) -> IterationReport {
        let scan = self.scanner.sweep().await;
        let cycle = self.session.cycle().await;
        IterationReport { scan, cycle }
    }

    /// Run until the cancel button is seen, returning the number of
    /// completed iterations.
    ///
    /// The button is queried once per iteration, after the frame of that
    /// iteration has been presented.
    pub async fn run<Su, T, A, B, D>(
        &mut self,
        screen: &mut Screen<Su, T, A>,
        buttons: &mut B,
        delay: &mut D,
    ) -> u32
    where
        Su: Surface,
        T: TouchSource,
        A: MuteControl,
        B: ButtonState,
        D: DelayNs,
    {
        info!("Diagnostics: start");
        let mut iterations = 0u32;
        loop {
            let report = self.iterate().await;
            iterations = iterations.wrapping_add(1);

            screen.begin_frame();
            report.render(screen.surface());
            screen.present().await;

            if buttons.is_pressed(DIAG_CANCEL_ZONE, DIAG_CANCEL_BUTTON) {
                break;
            }
            delay.delay_ms(DIAG_PERIOD_MS).await;
        }
        info!("Diagnostics: cancelled after {} iteration(s)", iterations);
        iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::test_support::{
        AckProbe, CancelAfter, MockAudio, MockSurface, RecordingDelay, ScriptedSensor,
        ScriptedTouch,
    };
    use crate::ui::overlay::ToggleOverlay;
    use crate::ui::{ButtonId, ButtonZone, TouchAction, TouchEvent};
    use embassy_futures::block_on;
    use embedded_graphics::geometry::Size;
    use std::cell::Cell;
    use std::rc::Rc;

    fn screen_with(touch: ScriptedTouch) -> Screen<MockSurface, ScriptedTouch, MockAudio> {
        let overlay = ToggleOverlay::bottom_right(Size::new(320, 240), false, MockAudio::default());
        Screen::new(MockSurface::new(320, 240), touch, overlay)
    }

    fn screen() -> Screen<MockSurface, ScriptedTouch, MockAudio> {
        screen_with(ScriptedTouch::default())
    }

    #[test]
    fn renders_grid_and_sensor_line() {
        let mut diag = DiagnosticLoop::new(
            AckProbe::with(&[0x76]),
            ScriptedSensor::reading(2550, 2_566_400, 51_200),
        );
        let report = block_on(diag.iterate());
        let mut surface = MockSurface::new(320, 240);
        report.render(&mut surface);

        assert_eq!(surface.frame.len(), 11);
        assert_eq!(surface.frame[0], GRID_HEADER);
        assert_eq!(surface.frame[1], GRID_SEPARATOR);
        assert_eq!(
            surface.frame[9],
            "7x| -- -- -- -- -- -- 76 -- -- -- -- -- -- -- -- --"
        );
        assert_eq!(surface.frame[10], "T=25.50C P=10025Pa H=50.00%");
    }

    #[test]
    fn probe_failures_do_not_taint_sensor_outcome() {
        // Nothing acknowledges at all.
        let mut diag = DiagnosticLoop::new(AckProbe::with(&[]), ScriptedSensor::reading(0, 0, 0));
        let report = block_on(diag.iterate());
        assert_eq!(report.scan.count(), 0);
        assert!(report.cycle.is_good());
    }

    #[test]
    fn runs_until_cancel_and_sleeps_between_iterations() {
        // A tap on the sound overlay arrives while the diagnostic screen is up.
        let mut touch = ScriptedTouch::default();
        touch.events.push_back(TouchEvent::new(TouchAction::Touch, 300, 220));
        touch.events.push_back(TouchEvent::new(TouchAction::Untouch, 300, 220));
        let mut screen = screen_with(touch);
        let mut cancel = CancelAfter::new(2);
        let mut delay = RecordingDelay::default();
        let mut diag = DiagnosticLoop::new(AckProbe::with(&[0x38]), ScriptedSensor::reading(0, 0, 0));

        let iterations = block_on(diag.run(&mut screen, &mut cancel, &mut delay));

        assert_eq!(iterations, 3);
        assert_eq!(cancel.queries, 3);
        assert_eq!(diag.scanner().probe().probes.len(), 3 * 128);
        assert_eq!(diag.session().sensor().count("measure"), 3);
        assert_eq!(delay.calls, 2);
        assert_eq!(delay.total_ms(), 2 * DIAG_PERIOD_MS as u64);
        assert_eq!(screen.surface().flushes, 3);
        assert!(screen.overlay().is_muted());
        assert_eq!(screen.overlay().audio().calls, vec![false, true]);
    }

    /// Probe that raises the shared cancel flag when it reaches `trigger`.
    struct CancellingProbe {
        flag: Rc<Cell<bool>>,
        trigger: u8,
        probed: usize,
    }

    impl BusProbe for CancellingProbe {
        async fn is_device_ready(&mut self, address: u8, _attempts: u8) -> Result<()> {
            self.probed += 1;
            if address == self.trigger {
                self.flag.set(true);
            }
            Err(Error::BusNack)
        }
    }

    struct FlagButton(Rc<Cell<bool>>);

    impl ButtonState for FlagButton {
        fn is_pressed(&mut self, zone: ButtonZone, button: ButtonId) -> bool {
            zone == ButtonZone::External && button == ButtonId::Left && self.0.get()
        }
    }

    #[test]
    fn cancel_during_sweep_waits_for_iteration_to_finish() {
        let flag = Rc::new(Cell::new(false));
        let probe = CancellingProbe {
            flag: flag.clone(),
            trigger: 0x40,
            probed: 0,
        };
        let mut screen = screen();
        let mut delay = RecordingDelay::default();
        let mut diag = DiagnosticLoop::new(probe, ScriptedSensor::reading(0, 0, 0));

        let iterations = block_on(diag.run(&mut screen, &mut FlagButton(flag), &mut delay));

        assert_eq!(iterations, 1);
        // The sweep ran to the last address and the sensor cycle still ran.
        assert_eq!(diag.scanner().probe().probed, 128);
        assert_eq!(diag.session().sensor().log, vec!["init", "sampling", "measure"]);
        assert_eq!(screen.surface().flushes, 1);
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn failing_sensor_keeps_loop_alive_and_recovers() {
        let mut sensor = ScriptedSensor::reading(2550, 2_566_400, 51_200);
        sensor.init.push_back(Err(Error::SensorNotFound));
        let mut screen = screen();
        let mut cancel = CancelAfter::new(1);
        let mut delay = RecordingDelay::default();
        let mut diag = DiagnosticLoop::new(AckProbe::with(&[0x76]), sensor);

        assert_eq!(block_on(diag.run(&mut screen, &mut cancel, &mut delay)), 2);
        assert_eq!(diag.session().sensor().count("init"), 2);
        // Last frame shows the recovered, error-free reading.
        assert_eq!(
            screen.surface().frame.last().map(|s| s.as_str()),
            Some("T=25.50C P=10025Pa H=50.00%")
        );
    }
}
