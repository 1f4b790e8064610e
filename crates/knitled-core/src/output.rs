//! Output stage
//!
//! Owns both render targets, the output synchronizer and the warning blink
//! machine. The control loop calls [`OutputStage::service`] once per
//! iteration with a fresh [`KnitView`].

use embassy_time::{Duration, Instant};
use smart_leds::RGB8;

use crate::{
    blink::{BlinkPhase, WarningBlink},
    controller::KnitView,
    ports::{LedStrip, StatusDisplay},
    render::{StatusIndicator, StatusLines, StatusScreen, render_row},
    sync::OutputSynchronizer,
};

pub struct OutputStage<L: LedStrip, D: StatusDisplay, const N: usize> {
    strip: L,
    display: D,
    sync: OutputSynchronizer,
    blink: WarningBlink,
    status: StatusIndicator,
    status_dirty: bool,
    screen_expiry: Option<Instant>,
    frame: [RGB8; N],
}

impl<L: LedStrip, D: StatusDisplay, const N: usize> OutputStage<L, D, N> {
    pub fn new(strip: L, display: D, blink_period: Duration) -> Self {
        Self {
            strip,
            display,
            sync: OutputSynchronizer::new(),
            blink: WarningBlink::new(blink_period),
            status: StatusIndicator::Off,
            status_dirty: false,
            screen_expiry: None,
            frame: [RGB8::default(); N],
        }
    }

    /// Change the status pixel; applied on the next service call.
    pub fn set_status(&mut self, status: StatusIndicator) {
        if self.status != status {
            self.status = status;
            self.status_dirty = true;
        }
    }

    /// Show an out-of-band screen (network setup, IP address). The next
    /// knitting state change replaces it.
    pub fn show_screen(&mut self, screen: &StatusScreen<'_>) {
        self.display.show(&StatusLines::render(screen));
        self.screen_expiry = None;
    }

    /// Show an out-of-band screen that gives way to the knitting screen at
    /// `until`, or earlier if the knitting state changes.
    pub fn show_screen_until(&mut self, screen: &StatusScreen<'_>, until: Instant) {
        self.show_screen(screen);
        self.screen_expiry = Some(until);
    }

    /// Force a full render on the next service call.
    pub fn invalidate(&mut self) {
        self.sync.invalidate();
    }

    /// Refresh outputs that are out of date and advance the blink cadence.
    pub fn service(&mut self, view: &KnitView, now: Instant) {
        if self.screen_expiry.is_some_and(|until| now >= until) {
            self.sync.invalidate();
        }

        if self.sync.is_stale(view) {
            self.display
                .show(&StatusLines::render(&StatusScreen::knitting(view)));
            self.draw_row(view, self.blink.phase());
            self.sync.commit(view);
            self.status_dirty = false;
            self.screen_expiry = None;
        }

        if let Some(phase) = self.blink.tick(now, view.blinking()) {
            self.draw_row(view, phase);
            self.status_dirty = false;
        }

        if self.status_dirty {
            self.draw_row(view, self.blink.phase());
            self.status_dirty = false;
        }
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.blink.phase()
    }

    pub fn frame(&self) -> &[RGB8; N] {
        &self.frame
    }

    fn draw_row(&mut self, view: &KnitView, phase: BlinkPhase) {
        render_row(view, phase, self.status, &mut self.frame);
        self.strip.write(&self.frame);
    }
}
