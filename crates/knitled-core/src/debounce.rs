//! Debounced edge inputs
//!
//! A [`Debouncer`] turns a noisy boolean level into single "pressed" events.
//! A raw change restarts the settle timer; the stable level only follows the
//! raw level once it held for the whole debounce interval. A press is
//! reported on the stable transition into the activated level.
//!
//! [`EdgeInput`] pairs a debouncer with a sample source. Two sources exist:
//! [`PullUpPin`] (active low button or sensor) and [`TouchPad`] (capacitive
//! reading below a threshold).

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(60);

/// Which stable level counts as "activated".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Activated when the level goes high to low.
    Low,
    /// Activated when the level goes low to high.
    High,
}

impl Activation {
    const fn level(self) -> bool {
        matches!(self, Activation::High)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: Duration,
    activation: Activation,
    last_raw: bool,
    stable: bool,
    changed_at: Instant,
}

impl Debouncer {
    /// Start from an already settled `initial` level.
    pub fn new(interval: Duration, activation: Activation, initial: bool, now: Instant) -> Self {
        Self {
            interval,
            activation,
            last_raw: initial,
            stable: initial,
            changed_at: now,
        }
    }

    /// Feed one raw sample. Returns `true` once per activation.
    pub fn update(&mut self, raw: bool, now: Instant) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.changed_at = now;
        }
        if raw == self.stable || now.saturating_duration_since(self.changed_at) < self.interval {
            return false;
        }
        self.stable = raw;
        raw == self.activation.level()
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

/// Source of raw boolean samples.
pub trait Sampler {
    fn sample(&mut self) -> bool;
}

/// Button or sensor wired to ground with a pull-up: pressed reads low.
pub struct PullUpPin<P: InputPin> {
    pin: P,
    last: bool,
}

impl<P: InputPin> PullUpPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, last: true }
    }
}

impl<P: InputPin> Sampler for PullUpPin<P> {
    fn sample(&mut self) -> bool {
        // a failed read repeats the previous level
        if let Ok(high) = self.pin.is_high() {
            self.last = high;
        }
        self.last
    }
}

/// Raw capacitive measurement. Lower values mean a finger is closer.
pub trait TouchReader {
    fn read(&mut self) -> Option<u16>;
}

/// Capacitive pad reported as "touched" while its reading is below the
/// threshold.
pub struct TouchPad<T: TouchReader> {
    reader: T,
    threshold: u16,
    touched: bool,
}

impl<T: TouchReader> TouchPad<T> {
    pub fn new(reader: T, threshold: u16) -> Self {
        Self {
            reader,
            threshold,
            touched: false,
        }
    }

    /// Derive the threshold from an untouched baseline reading: the pad
    /// counts as touched once the reading falls below `ratio_percent` of it.
    pub fn calibrated(mut reader: T, ratio_percent: u8) -> Self {
        let baseline = reader.read().unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        let threshold = (u32::from(baseline) * u32::from(ratio_percent.min(100)) / 100) as u16;
        Self::new(reader, threshold)
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }
}

impl<T: TouchReader> Sampler for TouchPad<T> {
    fn sample(&mut self) -> bool {
        if let Some(value) = self.reader.read() {
            self.touched = value < self.threshold;
        }
        self.touched
    }
}

/// A debounced input producing one event per physical activation.
pub struct EdgeInput<S: Sampler> {
    source: S,
    debouncer: Debouncer,
}

impl<S: Sampler> EdgeInput<S> {
    pub fn new(mut source: S, activation: Activation, interval: Duration, now: Instant) -> Self {
        let initial = source.sample();
        Self {
            source,
            debouncer: Debouncer::new(interval, activation, initial, now),
        }
    }

    /// Sample the source; `true` at most once per stable activation.
    pub fn pressed(&mut self, now: Instant) -> bool {
        let raw = self.source.sample();
        self.debouncer.update(raw, now)
    }
}

impl<P: InputPin> EdgeInput<PullUpPin<P>> {
    pub fn pull_up(pin: P, interval: Duration, now: Instant) -> Self {
        Self::new(PullUpPin::new(pin), Activation::Low, interval, now)
    }
}

impl<T: TouchReader> EdgeInput<TouchPad<T>> {
    pub fn touch(pad: TouchPad<T>, interval: Duration, now: Instant) -> Self {
        Self::new(pad, Activation::High, interval, now)
    }
}
