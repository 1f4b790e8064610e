use esp_hal::{
    Blocking,
    touch::{Continuous, Touch, TouchPad},
};
use knitled_core::TouchReader;

use crate::config::TouchGpio;

/// Capacitive pad sampled by the touch peripheral in continuous mode.
pub struct EspTouchReader {
    pad: TouchPad<TouchGpio, Continuous, Blocking>,
}

impl EspTouchReader {
    pub(crate) fn new(pin: TouchGpio, touch: &'static Touch<'static, Continuous, Blocking>) -> Self {
        Self {
            pad: TouchPad::new(pin, touch),
        }
    }
}

impl TouchReader for EspTouchReader {
    fn read(&mut self) -> Option<u16> {
        self.pad.try_read()
    }
}
