//! Physical knitting inputs
//!
//! Three pull-up buttons, the carriage sensor and a capacitive pad, each
//! debounced on its own and polled from the control loop.

use embassy_time::{Instant, Timer};
use esp_hal::{
    Blocking,
    gpio::{Input, InputConfig, InputPin, Pull},
    peripherals::TOUCH,
    touch::{Continuous, Touch},
};
#[cfg(feature = "log")]
use esp_println::println;
use heapless::Vec;
use knitled_core::{EdgeInput, InputAction, PullUpPin, TouchPad};

use crate::{
    config::{CONTROL, TouchGpio},
    infrastructure::drivers::EspTouchReader,
    mk_static,
};

/// Time for the touch peripheral to produce its first measurement.
const TOUCH_SETTLE: embassy_time::Duration = embassy_time::Duration::from_millis(100);

const INPUT_COUNT: usize = 5;

type Button = EdgeInput<PullUpPin<Input<'static>>>;

pub struct KnitInputs {
    previous: Button,
    next: Button,
    confirm: Button,
    carriage: Button,
    touch: EdgeInput<TouchPad<EspTouchReader>>,
}

impl KnitInputs {
    /// Sample every input once and return the actions for new presses.
    pub(crate) fn poll(&mut self, now: Instant) -> Vec<InputAction, INPUT_COUNT> {
        let mut actions = Vec::new();
        let inputs = [
            (self.previous.pressed(now), InputAction::PreviousRow),
            (self.next.pressed(now), InputAction::NextRow),
            (self.confirm.pressed(now), InputAction::Confirm),
            (self.carriage.pressed(now), InputAction::CarriagePulse),
            (self.touch.pressed(now), InputAction::Confirm),
        ];
        for (pressed, action) in inputs {
            if pressed {
                // one slot per input
                let _ = actions.push(action);
            }
        }
        actions
    }
}

fn pull_up(pin: impl InputPin + 'static, now: Instant) -> Button {
    let input = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    EdgeInput::pull_up(input, CONTROL.debounce, now)
}

/// Configure the input pins and calibrate the touch pad against its idle
/// reading. Nothing may touch the pad during boot.
pub async fn init_inputs(
    previous: impl InputPin + 'static,
    next: impl InputPin + 'static,
    confirm: impl InputPin + 'static,
    carriage: impl InputPin + 'static,
    touch_pin: TouchGpio,
    touch_peripheral: TOUCH<'static>,
) -> KnitInputs {
    let touch = mk_static!(
        Touch<'static, Continuous, Blocking>,
        Touch::continuous_mode(touch_peripheral, None)
    );
    let reader = EspTouchReader::new(touch_pin, touch);
    Timer::after(TOUCH_SETTLE).await;
    let pad = TouchPad::calibrated(reader, CONTROL.touch_threshold_percent);
    #[cfg(feature = "log")]
    println!("inputs: touch threshold {}", pad.threshold());

    let now = Instant::now();
    KnitInputs {
        previous: pull_up(previous, now),
        next: pull_up(next, now),
        confirm: pull_up(confirm, now),
        carriage: pull_up(carriage, now),
        touch: EdgeInput::touch(pad, CONTROL.debounce, now),
    }
}
