use esp_hal::{
    gpio::interconnect::PeripheralOutput,
    peripherals::RMT,
    rmt::Rmt,
    time::Rate,
    xtensa_lx::interrupt,
};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use knitled_core::LedStrip;
use smart_leds::{RGB8, SmartLedsWrite as _};
use static_cell::make_static;

use crate::config::LED_COUNT;

/// WS2812 strip driven by the RMT peripheral.
///
/// LED 0 is the status pixel, the rest show the active row.
pub struct EspLedStrip {
    adapter: SmartLedsAdapter<'static, { buffer_size(LED_COUNT) }>,
}

impl EspLedStrip {
    pub(crate) fn new<O>(rmt: RMT<'static>, pin: O) -> Self
    where
        O: PeripheralOutput<'static>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80)).expect("RMT clock is valid");
        let rmt_buffer = make_static!(smart_led_buffer!(LED_COUNT));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Self { adapter }
    }
}

impl LedStrip for EspLedStrip {
    fn write(&mut self, colors: &[RGB8]) {
        // RMT timing must not be interrupted mid-frame
        interrupt::free(|| {
            let _ = self.adapter.write(colors.iter().copied());
        });
    }
}
