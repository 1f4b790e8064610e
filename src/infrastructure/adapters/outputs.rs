use esp_hal::{
    gpio::interconnect::PeripheralOutput,
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::{I2C0, RMT},
    time::Rate,
};
use knitled_core::OutputStage;

use crate::{
    config::CONTROL,
    infrastructure::{
        drivers::{EspLedStrip, OledStatusDisplay},
        types::KnitOutputStage,
    },
};

/// Build the LED strip and the status display behind one output stage.
pub fn init_outputs(
    rmt: RMT<'static>,
    led_pin: impl PeripheralOutput<'static>,
    i2c: I2C0<'static>,
    sda: impl PeripheralOutput<'static>,
    scl: impl PeripheralOutput<'static>,
) -> KnitOutputStage {
    let strip = EspLedStrip::new(rmt, led_pin);

    let i2c = I2c::new(i2c, I2cConfig::default().with_frequency(Rate::from_khz(400)))
        .expect("static I2C config is valid")
        .with_sda(sda)
        .with_scl(scl);
    let display = OledStatusDisplay::new(i2c);

    OutputStage::new(strip, display, CONTROL.blink_period)
}
