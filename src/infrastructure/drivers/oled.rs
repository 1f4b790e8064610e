//! SSD1306 status display
//!
//! 128x32 panel on I2C, two lines of text: a large title and a small detail
//! line.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_8X13_BOLD},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use esp_hal::{Blocking, i2c::master::I2c};
#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::{StatusDisplay, StatusLines};
use ssd1306::{
    I2CDisplayInterface,
    Ssd1306,
    mode::BufferedGraphicsMode,
    prelude::*,
    size::DisplaySize128x32,
};

type Display = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x32,
    BufferedGraphicsMode<DisplaySize128x32>,
>;

const TITLE_ORIGIN: Point = Point::new(0, 0);
const DETAIL_ORIGIN: Point = Point::new(0, 18);

pub struct OledStatusDisplay {
    display: Display,
    ready: bool,
}

impl OledStatusDisplay {
    /// Initialize the panel. A missing or faulty panel only disables the
    /// display, it never stops the firmware.
    pub(crate) fn new(i2c: I2c<'static, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let ready = match display.init() {
            Ok(()) => true,
            Err(_e) => {
                #[cfg(feature = "log")]
                println!("oled: init failed: {:?}", _e);
                false
            }
        };
        Self { display, ready }
    }
}

impl StatusDisplay for OledStatusDisplay {
    fn show(&mut self, lines: &StatusLines) {
        if !self.ready {
            return;
        }
        let title = MonoTextStyle::new(&FONT_8X13_BOLD, BinaryColor::On);
        let detail = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        self.display.clear_buffer();
        let drawn = Text::with_baseline(&lines.title, TITLE_ORIGIN, title, Baseline::Top)
            .draw(&mut self.display)
            .and_then(|_| {
                Text::with_baseline(&lines.detail, DETAIL_ORIGIN, detail, Baseline::Top)
                    .draw(&mut self.display)
            })
            .and_then(|_| self.display.flush());
        if let Err(_e) = drawn {
            #[cfg(feature = "log")]
            println!("oled: draw failed: {:?}", _e);
        }
    }
}
