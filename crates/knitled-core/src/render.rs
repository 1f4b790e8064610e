//! Render targets
//!
//! Pure functions turning a [`KnitView`] into LED colors and status text.

use core::fmt::Write as _;

use heapless::String;
use smart_leds::RGB8;

use crate::{blink::BlinkPhase, controller::KnitView, settings::PackedColor};

/// Index of the LED reserved for the status indicator.
pub const STATUS_LED: usize = 0;

/// Characters per display line (128 px wide panel, 6 px font).
pub const STATUS_LINE_LEN: usize = 21;

pub type StatusLine = String<STATUS_LINE_LEN>;

/// Network state shown on the status pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    #[default]
    Off,
    Connecting,
    Online,
    Provisioning,
    Offline,
}

impl StatusIndicator {
    pub const fn color(self) -> PackedColor {
        match self {
            StatusIndicator::Off => PackedColor::BLACK,
            StatusIndicator::Connecting => PackedColor::new(0xFF8000),
            StatusIndicator::Online => PackedColor::new(0x00FF00),
            StatusIndicator::Provisioning => PackedColor::new(0x0000FF),
            StatusIndicator::Offline => PackedColor::new(0xFF0000),
        }
    }
}

/// Fill `frame` with the LED colors for the active row.
///
/// LED 0 carries the status indicator. Pattern column `c` lands on LED
/// `1 + (width - 1 - c)`, so storage column 0 is the rightmost LED in use.
/// On cells take the active or confirmed color, off cells the inactive
/// color. In [`BlinkPhase::Off`] only the status LED stays lit.
pub fn render_row(view: &KnitView, phase: BlinkPhase, status: StatusIndicator, frame: &mut [RGB8]) {
    frame.fill(RGB8::default());
    let Some(status_led) = frame.get_mut(STATUS_LED) else {
        return;
    };
    *status_led = status.color().dimmed(view.brightness);
    if !phase.shows_row() {
        return;
    }

    let on = if view.row_confirmed {
        view.color_confirmed
    } else {
        view.color_active
    }
    .dimmed(view.brightness);
    let off = view.color_inactive.dimmed(view.brightness);

    let width = usize::from(view.width);
    let row_leds = frame.len() - 1;
    for col in 0..width.min(row_leds) {
        let led = 1 + (width - 1 - col);
        if let Some(pixel) = frame.get_mut(led) {
            #[allow(clippy::cast_possible_truncation)]
            let lit = view.cell(col as u8);
            *pixel = if lit { on } else { off };
        }
    }
}

/// What the status display should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScreen<'a> {
    Knitting { display_row: u8, height: u8, total_pulses: u32 },
    Connecting { ssid: &'a str },
    Connected { ip: [u8; 4] },
    AccessPoint { ssid: &'a str },
}

impl StatusScreen<'_> {
    pub fn knitting(view: &KnitView) -> Self {
        StatusScreen::Knitting {
            display_row: view.display_row(),
            height: view.height,
            total_pulses: view.total_pulses,
        }
    }
}

/// Two text lines for the display. Text that does not fit is cut off.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLines {
    pub title: StatusLine,
    pub detail: StatusLine,
}

impl StatusLines {
    pub fn render(screen: &StatusScreen<'_>) -> Self {
        let mut lines = Self::default();
        // overflow only truncates the line
        let _ = match *screen {
            StatusScreen::Knitting {
                display_row,
                height,
                total_pulses,
            } => write!(lines.title, "Row:{display_row:02}/{height:02}")
                .and_then(|()| write!(lines.detail, "Tot:{total_pulses}")),
            StatusScreen::Connecting { ssid } => lines
                .title
                .write_str("Connecting")
                .and_then(|()| push_truncated(&mut lines.detail, ssid)),
            StatusScreen::Connected { ip: [a, b, c, d] } => lines
                .title
                .write_str("Connected")
                .and_then(|()| write!(lines.detail, "{a}.{b}.{c}.{d}")),
            StatusScreen::AccessPoint { ssid } => lines
                .title
                .write_str("Wi-Fi setup")
                .and_then(|()| push_truncated(&mut lines.detail, ssid)),
        };
        lines
    }
}

fn push_truncated(line: &mut StatusLine, text: &str) -> core::fmt::Result {
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    Ok(())
}
