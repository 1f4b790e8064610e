//! LED row rendering, status text, warning blink and output sync.

mod support;

use embassy_time::{Duration, Instant};
use knitled_core::render::render_row;
use knitled_core::{
    BlinkPhase, KnitView, OutputStage, PackedColor, StatusIndicator, StatusLines, StatusScreen,
    WarningBlink,
};
use smart_leds::RGB8;
use support::{RecordingDisplay, RecordingStrip};

const BLINK: Duration = Duration::from_millis(300);
const LEDS: usize = 13;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn view() -> KnitView {
    KnitView {
        active_row: 0,
        width: 4,
        height: 3,
        row_cells: 0b0001,
        row_confirmed: false,
        total_pulses: 0,
        warn_blink_active: false,
        blink_warning: true,
        row_from_bottom: false,
        brightness: 255,
        color_active: PackedColor::new(0x00FF00),
        color_confirmed: PackedColor::new(0x0000FF),
        color_inactive: PackedColor::new(0x101010),
    }
}

fn rgb(r: u8, g: u8, b: u8) -> RGB8 {
    RGB8 { r, g, b }
}

fn stage() -> (OutputStage<RecordingStrip, RecordingDisplay, LEDS>, RecordingStrip, RecordingDisplay) {
    let strip = RecordingStrip::default();
    let display = RecordingDisplay::default();
    let stage = OutputStage::new(strip.clone(), display.clone(), BLINK);
    (stage, strip, display)
}

// -----------------------------------------------------------------------------
// LED row renderer
// -----------------------------------------------------------------------------

#[test]
fn column_zero_lands_on_rightmost_used_led() {
    let mut frame = [RGB8::default(); LEDS];

    render_row(&view(), BlinkPhase::Idle, StatusIndicator::Off, &mut frame);

    assert_eq!(frame[4], rgb(0, 255, 0));
    assert_eq!(frame[1], rgb(16, 16, 16));
    assert_eq!(frame[2], rgb(16, 16, 16));
    assert_eq!(frame[3], rgb(16, 16, 16));
    assert_eq!(frame[5], RGB8::default());
}

#[test]
fn confirmed_row_uses_confirmed_color() {
    let mut frame = [RGB8::default(); LEDS];
    let view = KnitView {
        row_confirmed: true,
        ..view()
    };

    render_row(&view, BlinkPhase::On, StatusIndicator::Off, &mut frame);

    assert_eq!(frame[4], rgb(0, 0, 255));
}

#[test]
fn brightness_scales_every_channel() {
    let mut frame = [RGB8::default(); LEDS];
    let view = KnitView {
        brightness: 128,
        color_active: PackedColor::new(0xFF8040),
        ..view()
    };

    render_row(&view, BlinkPhase::Idle, StatusIndicator::Online, &mut frame);

    assert_eq!(frame[4], rgb(128, 64, 32));
    assert_eq!(frame[0], rgb(0, 128, 0));
}

#[test]
fn black_inactive_color_leaves_off_cells_unlit() {
    let mut frame = [RGB8::default(); LEDS];
    let view = KnitView {
        color_inactive: PackedColor::BLACK,
        ..view()
    };

    render_row(&view, BlinkPhase::Idle, StatusIndicator::Off, &mut frame);

    assert_eq!(frame[1], RGB8::default());
}

#[test]
fn wide_row_is_cut_to_available_leds() {
    let mut frame = [RGB8::default(); 5];
    let view = KnitView {
        width: 12,
        row_cells: 0x0FFF,
        ..view()
    };

    render_row(&view, BlinkPhase::Idle, StatusIndicator::Off, &mut frame);

    assert_eq!(frame[0], RGB8::default());
    assert!(frame[1..].iter().all(|pixel| *pixel == RGB8::default()));
}

#[test]
fn blink_off_keeps_only_status_pixel() {
    let mut frame = [RGB8::default(); LEDS];

    render_row(&view(), BlinkPhase::Off, StatusIndicator::Provisioning, &mut frame);

    assert_eq!(frame[0], rgb(0, 0, 255));
    assert!(frame[1..].iter().all(|pixel| *pixel == RGB8::default()));
}

// -----------------------------------------------------------------------------
// Status text
// -----------------------------------------------------------------------------

#[test]
fn knitting_screen_shows_row_and_total() {
    let view = KnitView {
        active_row: 6,
        height: 24,
        total_pulses: 53,
        ..view()
    };

    let lines = StatusLines::render(&StatusScreen::knitting(&view));

    assert_eq!(lines.title.as_str(), "Row:07/24");
    assert_eq!(lines.detail.as_str(), "Tot:53");
}

#[test]
fn knitting_screen_counts_from_bottom() {
    let view = KnitView {
        active_row: 23,
        height: 24,
        row_from_bottom: true,
        ..view()
    };

    let lines = StatusLines::render(&StatusScreen::knitting(&view));

    assert_eq!(lines.title.as_str(), "Row:01/24");
}

#[test]
fn network_screens() {
    let connected = StatusLines::render(&StatusScreen::Connected {
        ip: [192, 168, 1, 42],
    });
    assert_eq!(connected.title.as_str(), "Connected");
    assert_eq!(connected.detail.as_str(), "192.168.1.42");

    let setup = StatusLines::render(&StatusScreen::AccessPoint {
        ssid: "KnittLED-A1B2",
    });
    assert_eq!(setup.title.as_str(), "Wi-Fi setup");
    assert_eq!(setup.detail.as_str(), "KnittLED-A1B2");
}

#[test]
fn long_ssid_is_truncated() {
    let lines = StatusLines::render(&StatusScreen::Connecting {
        ssid: "a-very-long-network-name-that-does-not-fit",
    });

    assert_eq!(lines.detail.len(), 21);
}

// -----------------------------------------------------------------------------
// Warning blink
// -----------------------------------------------------------------------------

#[test]
fn blink_toggles_on_elapsed_time() {
    let mut blink = WarningBlink::new(BLINK);

    assert_eq!(blink.tick(at(1000), true), Some(BlinkPhase::On));
    assert_eq!(blink.tick(at(1100), true), None);
    assert_eq!(blink.tick(at(1299), true), None);
    assert_eq!(blink.tick(at(1300), true), Some(BlinkPhase::Off));
    assert_eq!(blink.tick(at(1650), true), Some(BlinkPhase::On));
    assert_eq!(blink.tick(at(1900), true), None);
}

#[test]
fn blink_returns_to_idle_when_warning_clears() {
    let mut blink = WarningBlink::new(BLINK);
    blink.tick(at(0), true);
    blink.tick(at(300), true);

    assert_eq!(blink.tick(at(310), false), Some(BlinkPhase::Idle));
    assert_eq!(blink.tick(at(400), false), None);
    assert_eq!(blink.phase(), BlinkPhase::Idle);
}

// -----------------------------------------------------------------------------
// Output stage
// -----------------------------------------------------------------------------

#[test]
fn first_service_renders_everything() {
    let (mut stage, strip, display) = stage();

    stage.service(&view(), at(0));

    assert_eq!(strip.writes(), 1);
    assert_eq!(display.shows(), 1);
    assert_eq!(display.last().title.as_str(), "Row:01/03");
}

#[test]
fn unchanged_view_is_not_rendered_again() {
    let (mut stage, strip, display) = stage();
    stage.service(&view(), at(0));

    for ms in 1..50 {
        stage.service(&view(), at(ms * 5));
    }

    assert_eq!(strip.writes(), 1);
    assert_eq!(display.shows(), 1);
}

#[test]
fn changed_field_triggers_one_render() {
    let (mut stage, strip, display) = stage();
    stage.service(&view(), at(0));
    let brighter = KnitView {
        brightness: 10,
        ..view()
    };

    stage.service(&brighter, at(5));
    stage.service(&brighter, at(10));

    assert_eq!(strip.writes(), 2);
    assert_eq!(display.shows(), 2);
}

#[test]
fn warning_blinks_strip_without_redrawing_display() {
    let (mut stage, strip, display) = stage();
    let warning = KnitView {
        warn_blink_active: true,
        ..view()
    };

    stage.service(&warning, at(0));
    stage.service(&warning, at(300));
    stage.service(&warning, at(600));

    assert_eq!(display.shows(), 1);
    // full render, blink on, blink off, blink on
    assert_eq!(strip.writes(), 4);
    assert_eq!(stage.blink_phase(), BlinkPhase::On);
}

#[test]
fn blink_disabled_means_no_toggling() {
    let (mut stage, strip, _) = stage();
    let warning = KnitView {
        warn_blink_active: true,
        blink_warning: false,
        ..view()
    };

    stage.service(&warning, at(0));
    stage.service(&warning, at(300));
    stage.service(&warning, at(600));

    assert_eq!(strip.writes(), 1);
    assert_eq!(stage.blink_phase(), BlinkPhase::Idle);
}

#[test]
fn status_change_redraws_strip_only() {
    let (mut stage, strip, display) = stage();
    stage.service(&view(), at(0));

    stage.set_status(StatusIndicator::Online);
    stage.service(&view(), at(5));

    assert_eq!(strip.writes(), 2);
    assert_eq!(display.shows(), 1);
    assert_eq!(strip.last()[0], rgb(0, 255, 0));
}

#[test]
fn timed_screen_returns_to_knitting_without_state_change() {
    let (mut stage, strip, display) = stage();
    stage.service(&view(), at(0));

    stage.show_screen_until(&StatusScreen::Connected { ip: [10, 0, 0, 7] }, at(3000));
    stage.service(&view(), at(5));
    stage.service(&view(), at(2995));

    assert_eq!(display.shows(), 2);
    assert_eq!(display.last().title.as_str(), "Connected");

    stage.service(&view(), at(3000));
    stage.service(&view(), at(3005));

    assert_eq!(display.shows(), 3);
    assert_eq!(display.last().title.as_str(), "Row:01/03");
    assert_eq!(strip.writes(), 2);
}

#[test]
fn untimed_screen_stays_until_state_changes() {
    let (mut stage, _, display) = stage();
    stage.service(&view(), at(0));

    stage.show_screen_until(&StatusScreen::Connected { ip: [10, 0, 0, 7] }, at(3000));
    stage.show_screen(&StatusScreen::AccessPoint { ssid: "KnittLED-A1B2" });
    stage.service(&view(), at(10_000));

    assert_eq!(display.shows(), 3);
    assert_eq!(display.last().title.as_str(), "Wi-Fi setup");
}
