//! Control loop
//!
//! Polls the physical inputs, applies them to the controller and refreshes
//! the outputs. Network status changes are folded in between iterations.

use embassy_time::{Instant, Ticker};
#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::{StatusIndicator, StatusScreen};

use crate::{
    config::CONTROL,
    controllers::{dispatch_input, knit_view},
    infrastructure::{
        adapters::KnitInputs,
        services::{NetworkStatus, take_network_status},
        types::KnitOutputStage,
    },
};

#[embassy_executor::task]
pub async fn control_loop_task(mut inputs: KnitInputs, mut output: KnitOutputStage) {
    #[cfg(feature = "log")]
    println!("control: starting control loop");
    let mut ticker = Ticker::every(CONTROL.loop_period);

    loop {
        let now = Instant::now();
        for action in inputs.poll(now) {
            #[cfg(feature = "log")]
            println!("control: input {:?}", action);
            dispatch_input(action);
        }

        if let Some(view) = knit_view() {
            output.service(&view, now);
        }
        if let Some(status) = take_network_status() {
            apply_network_status(&mut output, &status, now);
        }

        ticker.next().await;
    }
}

fn apply_network_status(output: &mut KnitOutputStage, status: &NetworkStatus, now: Instant) {
    match status {
        NetworkStatus::Connecting(ssid) => {
            output.set_status(StatusIndicator::Connecting);
            output.show_screen(&StatusScreen::Connecting { ssid });
        }
        NetworkStatus::Online(ip) => {
            output.set_status(StatusIndicator::Online);
            output.show_screen_until(
                &StatusScreen::Connected { ip: *ip },
                now + CONTROL.status_hold,
            );
        }
        NetworkStatus::Provisioning(ssid) => {
            output.set_status(StatusIndicator::Provisioning);
            output.show_screen(&StatusScreen::AccessPoint { ssid });
        }
        NetworkStatus::Offline => {
            output.set_status(StatusIndicator::Offline);
            // back to the knitting screen
            output.invalidate();
        }
    }
}
