use knitled_core::{InputAction, KnitView};

use super::dependencies::with_knit;

/// Apply a physical input to the controller.
pub fn dispatch_input(action: InputAction) {
    with_knit(|knit| knit.handle_input(action));
}

pub fn knit_view() -> Option<KnitView> {
    with_knit(|knit| knit.view())
}
