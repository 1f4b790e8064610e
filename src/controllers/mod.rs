//! Request handlers and the shared controller
//!
//! Handlers never hold the controller across an await point: each one takes
//! the lock for a single named operation and writes the response afterwards.

pub(crate) mod dependencies;
mod input;
mod knit_http;
mod provisioning_http;
mod system;

use dependencies::KNIT_CONTROLLER;
pub use input::{dispatch_input, knit_view};
pub use knit_http::KnitHttpController;
pub use provisioning_http::ProvisioningHttpController;

use crate::infrastructure::types::KnitControllerImpl;

/// Hand the restored controller to the handlers and the control loop.
pub fn init_controllers(controller: KnitControllerImpl) {
    KNIT_CONTROLLER.lock(|cell| {
        cell.borrow_mut().replace(controller);
    });
}
