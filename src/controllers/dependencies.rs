use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};

use crate::infrastructure::types::KnitControllerImpl;

pub(crate) static KNIT_CONTROLLER: Mutex<CriticalSectionRawMutex, RefCell<Option<KnitControllerImpl>>> =
    Mutex::new(RefCell::new(None));

/// Run `op` on the controller. [`None`] until the controllers are
/// initialized.
pub(crate) fn with_knit<R>(op: impl FnOnce(&mut KnitControllerImpl) -> R) -> Option<R> {
    KNIT_CONTROLLER.lock(|cell| cell.borrow_mut().as_mut().map(op))
}
