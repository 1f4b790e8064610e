mod http_server;
mod inputs;
mod outputs;

pub(crate) use http_server::run_http_server;
pub use inputs::{KnitInputs, init_inputs};
pub use outputs::init_outputs;
