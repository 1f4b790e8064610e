use embassy_net::Stack;

use crate::{
    controllers::{KnitHttpController, ProvisioningHttpController},
    infrastructure::adapters::run_http_server,
};

#[embassy_executor::task]
pub async fn knit_http_task(stack: Stack<'static>) {
    run_http_server(stack, &KnitHttpController).await
}

/// Setup page and captive redirects on the access point.
#[embassy_executor::task]
pub async fn provisioning_http_task(stack: Stack<'static>) {
    run_http_server(stack, &ProvisioningHttpController).await
}
