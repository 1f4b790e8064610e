//! HTTP server adapter
//!
//! [`run_http_server`] owns the socket buffers and serves one handler
//! forever. It is called from the HTTP tasks, so the buffers live on their
//! stacks.

use embassy_net::Stack;

use crate::core::net::http::{HttpHandler, HttpServer};

const HTTP_PORT: u16 = 80;
const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 2048;

pub(crate) async fn run_http_server<H: HttpHandler>(stack: Stack<'static>, handler: &H) -> ! {
    let server = HttpServer::new(handler);
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    server
        .listen_and_serve(stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await
}
