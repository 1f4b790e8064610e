//! Wildcard DNS responder for the provisioning access point.

use embassy_net::{
    Stack,
    udp::{PacketMetadata, UdpSocket},
};
#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::captive::{DNS_PORT, MAX_DNS_PACKET_SIZE, answer_query};

use crate::config::NETWORK;

#[embassy_executor::task]
pub(crate) async fn dns_server_task(stack: Stack<'static>) {
    let address = NETWORK.ap_address.octets();

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; 1024];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; 1024];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(_e) = socket.bind(DNS_PORT) {
        #[cfg(feature = "log")]
        println!("dns_server: failed to bind port {}: {:?}", DNS_PORT, _e);
        return;
    }
    #[cfg(feature = "log")]
    println!("dns_server: answering every name with {}", NETWORK.ap_address);

    let mut query = [0u8; MAX_DNS_PACKET_SIZE];
    let mut reply = [0u8; MAX_DNS_PACKET_SIZE];
    loop {
        let (len, remote) = match socket.recv_from(&mut query).await {
            Ok(received) => received,
            Err(_e) => {
                #[cfg(feature = "log")]
                println!("dns_server: recv error: {:?}", _e);
                continue;
            }
        };

        let Some(reply_len) = answer_query(&query[..len], address, &mut reply) else {
            continue;
        };
        if let Err(_e) = socket.send_to(&reply[..reply_len], remote).await {
            #[cfg(feature = "log")]
            println!("dns_server: send error: {:?}", _e);
        }
    }
}
