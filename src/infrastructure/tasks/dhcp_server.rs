//! DHCP server for the provisioning access point.

use embassy_net::{
    Ipv4Address,
    Stack,
    udp::{PacketMetadata, UdpSocket},
};
#[cfg(feature = "log")]
use esp_println::println;

use crate::{
    config::NETWORK,
    core::net::dhcp::{
        DHCP_CLIENT_PORT,
        DHCP_SERVER_PORT,
        DhcpRequest,
        DhcpServer,
        MAX_DHCP_PACKET_SIZE,
    },
};

#[embassy_executor::task]
pub(crate) async fn dhcp_server_task(stack: Stack<'static>) {
    let server = DhcpServer::new(NETWORK.ap_address, NETWORK.ap_prefix_len);

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

    if let Err(_e) = socket.bind(DHCP_SERVER_PORT) {
        #[cfg(feature = "log")]
        println!("dhcp_server: failed to bind port {}: {:?}", DHCP_SERVER_PORT, _e);
        return;
    }
    #[cfg(feature = "log")]
    println!("dhcp_server: listening on port {}", DHCP_SERVER_PORT);

    let mut packet = [0u8; MAX_DHCP_PACKET_SIZE];
    loop {
        let len = match socket.recv_from(&mut packet).await {
            Ok((len, _remote)) => len,
            Err(_e) => {
                #[cfg(feature = "log")]
                println!("dhcp_server: recv error: {:?}", _e);
                continue;
            }
        };

        let Some(request) = DhcpRequest::parse(&packet[..len]) else {
            continue;
        };
        let Some(reply) = request.message_type.reply() else {
            continue;
        };
        #[cfg(feature = "log")]
        println!(
            "dhcp_server: {:?} -> {:?} {}",
            request.message_type,
            reply,
            server.allocate(&request.client_mac)
        );

        let reply_len = server.build_reply(&request, reply, &mut packet);
        let dest = (Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(_e) = socket.send_to(&packet[..reply_len], dest).await {
            #[cfg(feature = "log")]
            println!("dhcp_server: send error: {:?}", _e);
        }
    }
}
