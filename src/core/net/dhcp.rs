//! Minimal stateless DHCP server protocol
//!
//! Only DISCOVER and REQUEST are answered. The offered address is derived
//! from the client MAC, so no lease table is kept.

use embassy_net::Ipv4Address;

pub(crate) const DHCP_SERVER_PORT: u16 = 67;
pub(crate) const DHCP_CLIENT_PORT: u16 = 68;

/// Largest packet a client is required to accept.
pub(crate) const MAX_DHCP_PACKET_SIZE: usize = 576;

const BOOTREQUEST: u8 = 1;
const BOOTREPLY: u8 = 2;
const HTYPE_ETHERNET: u8 = 1;
const BROADCAST_FLAG: [u8; 2] = [0x80, 0x00];

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const OPTIONS_OFFSET: usize = 240;

const OPTION_PAD: u8 = 0;
const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_DNS: u8 = 6;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_END: u8 = 255;

const LEASE_TIME_SECS: u32 = 3600;

/// First and last host octet handed out.
const POOL_START: u8 = 2;
const POOL_SIZE: u8 = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageType {
    Discover,
    Offer,
    Request,
    Ack,
}

impl MessageType {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MessageType::Discover),
            2 => Some(MessageType::Offer),
            3 => Some(MessageType::Request),
            5 => Some(MessageType::Ack),
            _ => None,
        }
    }

    const fn code(self) -> u8 {
        match self {
            MessageType::Discover => 1,
            MessageType::Offer => 2,
            MessageType::Request => 3,
            MessageType::Ack => 5,
        }
    }

    /// Reply sent for a client message, if any.
    pub(crate) fn reply(self) -> Option<Self> {
        match self {
            MessageType::Discover => Some(MessageType::Offer),
            MessageType::Request => Some(MessageType::Ack),
            MessageType::Offer | MessageType::Ack => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct DhcpRequest {
    pub xid: [u8; 4],
    pub client_mac: [u8; 6],
    pub message_type: MessageType,
}

impl DhcpRequest {
    /// Parse a client packet. Anything that is not a well-formed BOOTREQUEST
    /// is ignored.
    pub(crate) fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < OPTIONS_OFFSET || packet[0] != BOOTREQUEST {
            return None;
        }
        if packet[236..OPTIONS_OFFSET] != MAGIC_COOKIE {
            return None;
        }

        let mut xid = [0u8; 4];
        xid.copy_from_slice(&packet[4..8]);
        let mut client_mac = [0u8; 6];
        client_mac.copy_from_slice(&packet[28..34]);

        let message_type = find_option(&packet[OPTIONS_OFFSET..], OPTION_MESSAGE_TYPE)
            .and_then(|data| data.first().copied())
            .and_then(MessageType::from_code)?;

        Some(Self {
            xid,
            client_mac,
            message_type,
        })
    }
}

/// Server side of the exchange: the access point address doubles as router
/// and DNS server.
pub(crate) struct DhcpServer {
    server: Ipv4Address,
    subnet_mask: Ipv4Address,
}

impl DhcpServer {
    pub(crate) fn new(server: Ipv4Address, prefix_len: u8) -> Self {
        let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
        Self {
            server,
            subnet_mask: Ipv4Address::from_bits(mask),
        }
    }

    /// Address for a client, stable across requests.
    pub(crate) fn allocate(&self, mac: &[u8; 6]) -> Ipv4Address {
        let [a, b, c, _] = self.server.octets();
        Ipv4Address::new(a, b, c, POOL_START + mac[5] % POOL_SIZE)
    }

    /// Write the reply into `buffer` and return its length.
    pub(crate) fn build_reply(
        &self,
        request: &DhcpRequest,
        reply: MessageType,
        buffer: &mut [u8; MAX_DHCP_PACKET_SIZE],
    ) -> usize {
        let offered = self.allocate(&request.client_mac);
        buffer.fill(0);

        buffer[0] = BOOTREPLY;
        buffer[1] = HTYPE_ETHERNET;
        buffer[2] = 6;
        buffer[4..8].copy_from_slice(&request.xid);
        buffer[10..12].copy_from_slice(&BROADCAST_FLAG);
        buffer[16..20].copy_from_slice(&offered.octets());
        buffer[20..24].copy_from_slice(&self.server.octets());
        buffer[28..34].copy_from_slice(&request.client_mac);
        buffer[236..OPTIONS_OFFSET].copy_from_slice(&MAGIC_COOKIE);

        let server = self.server.octets();
        let mut options = OptionWriter {
            buffer: &mut buffer[OPTIONS_OFFSET..],
            len: 0,
        };
        options.push(OPTION_MESSAGE_TYPE, &[reply.code()]);
        options.push(OPTION_SERVER_ID, &server);
        options.push(OPTION_LEASE_TIME, &LEASE_TIME_SECS.to_be_bytes());
        options.push(OPTION_SUBNET_MASK, &self.subnet_mask.octets());
        options.push(OPTION_ROUTER, &server);
        options.push(OPTION_DNS, &server);
        options.end();

        OPTIONS_OFFSET + options.len
    }
}

struct OptionWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl OptionWriter<'_> {
    fn push(&mut self, code: u8, data: &[u8]) {
        let start = self.len;
        self.buffer[start] = code;
        #[allow(clippy::cast_possible_truncation)]
        let data_len = data.len() as u8;
        self.buffer[start + 1] = data_len;
        self.buffer[start + 2..start + 2 + data.len()].copy_from_slice(data);
        self.len += 2 + data.len();
    }

    fn end(&mut self) {
        self.buffer[self.len] = OPTION_END;
        self.len += 1;
    }
}

/// Locate option `code` in the options area (after the magic cookie).
fn find_option(options: &[u8], code: u8) -> Option<&[u8]> {
    let mut i = 0;
    while i < options.len() {
        match options[i] {
            OPTION_END => break,
            OPTION_PAD => {
                i += 1;
                continue;
            }
            _ => {}
        }
        let len = usize::from(*options.get(i + 1)?);
        let data = options.get(i + 2..i + 2 + len)?;
        if options[i] == code {
            return Some(data);
        }
        i += 2 + len;
    }
    None
}
