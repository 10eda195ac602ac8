use crate::data_types::{Envelope, MAX_DATAGRAM};
use crate::error::Result;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

/// UDP client the web server uses to hand submissions to the collector.
pub struct DataSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl DataSender {
    pub async fn new(target: SocketAddr) -> Result<Self> {
        let local = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).await?;
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub async fn send(&self, envelope: &Envelope) -> Result<usize> {
        let payload = envelope.to_bytes()?;
        if payload.len() > MAX_DATAGRAM {
            log::warn!(
                "Payload of {} bytes exceeds {} bytes and will be truncated by the collector",
                payload.len(),
                MAX_DATAGRAM
            );
        }
        let sent = self.socket.send_to(&payload, self.target).await?;
        log::debug!("Sent {} bytes to {}", sent, self.target);
        Ok(sent)
    }
}
