use crate::data_types::{Envelope, MAX_DATAGRAM};
use crate::error::Result;
use crate::store::Store;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

pub struct DataReceiver {
    socket: UdpSocket,
    store: Store,
}

impl DataReceiver {
    pub async fn new(addr: SocketAddr, store: Store) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket, store })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives datagrams until the future is dropped. Datagrams longer than
    /// `MAX_DATAGRAM` are truncated by the buffer.
    pub async fn start(&self) -> Result<()> {
        log::info!("Started UDP collector on {}", self.local_addr()?);
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((n, from)) => {
                    log::debug!("Received {} bytes from {}", n, from);
                    self.save(&buf[..n]).await;
                }
                Err(e) => log::error!("Error receiving data: {}", e),
            }
        }
    }

    async fn save(&self, datagram: &[u8]) {
        let envelope = match Envelope::from_slice(datagram) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("Dropping undecodable datagram: {}", e);
                return;
            }
        };
        log::debug!("Decoded submission sent at {}: {:?}", envelope.sent_at, envelope.submission);

        let store = self.store.clone();
        let saved = tokio::task::spawn_blocking(move || store.append(&envelope.submission))
            .await
            .unwrap_or_else(|e| Err(e.into()));
        match saved {
            Ok(key) => log::info!("Saved submission {} to {}", key, self.store.path().display()),
            Err(e) => log::error!("Error saving data to {}: {}", self.store.path().display(), e),
        }
    }
}
