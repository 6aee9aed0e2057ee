//! Surface channel
//!
//! Connectionless UDP multicast transport shared by the control and
//! rendering surfaces. Frames are JSON-encoded `SurfaceMessage`s, delivered
//! at-most-once with no ordering guarantee; sends are fire-and-forget and
//! never awaited for acknowledgment.

use crate::messages::SurfaceMessage;
use crate::{Error, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest frame we will accept; content payloads are small JSON documents
const MAX_FRAME: usize = 64 * 1024;

/// One end of the surface channel.
///
/// Every participant binds the same group port (address reuse) and joins
/// the group, so every message reaches every process including the sender;
/// receivers simply ignore message directions they do not consume.
pub struct SurfaceChannel {
    socket: UdpSocket,
    group: SocketAddrV4,
}

impl SurfaceChannel {
    /// Join the multicast group on all interfaces
    pub fn open(group_addr: Ipv4Addr, port: u16) -> Result<Self> {
        if !group_addr.is_multicast() {
            return Err(Error::Config(format!(
                "{group_addr} is not a multicast address"
            )));
        }

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
        socket.set_nonblocking(true)?;
        let bind_addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        socket.bind(&bind_addr.into())?;

        let std_socket: std::net::UdpSocket = socket.into();
        std_socket.join_multicast_v4(&group_addr, &Ipv4Addr::UNSPECIFIED)?;
        // Surfaces on the same host as the operator must hear it.
        std_socket.set_multicast_loop_v4(true)?;

        Ok(Self {
            socket: UdpSocket::from_std(std_socket)?,
            group: SocketAddrV4::new(group_addr, port),
        })
    }

    /// Send one message to the group, best-effort.
    ///
    /// A failed send is logged and dropped; the heartbeat protocol is the
    /// only delivery signal this transport offers.
    pub async fn send(&self, message: &SurfaceMessage) {
        let frame = match serde_json::to_vec(message) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping unencodable {} frame: {}", message.message_type(), e);
                return;
            }
        };
        match self.socket.send_to(&frame, SocketAddr::V4(self.group)).await {
            Ok(_) => debug!("Sent {} to {}", message.message_type(), self.group),
            Err(e) => warn!("Send of {} failed: {}", message.message_type(), e),
        }
    }

    /// Receive the next parseable message.
    ///
    /// Malformed frames are logged and skipped; only socket errors
    /// propagate.
    pub async fn recv(&self) -> Result<SurfaceMessage> {
        let mut buf = vec![0u8; MAX_FRAME];
        loop {
            let (len, from) = self.socket.recv_from(&mut buf).await?;
            match serde_json::from_slice(&buf[..len]) {
                Ok(message) => return Ok(message),
                Err(e) => debug!("Ignoring malformed frame from {}: {}", from, e),
            }
        }
    }
}
