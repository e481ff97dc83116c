use crate::error::TransportError;
use log::trace;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;

/// Delivers line-protocol text to a collector.
///
/// Implementations encode `data` as UTF-8, terminate it with a single
/// newline and deliver it as one message.
pub trait Transport {
    fn send(&self, data: &str) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, data: &str) -> Result<(), TransportError> {
        (**self).send(data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, data: &str) -> Result<(), TransportError> {
        (**self).send(data)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, data: &str) -> Result<(), TransportError> {
        (**self).send(data)
    }
}

/// Sends each payload as one datagram to `host:port`.
///
/// The socket is bound once when the transport is built. The destination
/// is resolved on every send, so a collector that changes address is
/// picked up without rebuilding the client. A hostname lookup can block on
/// a slow resolver; pass an IP address to keep `send` free of DNS.
#[derive(Debug)]
pub struct UdpTransport {
    host: String,
    port: u16,
    socket: UdpSocket,
}

impl UdpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, TransportError> {
        // The socket is IPv4 only; destinations are resolved to IPv4 to match.

        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        Ok(UdpTransport {
            host: host.into(),
            port,
            socket,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    fn resolve(&self) -> Result<SocketAddr, TransportError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| TransportError::Resolve {
                addr: format!("{}:{}", self.host, self.port),
            })
    }
}

impl Transport for UdpTransport {
    fn send(&self, data: &str) -> Result<(), TransportError> {
        let mut payload = Vec::with_capacity(data.len() + 1);
        payload.extend_from_slice(data.as_bytes());
        payload.push(b'\n');

        let addr = self.resolve()?;
        let sent = self.socket.send_to(&payload, addr)?;
        if sent != payload.len() {
            return Err(TransportError::ShortWrite {
                sent,
                expected: payload.len(),
            });
        }
        trace!("sent {} bytes to {}", sent, addr);
        Ok(())
    }
}

/// Accepts and drops every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopTransport;

impl Transport for NopTransport {
    fn send(&self, _data: &str) -> Result<(), TransportError> {
        Ok(())
    }
}
