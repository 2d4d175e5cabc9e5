use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{Command, CommandSink, RconError, packet};

/// How often the reply reader wakes up to check for shutdown.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// UDP remote console client.
///
/// One socket, no session: every packet carries the password. Replies are
/// not matched to requests; they are only logged by
/// [`UdpRcon::spawn_reply_logger`].
#[derive(Debug)]
pub struct UdpRcon {
    socket: UdpSocket,
    addr: SocketAddr,
    password: String,
}

impl UdpRcon {
    /// Resolve the server address and open a local socket.
    pub fn connect(host: &str, port: u16, password: impl Into<String>) -> Result<Self, RconError> {
        let target = format!("{host}:{port}");
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| RconError::Resolve(target.clone(), e))?
            .next()
            .ok_or(RconError::NoAddress(target))?;

        let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).map_err(RconError::Socket)?;

        crate::debug!("rcon"; "target {}", addr);
        Ok(Self {
            socket,
            addr,
            password: password.into(),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Log console replies on a background thread until shutdown.
    pub fn spawn_reply_logger(&self) -> Result<JoinHandle<()>, RconError> {
        let socket = self.socket.try_clone().map_err(RconError::Socket)?;
        socket
            .set_read_timeout(Some(READ_TIMEOUT))
            .map_err(RconError::Socket)?;

        Ok(thread::spawn(move || {
            let mut buf = [0u8; 8192];
            while !crate::core::is_shutdown() {
                match socket.recv_from(&mut buf) {
                    Ok((len, _)) => {
                        let Some(text) = packet::decode(&buf[..len]) else {
                            continue;
                        };
                        for line in text.lines().filter(|l| !l.trim().is_empty()) {
                            crate::log!("rcon"; "{}", line);
                        }
                    }
                    Err(e)
                        if matches!(
                            e.kind(),
                            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                        ) => {}
                    Err(e) => crate::debug!("rcon"; "reply read failed: {}", e),
                }
            }
        }))
    }
}

impl CommandSink for UdpRcon {
    fn send(&self, command: &Command) -> Result<(), RconError> {
        let command = command.to_string();
        let packet = packet::encode(&self.password, &command);
        self.socket
            .send_to(&packet, self.addr)
            .map_err(|source| RconError::Send {
                command: command.clone(),
                addr: self.addr,
                source,
            })?;
        crate::debug!("rcon"; "sent `{}`", command);
        Ok(())
    }
}
