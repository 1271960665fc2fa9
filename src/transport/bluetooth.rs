//! # Bluetooth RFCOMM Transport
//!
//! This module provides communication with Paperang printers over a raw
//! Bluetooth RFCOMM stream socket (`AF_BLUETOOTH`, `SOCK_STREAM`,
//! `BTPROTO_RFCOMM`). No `/dev/rfcommN` binding is needed; the socket
//! connects straight to the printer's address.
//!
//! ## Bluetooth Setup (Linux)
//!
//! The printer must be paired once:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Look for "Paperang" and note the address, e.g. 00:15:83:XX:XX:XX
//! [bluetooth]# pair 00:15:83:XX:XX:XX
//! ```
//!
//! ## Timeouts
//!
//! The receive timeout applies to every read. When it expires the read fails
//! with [`io::ErrorKind::TimedOut`]; a slow printer and a silent one look the
//! same.

use std::io;
use std::time::Duration;

use super::Connector;

/// RFCOMM channel used by the Serial Port Profile
pub const DEFAULT_CHANNEL: u8 = 1;

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    if parts.len() != 6 {
        return false;
    }
    parts
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Parse "XX:XX:XX:XX:XX:XX" into the 6-byte `bdaddr_t` layout.
///
/// BlueZ stores the address least significant byte first.
pub fn parse_bdaddr(addr: &str) -> io::Result<[u8; 6]> {
    if !is_valid_mac(addr) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid Bluetooth address: {}", addr),
        ));
    }
    let mut bdaddr = [0u8; 6];
    for (i, part) in addr.split(':').enumerate() {
        bdaddr[5 - i] = u8::from_str_radix(part, 16)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    }
    Ok(bdaddr)
}

/// Opens [`RfcommSocket`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BluetoothConnector;

impl Connector for BluetoothConnector {
    type Link = RfcommSocket;

    fn connect(&self, address: &str, channel: u8, recv_timeout: Duration) -> io::Result<RfcommSocket> {
        RfcommSocket::connect(address, channel, recv_timeout)
    }
}

#[cfg(target_os = "linux")]
pub use linux::RfcommSocket;

#[cfg(not(target_os = "linux"))]
pub use unsupported::RfcommSocket;

#[cfg(target_os = "linux")]
mod linux {
    use std::io;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
    use std::time::Duration;

    use super::parse_bdaddr;
    use crate::transport::Transport;

    // <bluetooth/bluetooth.h>, <bluetooth/rfcomm.h>
    const AF_BLUETOOTH: libc::c_int = 31;
    const BTPROTO_RFCOMM: libc::c_int = 3;

    #[repr(C)]
    struct SockaddrRc {
        rc_family: libc::sa_family_t,
        rc_bdaddr: [u8; 6],
        rc_channel: u8,
    }

    /// # Bluetooth RFCOMM Socket
    ///
    /// A connected stream socket to one printer. The descriptor is closed
    /// when the socket is dropped.
    #[derive(Debug)]
    pub struct RfcommSocket {
        fd: OwnedFd,
    }

    impl RfcommSocket {
        /// Connect to `addr` on `channel` and set the receive timeout.
        ///
        /// ## Errors
        ///
        /// Returns an error if:
        /// - The address is malformed
        /// - Bluetooth is unavailable or the printer is out of range
        /// - The printer is not paired
        pub fn connect(addr: &str, channel: u8, recv_timeout: Duration) -> io::Result<Self> {
            let bdaddr = parse_bdaddr(addr)?;

            let raw = unsafe { libc::socket(AF_BLUETOOTH, libc::SOCK_STREAM, BTPROTO_RFCOMM) };
            if raw < 0 {
                return Err(io::Error::last_os_error());
            }
            // From here on the descriptor is closed on every early return.
            let fd = unsafe { OwnedFd::from_raw_fd(raw) };

            let sa = SockaddrRc {
                rc_family: AF_BLUETOOTH as libc::sa_family_t,
                rc_bdaddr: bdaddr,
                rc_channel: channel,
            };
            let ret = unsafe {
                libc::connect(
                    fd.as_raw_fd(),
                    &sa as *const SockaddrRc as *const libc::sockaddr,
                    std::mem::size_of::<SockaddrRc>() as libc::socklen_t,
                )
            };
            if ret < 0 {
                return Err(io::Error::last_os_error());
            }

            let sock = Self { fd };
            sock.set_recv_timeout(recv_timeout)?;
            Ok(sock)
        }

        /// Return the raw file descriptor for this socket.
        pub fn raw_fd(&self) -> RawFd {
            self.fd.as_raw_fd()
        }

        fn set_recv_timeout(&self, timeout: Duration) -> io::Result<()> {
            let tv = libc::timeval {
                tv_sec: timeout.as_secs() as libc::time_t,
                tv_usec: timeout.subsec_micros() as libc::suseconds_t,
            };
            let ret = unsafe {
                libc::setsockopt(
                    self.raw_fd(),
                    libc::SOL_SOCKET,
                    libc::SO_RCVTIMEO,
                    &tv as *const libc::timeval as *const libc::c_void,
                    std::mem::size_of::<libc::timeval>() as libc::socklen_t,
                )
            };
            if ret < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    }

    impl Transport for RfcommSocket {
        fn send(&mut self, data: &[u8]) -> io::Result<()> {
            let mut sent = 0;
            while sent < data.len() {
                let n = unsafe {
                    libc::send(
                        self.raw_fd(),
                        data[sent..].as_ptr() as *const libc::c_void,
                        data.len() - sent,
                        libc::MSG_NOSIGNAL,
                    )
                };
                if n < 0 {
                    let err = io::Error::last_os_error();
                    if err.kind() == io::ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err);
                }
                sent += n as usize;
            }
            Ok(())
        }

        fn recv(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
            let mut buf = vec![0u8; max_len];
            let n = loop {
                let n = unsafe {
                    libc::recv(
                        self.raw_fd(),
                        buf.as_mut_ptr() as *mut libc::c_void,
                        buf.len(),
                        0,
                    )
                };
                if n >= 0 {
                    break n as usize;
                }
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted => continue,
                    // SO_RCVTIMEO expiry is reported as EAGAIN
                    io::ErrorKind::WouldBlock => {
                        return Err(io::Error::new(io::ErrorKind::TimedOut, "receive timed out"));
                    }
                    _ => return Err(err),
                }
            };
            if n == 0 && max_len > 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by printer",
                ));
            }
            buf.truncate(n);
            Ok(buf)
        }

        fn close(&mut self) -> io::Result<()> {
            let ret = unsafe { libc::shutdown(self.raw_fd(), libc::SHUT_RDWR) };
            if ret < 0 {
                let err = io::Error::last_os_error();
                // Already torn down by the peer
                if err.raw_os_error() == Some(libc::ENOTCONN) {
                    return Ok(());
                }
                return Err(err);
            }
            Ok(())
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod unsupported {
    use std::io;
    use std::time::Duration;

    use crate::transport::Transport;

    /// Placeholder on platforms without `AF_BLUETOOTH` sockets.
    #[derive(Debug)]
    pub struct RfcommSocket {
        _private: (),
    }

    impl RfcommSocket {
        pub fn connect(_addr: &str, _channel: u8, _recv_timeout: Duration) -> io::Result<Self> {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "RFCOMM sockets are only supported on Linux",
            ))
        }
    }

    impl Transport for RfcommSocket {
        fn send(&mut self, _data: &[u8]) -> io::Result<()> {
            Err(io::ErrorKind::Unsupported.into())
        }

        fn recv(&mut self, _max_len: usize) -> io::Result<Vec<u8>> {
            Err(io::ErrorKind::Unsupported.into())
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
