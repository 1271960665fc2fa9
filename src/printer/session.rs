//! # Printer Session
//!
//! A [`Session`] owns the link to one printer, its connection state and the
//! checksum key, and turns [`Request`]s into packets on the wire.
//!
//! ## Connection Lifecycle
//!
//! ```text
//!                connect()                 socket open
//! Disconnected ───────────► Connecting ──────────────► Connected
//!      ▲                        │ socket error              │ SET_CRC_KEY sent
//!      │                        ▼                           ▼
//!      └──────────────── Disconnected ◄─────────────────  Ready
//!         disconnect() / transport error
//! ```
//!
//! - **Connected**: socket open, packets checksummed with the standard key.
//!   The key handshake runs immediately.
//! - **Ready**: the negotiated key is in effect for every later packet.
//! - A transport error while sending or reading closes the socket and drops
//!   the key; reconnecting renegotiates.
//!
//! ## Reply Correlation
//!
//! The protocol carries no request ids. A reply is whatever the printer
//! sends after the last chunk of the most recent command, so one session
//! must never have two commands in flight.
//!
//! ## Example
//!
//! ```no_run
//! use paperang::printer::Session;
//!
//! let mut session = Session::new(Some("00:15:83:12:34:56".to_string()));
//! session.connect()?;
//! let battery = session.query_battery_status()?;
//! println!("battery reply: {:02x?}", battery);
//! session.disconnect();
//! # Ok::<(), paperang::PaperangError>(())
//! ```

use std::mem;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::error::{PaperangError, Result};
use crate::protocol::checksum::{CrcKey, SESSION_KEY};
use crate::protocol::{Request, chunk, commands, packet};
use crate::transport::bluetooth::{DEFAULT_CHANNEL, is_valid_mac};
use crate::transport::{BluetoothConnector, Connector, Transport};

/// Receive timeout applied to every reply read
pub const RECV_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest reply accepted by one read (bytes)
pub const MAX_REPLY_LEN: usize = 1024;

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connecting,
    Connected,
    Ready,
}

/// Connection state together with what each state owns.
enum Connection<L> {
    Disconnected,
    Connecting,
    Connected(L),
    Ready { link: L, key: CrcKey },
}

impl<L: Transport> Connection<L> {
    fn state(&self) -> State {
        match self {
            Connection::Disconnected => State::Disconnected,
            Connection::Connecting => State::Connecting,
            Connection::Connected(_) => State::Connected,
            Connection::Ready { .. } => State::Ready,
        }
    }

    fn key(&self) -> CrcKey {
        match self {
            Connection::Ready { key, .. } => *key,
            _ => CrcKey::Standard,
        }
    }

    fn link_mut(&mut self) -> Result<(&mut L, CrcKey)> {
        match self {
            Connection::Connected(link) => Ok((link, CrcKey::Standard)),
            Connection::Ready { link, key } => Ok((link, *key)),
            Connection::Disconnected | Connection::Connecting => Err(PaperangError::NotConnected),
        }
    }

    /// Connected → Ready with `key`. Any other state is returned unchanged.
    fn negotiated(self, key: u32) -> Self {
        match self {
            Connection::Connected(link) => Connection::Ready {
                link,
                key: CrcKey::Negotiated(key),
            },
            other => other,
        }
    }
}

/// # Paperang Session
///
/// Single-owner, blocking session with one printer. Every command fully
/// transmits before returning; reads block up to the receive timeout.
pub struct Session<C: Connector = BluetoothConnector> {
    address: Option<String>,
    connector: C,
    channel: u8,
    recv_timeout: Duration,
    connection: Connection<C::Link>,
}

impl Session<BluetoothConnector> {
    /// Create a disconnected session for a Bluetooth address.
    pub fn new(address: Option<String>) -> Self {
        Self::with_connector(address, BluetoothConnector)
    }
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session that opens links through `connector`.
    pub fn with_connector(address: Option<String>, connector: C) -> Self {
        Self {
            address,
            connector,
            channel: DEFAULT_CHANNEL,
            recv_timeout: RECV_TIMEOUT,
            connection: Connection::Disconnected,
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn state(&self) -> State {
        self.connection.state()
    }

    /// Key used for the next packet.
    pub fn crc_key(&self) -> CrcKey {
        self.connection.key()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == State::Ready
    }

    /// Set the receive timeout for links opened by later `connect` calls.
    ///
    /// Default is 60 seconds.
    pub fn set_recv_timeout(&mut self, timeout: Duration) {
        self.recv_timeout = timeout;
    }

    /// Open the link and negotiate the checksum key.
    ///
    /// An already open session is closed and reconnected. On failure the
    /// error is logged and the session stays `Disconnected`. An address that
    /// is not `XX:XX:XX:XX:XX:XX` is refused before any socket is opened.
    pub fn connect(&mut self) -> Result<()> {
        let address = match self.address.as_deref() {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => return Err(PaperangError::AddressMissing),
        };
        if !is_valid_mac(&address) {
            return Err(PaperangError::InvalidAddress(address));
        }

        if self.state() != State::Disconnected {
            info!("Reconnecting to {}.", address);
            self.disconnect();
        }

        self.connection = Connection::Connecting;
        let link = match self
            .connector
            .connect(&address, self.channel, self.recv_timeout)
        {
            Ok(link) => link,
            Err(e) => {
                error!("Failed to connect to {}: {}", address, e);
                self.connection = Connection::Disconnected;
                return Err(PaperangError::ConnectFailed(format!("{}: {}", address, e)));
            }
        };
        self.connection = Connection::Connected(link);
        info!("Connected to {}.", address);

        if let Err(e) = self.negotiate_key() {
            error!("Failed to connect to {}: {}", address, e);
            self.disconnect();
            return Err(PaperangError::ConnectFailed(format!(
                "{}: key negotiation failed: {}",
                address, e
            )));
        }
        Ok(())
    }

    /// Close the link, if any. Safe to call at any time.
    ///
    /// Errors while closing are logged and swallowed.
    pub fn disconnect(&mut self) {
        match mem::replace(&mut self.connection, Connection::Disconnected) {
            Connection::Connected(mut link) | Connection::Ready { mut link, .. } => {
                match link.close() {
                    Ok(()) => info!("Disconnected."),
                    Err(e) => warn!("Failed to disconnect cleanly: {}", e),
                }
            }
            Connection::Disconnected | Connection::Connecting => {}
        }
    }

    /// Send `request` and, if it awaits a reply, read one.
    ///
    /// The payload is split into chunks numbered from 0 and every chunk is
    /// written before the single reply read. Payloads needing more than 256
    /// chunks are refused before anything is written.
    ///
    /// ## Errors
    ///
    /// - [`PaperangError::NotConnected`] without an open link
    /// - [`PaperangError::SequenceOverflow`] for oversized payloads
    /// - [`PaperangError::Write`] / [`PaperangError::Read`] on transport
    ///   failure; the session is disconnected before returning
    pub fn dispatch(&mut self, request: &Request) -> Result<Option<Vec<u8>>> {
        let result = self.exchange(request);
        if let Err(e @ (PaperangError::Write(_) | PaperangError::Read(_))) = &result {
            warn!("{} failed, closing connection: {}", request.command.name(), e);
            self.disconnect();
        }
        result
    }

    fn exchange(&mut self, request: &Request) -> Result<Option<Vec<u8>>> {
        self.transmit(request)?;
        if !request.await_reply {
            return Ok(None);
        }
        self.receive().map(Some)
    }

    /// Frame and write every chunk of `request`.
    fn transmit(&mut self, request: &Request) -> Result<()> {
        let (link, key) = self.connection.link_mut()?;
        let chunks = chunk::split_for_transmission(&request.payload)?;
        let total = chunks.len();

        for (seq, chunk) in chunks.into_iter().enumerate() {
            // split_for_transmission caps chunks at 256
            let packet = packet::frame(chunk, request.command.code(), seq as u8, key.value())?;
            debug!(
                "TX {} {}/{}: {:02x?}",
                request.command.name(),
                seq + 1,
                total,
                &packet[..packet.len().min(16)]
            );
            link.send(&packet).map_err(PaperangError::Write)?;
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<u8>> {
        let (link, _) = self.connection.link_mut()?;
        let reply = link.recv(MAX_REPLY_LEN).map_err(PaperangError::Read)?;
        debug!("RX: {:02x?}", reply);
        Ok(reply)
    }

    /// Register [`SESSION_KEY`] with the printer and switch to it.
    ///
    /// The announcement itself goes out under the standard key. The reply is
    /// read but not required: a printer that stays silent still gets the
    /// new key.
    fn negotiate_key(&mut self) -> Result<()> {
        info!("Setting CRC32 key...");
        self.transmit(&commands::set_crc_key(SESSION_KEY))?;
        if let Err(e) = self.receive() {
            warn!("No reply to CRC32 key registration: {}", e);
        }

        let connection = mem::replace(&mut self.connection, Connection::Disconnected);
        self.connection = connection.negotiated(SESSION_KEY);
        info!("CRC32 key set.");
        Ok(())
    }
}

impl<C: Connector> Drop for Session<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// ============================================================================
// TESTS
// ============================================================================
