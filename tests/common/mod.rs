//! In-memory printer for driving a `Session` without Bluetooth.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use paperang::Session;
use paperang::protocol::Packet;
use paperang::protocol::checksum::{SESSION_KEY, STANDARD_KEY};
use paperang::transport::{Connector, Transport};

/// Reply sent when nothing is scripted
pub const ACK: &[u8] = &[0x01];

/// Everything that crossed the fake link.
#[derive(Default)]
pub struct Wire {
    /// One entry per `send` call
    pub sent: Vec<Vec<u8>>,
    /// Scripted replies, oldest first
    pub replies: VecDeque<Vec<u8>>,
    /// Time out every read instead of acknowledging
    pub silent: bool,
    /// Reads performed
    pub reads: usize,
    pub connects: usize,
    pub closed: usize,
}

impl Wire {
    /// Decode every packet sent after the key handshake.
    pub fn commands(&self) -> Vec<Packet> {
        self.sent[1..]
            .iter()
            .map(|bytes| Packet::decode(bytes, SESSION_KEY).unwrap())
            .collect()
    }

    pub fn handshake(&self) -> Packet {
        Packet::decode(&self.sent[0], STANDARD_KEY).unwrap()
    }
}

pub struct MockLink(Rc<RefCell<Wire>>);

impl Transport for MockLink {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.borrow_mut().sent.push(data.to_vec());
        Ok(())
    }

    fn recv(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        let mut wire = self.0.borrow_mut();
        wire.reads += 1;
        if let Some(mut reply) = wire.replies.pop_front() {
            reply.truncate(max_len);
            return Ok(reply);
        }
        if wire.silent {
            return Err(io::ErrorKind::TimedOut.into());
        }
        Ok(ACK.to_vec())
    }

    fn close(&mut self) -> io::Result<()> {
        self.0.borrow_mut().closed += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockConnector {
    pub wire: Rc<RefCell<Wire>>,
}

impl Connector for MockConnector {
    type Link = MockLink;

    fn connect(&self, _address: &str, _channel: u8, _recv_timeout: Duration) -> io::Result<MockLink> {
        self.wire.borrow_mut().connects += 1;
        Ok(MockLink(self.wire.clone()))
    }
}

/// A disconnected session over a fresh mock printer.
pub fn mock_session() -> (Session<MockConnector>, Rc<RefCell<Wire>>) {
    let connector = MockConnector::default();
    let wire = connector.wire.clone();
    let session = Session::with_connector(Some("00:15:83:12:34:56".to_string()), connector);
    (session, wire)
}

/// A session that has completed the key handshake.
pub fn ready_session() -> (Session<MockConnector>, Rc<RefCell<Wire>>) {
    let (mut session, wire) = mock_session();
    session.connect().unwrap();
    (session, wire)
}
