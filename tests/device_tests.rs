//! # Device Tests
//!
//! Drive a `Session` against the in-memory printer in `common` and check
//! the exact packets each operation puts on the wire.

mod common;

use common::{ACK, mock_session, ready_session};
use paperang::protocol::Command;
use paperang::protocol::checksum::{SESSION_KEY, STANDARD_KEY};
use paperang::{PaperangError, State};
use pretty_assertions::assert_eq;

#[test]
fn test_handshake_announces_session_key() {
    let (session, wire) = ready_session();
    assert_eq!(session.state(), State::Ready);

    let wire = wire.borrow();
    let handshake = wire.handshake();
    assert_eq!(handshake.command, 0x19);
    assert_eq!(handshake.sequence, 0);
    assert_eq!(
        u32::from_le_bytes(handshake.payload.try_into().unwrap()) ^ STANDARD_KEY,
        SESSION_KEY
    );
    assert_eq!(wire.reads, 1);
}

#[test]
fn test_setting_commands() {
    let (mut session, wire) = ready_session();
    wire.borrow_mut().replies.extend([vec![0xA1], vec![0xA2], vec![0xA3]]);

    assert_eq!(session.set_heat_density(75).unwrap(), vec![0xA1]);
    assert_eq!(session.set_paper_type(1).unwrap(), vec![0xA2]);
    assert_eq!(session.set_power_off_time(0x0258).unwrap(), vec![0xA3]);

    let sent: Vec<(u8, Vec<u8>)> = wire
        .borrow()
        .commands()
        .into_iter()
        .map(|p| (p.command, p.payload))
        .collect();
    assert_eq!(
        sent,
        vec![
            (0x1A, vec![75]),
            (0x2D, vec![1]),
            (0x1F, vec![0x58, 0x02]),
        ]
    );
}

#[test]
fn test_queries_return_raw_reply() {
    let (mut session, wire) = ready_session();
    let battery = vec![0x02, 0x11, 0x00, 0x01, 0x00, 0x5A];
    wire.borrow_mut().replies.push_back(battery.clone());

    assert_eq!(session.query_battery_status().unwrap(), battery);
    assert_eq!(session.query_heat_density().unwrap(), ACK);
    assert_eq!(session.query_power_off_time().unwrap(), ACK);
    assert_eq!(session.query_serial_number().unwrap(), ACK);
    assert_eq!(session.query_hardware_info().unwrap(), ACK);

    let codes: Vec<u8> = wire.borrow().commands().iter().map(|p| p.command).collect();
    assert_eq!(codes, vec![0x11, 0x1D, 0x20, 0x0B, 0x26]);
    assert!(wire.borrow().commands().iter().all(|p| p.payload == vec![1]));
}

#[test]
fn test_feed_commands() {
    let (mut session, wire) = ready_session();
    session.feed_line(300).unwrap();
    session.feed_to_head_line(10).unwrap();
    session.print_test_page().unwrap();

    let packets = wire.borrow().commands();
    assert_eq!(packets[0].command, Command::FeedLine.code());
    assert_eq!(packets[0].payload, vec![0x2C, 0x01]);
    assert_eq!(packets[1].command, Command::FeedToHeadLine.code());
    assert_eq!(packets[1].payload, vec![0x0A, 0x00]);
    assert_eq!(packets[2].command, 0x21);
}

#[test]
fn test_print_data_reads_nothing() {
    let (mut session, wire) = ready_session();
    session.print_data(vec![0x55; 2000]).unwrap();

    let wire = wire.borrow();
    // Only the handshake reply was read
    assert_eq!(wire.reads, 1);
    let packets = wire.commands();
    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0].sequence, 0);
    assert_eq!(packets[1].sequence, 1);
    assert_eq!(packets[1].payload.len(), 2000 - 1536);
}

#[test]
fn test_empty_print_data_sends_nothing() {
    let (mut session, wire) = ready_session();
    session.print_data(Vec::new()).unwrap();
    assert_eq!(wire.borrow().sent.len(), 1);
}

#[test]
fn test_exactly_256_chunks_allowed() {
    let (mut session, wire) = ready_session();
    session.print_data(vec![0; 1536 * 256]).unwrap();

    let packets = wire.borrow().commands();
    assert_eq!(packets.len(), 256);
    assert_eq!(packets.last().unwrap().sequence, 255);
}

#[test]
fn test_operations_require_connection() {
    let (mut session, wire) = mock_session();
    assert!(matches!(
        session.set_heat_density(50),
        Err(PaperangError::NotConnected)
    ));
    assert!(matches!(
        session.print_data(vec![0xFF]),
        Err(PaperangError::NotConnected)
    ));
    assert!(wire.borrow().sent.is_empty());
}

#[test]
fn test_timeout_drops_connection_and_key() {
    let (mut session, wire) = ready_session();
    wire.borrow_mut().silent = true;

    let result = session.query_serial_number();
    assert!(matches!(result, Err(PaperangError::Read(_))));
    assert_eq!(session.state(), State::Disconnected);

    // Reconnecting performs a fresh handshake under the standard key
    wire.borrow_mut().silent = false;
    session.connect().unwrap();
    let wire = wire.borrow();
    assert_eq!(wire.connects, 2);
    let handshake = paperang::protocol::Packet::decode(&wire.sent[2], STANDARD_KEY).unwrap();
    assert_eq!(handshake.command, Command::SetCrcKey.code());
}
