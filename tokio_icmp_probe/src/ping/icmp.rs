use super::checksum::checksum;
use super::{Identifier, Sequence};
use crate::config::{MAX_PAYLOAD_SIZE, MAX_PROBES};
use crate::error::{DecodeError, Error, Result};
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{IcmpCode, IcmpTypes};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::Packet;
use std::net::Ipv4Addr;

/// Size of the ICMP echo header: type, code, checksum, identifier and sequence.
pub const ICMP_HEADER_SIZE: usize = 8;

const IPV4_MIN_HEADER_SIZE: usize = 20;

/// An Echo Reply addressed to this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    pub sequence: Sequence,
    pub ttl: u8,
    pub source: Ipv4Addr,
    /// Length of the ICMP message, header included.
    pub length: usize,
}

/// Build the wire bytes of an Echo Request.
///
/// The payload is `payload_size` bytes of the pattern `0, 1, 2, ...` (modulo 256).
pub fn encode_request(
    sequence: Sequence,
    identifier: Identifier,
    payload_size: usize,
) -> Result<Vec<u8>> {
    if payload_size > MAX_PAYLOAD_SIZE {
        return Err(Error::InvalidPayloadSize(payload_size));
    }
    let mut buf = vec![0; ICMP_HEADER_SIZE + payload_size];
    let Some(mut echo_packet) = MutableEchoRequestPacket::new(&mut buf[..]) else {
        return Err(Error::InvalidPayloadSize(payload_size));
    };
    let payload: Vec<u8> = (0..payload_size).map(|i| (i % 256) as u8).collect();
    echo_packet.set_icmp_type(IcmpTypes::EchoRequest);
    echo_packet.set_icmp_code(IcmpCode(0));
    echo_packet.set_checksum(0);
    echo_packet.set_identifier(identifier.0);
    echo_packet.set_sequence_number(sequence.0);
    echo_packet.set_payload(&payload);
    let csum = checksum(echo_packet.packet());
    echo_packet.set_checksum(csum);
    Ok(buf)
}

/// Decode an IPv4 datagram read from a raw ICMP socket.
///
/// The reply checksum is not verified.
pub fn decode_reply(
    buf: &[u8],
    expected: Identifier,
) -> std::result::Result<EchoReply, DecodeError> {
    let ipv4 = Ipv4Packet::new(buf).ok_or(DecodeError::TooShort(buf.len()))?;
    let header_length = usize::from(ipv4.get_header_length()) * 4;
    if header_length < IPV4_MIN_HEADER_SIZE
        || buf.len().saturating_sub(header_length) < ICMP_HEADER_SIZE
    {
        return Err(DecodeError::TooShort(buf.len()));
    }
    let icmp = &buf[header_length..];
    let echo = EchoReplyPacket::new(icmp).ok_or(DecodeError::TooShort(buf.len()))?;
    if echo.get_icmp_type() != IcmpTypes::EchoReply {
        return Err(DecodeError::WrongType(echo.get_icmp_type().0));
    }
    if echo.get_identifier() != expected.0 {
        return Err(DecodeError::IdentifierMismatch {
            expected: expected.0,
            actual: echo.get_identifier(),
        });
    }
    let sequence = echo.get_sequence_number();
    if usize::from(sequence) >= MAX_PROBES {
        return Err(DecodeError::SequenceOutOfRange(sequence));
    }
    Ok(EchoReply {
        sequence: Sequence(sequence),
        ttl: ipv4.get_ttl(),
        source: ipv4.get_source(),
        length: icmp.len(),
    })
}
