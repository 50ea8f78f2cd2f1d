//! ## flowtuple-protocols::record
//! Fixed-width flow-tuple record decoding.
//!
//! Wire layout (big-endian, 20 bytes):
//!
//! ```text
//! [ src_ip (4) ][ dst_ip (3) ][ src_port (2) ][ dst_port (2) ]
//! [ protocol (1) ][ flags (1) ][ ttl (1) ][ ip_len (2) ][ packet_count (4) ]
//! ```
//!
//! The destination address only carries its three low-order octets on the
//! wire; the decoded value always has a zero high octet.

use std::fmt;
use std::io::{self, Read};
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{FlowtupleError, Result};

/// One flow-tuple entry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FlowRecord {
    /// Source IPv4 address.
    pub src_ip: u32,
    /// Destination IPv4 address (high octet always zero).
    pub dst_ip: u32,
    /// Source port number.
    pub src_port: u16,
    /// Destination port number.
    pub dst_port: u16,
    /// IP protocol number.
    pub protocol: u8,
    /// TCP flags.
    pub flags: u8,
    pub ttl: u8,
    /// IP packet length.
    pub ip_len: u16,
    /// Number of packets matching this tuple.
    pub packet_count: u32,
}

#[inline]
fn field<T>(res: io::Result<T>, name: &'static str) -> Result<T> {
    res.map_err(|e| FlowtupleError::from_read(name, e))
}

impl FlowRecord {
    /// Number of bytes a record occupies on the wire.
    pub const WIRE_LEN: usize = 4 + 3 + 2 + 2 + 1 + 1 + 1 + 2 + 4;

    /// Reads one record from `reader`, overwriting `self`.
    ///
    /// `self` is only updated once the full record has been decoded; on error
    /// it keeps its previous contents.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let src_ip = field(reader.read_u32::<BigEndian>(), "source address")?;

        // Three octets land in the low bytes of a zeroed word.
        let mut scratch = [0u8; 4];
        field(reader.read_exact(&mut scratch[1..]), "destination address")?;
        let dst_ip = u32::from_be_bytes(scratch);

        let src_port = field(reader.read_u16::<BigEndian>(), "source port")?;
        let dst_port = field(reader.read_u16::<BigEndian>(), "destination port")?;
        let protocol = field(reader.read_u8(), "protocol")?;
        let flags = field(reader.read_u8(), "flags")?;
        let ttl = field(reader.read_u8(), "ttl")?;
        let ip_len = field(reader.read_u16::<BigEndian>(), "ip length")?;
        let packet_count = field(reader.read_u32::<BigEndian>(), "packet count")?;

        *self = FlowRecord {
            src_ip,
            dst_ip,
            src_port,
            dst_port,
            protocol,
            flags,
            ttl,
            ip_len,
            packet_count,
        };
        Ok(())
    }

    /// Decodes a fresh record from `reader`.
    pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut record = FlowRecord::default();
        record.read_from(reader)?;
        Ok(record)
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.src_ip)
    }

    pub fn dst_addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.dst_ip)
    }
}

impl fmt::Display for FlowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{:#x}|{}|{}",
            self.src_addr(),
            self.dst_addr(),
            self.src_port,
            self.dst_port,
            self.protocol,
            self.flags,
            self.ttl,
            self.ip_len,
            self.packet_count
        )
    }
}
