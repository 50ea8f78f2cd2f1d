use std::fmt;

/// Outer marker opening every interval (ASCII "EDGR").
pub const OUTER_MAGIC: u32 = 0x4544_4752;

/// Interval header/trailer marker (ASCII "INTR").
pub const INTERVAL_MAGIC: u32 = 0x494E_5452;

/// Class header/trailer marker (ASCII "SIXT").
pub const CLASS_MAGIC: u32 = 0x5349_5854;

/// Value of the outer marker position that terminates the stream.
pub const END_OF_STREAM: u32 = 0;

/// Decoded interval header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntervalHeader {
    pub number: u16,
    /// Interval start time in seconds.
    pub start_time: u32,
}

/// Decoded class header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub class_id: u16,
    /// Number of records the class declares.
    pub key_count: u32,
}

impl ClassHeader {
    pub fn class(&self) -> FlowClass {
        FlowClass::from(self.class_id)
    }
}

/// Decoded interval trailer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntervalTrailer {
    pub number: u16,
    /// Interval end time in seconds.
    pub end_time: u32,
}

/// Well-known flowtuple class identifiers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlowClass {
    Backscatter,
    IcmpRequest,
    Other,
    Unknown(u16),
}

impl From<u16> for FlowClass {
    fn from(id: u16) -> Self {
        match id {
            0 => FlowClass::Backscatter,
            1 => FlowClass::IcmpRequest,
            2 => FlowClass::Other,
            n => FlowClass::Unknown(n),
        }
    }
}

impl fmt::Display for FlowClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowClass::Backscatter => f.write_str("backscatter"),
            FlowClass::IcmpRequest => f.write_str("icmp_req"),
            FlowClass::Other => f.write_str("other"),
            FlowClass::Unknown(id) => write!(f, "class_{id}"),
        }
    }
}
