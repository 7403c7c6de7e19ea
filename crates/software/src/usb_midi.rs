//! Provides types for the 32-bit USB-MIDI Event Packets carried by a USB MIDI streaming endpoint.
//!
//! Every packet is four bytes long: a header holding the cable number (upper nibble) and Code Index Number
//! (lower nibble), followed by three bytes of MIDI data. Bytes the Code Index Number does not call for are zero.

pub mod sysex;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Identifies one of the sixteen virtual MIDI cables an endpoint can carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CableNumber(u8);

impl CableNumber {
    /// The first (and, for this device, only) cable.
    pub const CABLE_0: CableNumber = CableNumber(0);

    /// Constructs a [`CableNumber`], returning `None` for values that don't fit in a nibble.
    pub const fn new(number: u8) -> Option<Self> {
        if number < 16 { Some(Self(number)) } else { None }
    }

    /// Getter.
    pub const fn number(self) -> u8 {
        self.0
    }
}

/// Indicates how the three data bytes of a [`UsbMidiPacket`] should be interpreted.
///
/// Only the classifications this device sends are represented.
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodeIndexNumber {
    /// A System Exclusive message starts or continues; all three data bytes are meaningful.
    SysExStartOrContinue = 0x4,
    /// A System Exclusive message ends with the single byte that follows.
    SysExEndsWithOneByte = 0x5,
    /// A System Exclusive message ends with the two bytes that follow.
    SysExEndsWithTwoBytes = 0x6,
    /// A System Exclusive message ends with the three bytes that follow.
    SysExEndsWithThreeBytes = 0x7,
    /// A Control Change message.
    ControlChange = 0xB,
}

impl CodeIndexNumber {
    /// Number of data bytes which are meaningful for this classification.
    pub fn payload_len(self) -> usize {
        match self {
            Self::SysExEndsWithOneByte => 1,
            Self::SysExEndsWithTwoBytes => 2,
            Self::SysExStartOrContinue | Self::SysExEndsWithThreeBytes | Self::ControlChange => 3,
        }
    }
}

/// A single USB-MIDI Event Packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbMidiPacket([u8; 4]);

impl UsbMidiPacket {
    /// Size of a packet in bytes, regardless of how many of its bytes are meaningful.
    pub const LEN: usize = 4;

    /// Constructs a [`UsbMidiPacket`] from its parts. Data bytes beyond those the [`CodeIndexNumber`] calls for
    /// should be zero.
    pub fn new(cable: CableNumber, cin: CodeIndexNumber, data: [u8; 3]) -> Self {
        Self([(cable.number() << 4) | cin as u8, data[0], data[1], data[2]])
    }

    /// Constructs a [`UsbMidiPacket`] from raw bytes as received from or written to the wire.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Returns the packet header, i.e., the cable number and Code Index Number combined into one byte.
    pub fn header(&self) -> u8 {
        self.0[0]
    }

    /// Getter.
    pub fn cable_number(&self) -> CableNumber {
        CableNumber(self.header() >> 4)
    }

    /// Returns the [`CodeIndexNumber`], or `None` if the header holds a classification this crate doesn't know.
    pub fn code_index_number(&self) -> Option<CodeIndexNumber> {
        CodeIndexNumber::from_u8(self.header() & 0x0F)
    }

    /// Returns only the meaningful data bytes, leaving off the header and any padding.
    ///
    /// Packets with an unrecognized [`CodeIndexNumber`] have no meaningful bytes as far as this crate is concerned.
    pub fn payload(&self) -> &[u8] {
        let len = self.code_index_number().map_or(0, CodeIndexNumber::payload_len);
        &self.0[1..1 + len]
    }

    /// Returns the packet as it is written to the wire.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl From<[u8; 4]> for UsbMidiPacket {
    fn from(bytes: [u8; 4]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<UsbMidiPacket> for [u8; 4] {
    fn from(packet: UsbMidiPacket) -> Self {
        packet.0
    }
}
