//! Packs System Exclusive messages into USB-MIDI Event Packets.
//!
//! A SysEx message of any length is split into runs of three bytes. Every run but the last travels in a
//! [`SysExStartOrContinue`](CodeIndexNumber::SysExStartOrContinue) packet; the last run (one, two, or three bytes)
//! travels in the matching "SysEx ends" packet, zero-padded to four bytes. A message of N bytes therefore always
//! occupies exactly ⌈N/3⌉ packets.

use super::{CableNumber, CodeIndexNumber, UsbMidiPacket};
use core::{iter::FusedIterator, slice::Chunks};

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;

/// A System Exclusive message: a run of bytes starting with `0xF0` and ending with `0xF7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysExMessage<'a>(&'a [u8]);

impl<'a> SysExMessage<'a> {
    /// Constructs a [`SysExMessage`], or returns `None` if the bytes aren't delimited as SysEx requires.
    pub const fn new(bytes: &'a [u8]) -> Option<Self> {
        match bytes {
            [SYSEX_START, .., SYSEX_END] => Some(Self(bytes)),
            _ => None,
        }
    }

    /// Returns the message, delimiters included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Returns an [`Iterator`] over the USB-MIDI Event Packets which carry this message on the given cable.
    pub fn packets(&self, cable: CableNumber) -> SysExPackets<'a> {
        packets(cable, self.0)
    }
}

/// Returns an [`Iterator`] over the USB-MIDI Event Packets which carry `bytes` on the given cable.
///
/// Unlike [`SysExMessage::packets`], the bytes are packed as-is, without checking the SysEx delimiters. Empty
/// input produces no packets.
pub fn packets(cable: CableNumber, bytes: &[u8]) -> SysExPackets<'_> {
    SysExPackets {
        cable,
        chunks: bytes.chunks(3),
    }
}

/// An [`Iterator`] which yields one [`UsbMidiPacket`] per three bytes of a SysEx message. See [`packets`].
#[derive(Clone, Debug)]
pub struct SysExPackets<'a> {
    cable: CableNumber,
    chunks: Chunks<'a, u8>,
}

impl Iterator for SysExPackets<'_> {
    type Item = UsbMidiPacket;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;

        let cin = if self.chunks.len() > 0 {
            CodeIndexNumber::SysExStartOrContinue
        } else {
            match chunk.len() {
                1 => CodeIndexNumber::SysExEndsWithOneByte,
                2 => CodeIndexNumber::SysExEndsWithTwoBytes,
                _ => CodeIndexNumber::SysExEndsWithThreeBytes,
            }
        };

        let mut data = [0_u8; 3];
        data[..chunk.len()].copy_from_slice(chunk);
        Some(UsbMidiPacket::new(self.cable, cin, data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for SysExPackets<'_> {}

impl FusedIterator for SysExPackets<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvec::ArrayVec;

    const PLAY: [u8; 6] = [0xF0, 0x7F, 0x7F, 0x06, 0x02, 0xF7];

    /// Concatenates the meaningful bytes of each packet.
    fn unpack(packets: SysExPackets) -> ArrayVec<[u8; 64]> {
        packets.fold(ArrayVec::new(), |mut bytes, packet| {
            bytes.extend_from_slice(packet.payload());
            bytes
        })
    }

    #[test]
    fn new_requires_delimiters() {
        assert!(SysExMessage::new(&PLAY).is_some());
        assert!(SysExMessage::new(&[0xF0, 0xF7]).is_some());
        assert!(SysExMessage::new(&[0xF0]).is_none());
        assert!(SysExMessage::new(&[0xF7]).is_none());
        assert!(SysExMessage::new(&[]).is_none());
        assert!(SysExMessage::new(&[0x90, 0x3C, 0x7F]).is_none());
    }

    #[test]
    fn mmc_play() {
        let mut packets = SysExMessage::new(&PLAY)
            .unwrap()
            .packets(CableNumber::CABLE_0);
        assert_eq!(2, packets.len(), "Expected left but got right");
        assert_eq!(
            Some(UsbMidiPacket::from([0x04, 0xF0, 0x7F, 0x7F])),
            packets.next(),
            "Expected left but got right"
        );
        assert_eq!(
            Some(UsbMidiPacket::from([0x06, 0x06, 0x02, 0xF7])),
            packets.next(),
            "Expected left but got right"
        );
        assert_eq!(None, packets.next());
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut packets = packets(CableNumber::CABLE_0, &[]);
        assert_eq!(0, packets.len(), "Expected left but got right");
        assert_eq!(None, packets.next());
    }

    #[test]
    fn one_byte_remaining_is_padded_twice() {
        let mut packets = packets(CableNumber::CABLE_0, &[0xF0, 0x7E, 0x7F, 0xF7]);
        assert_eq!(
            Some(UsbMidiPacket::from([0x04, 0xF0, 0x7E, 0x7F])),
            packets.next()
        );
        assert_eq!(
            Some(UsbMidiPacket::from([0x05, 0xF7, 0x00, 0x00])),
            packets.next()
        );
        assert_eq!(None, packets.next());
    }

    #[test]
    fn three_bytes_remaining_are_not_padded() {
        let mut packets = packets(CableNumber::CABLE_0, &[0xF0, 0x01, 0xF7]);
        assert_eq!(
            Some(UsbMidiPacket::from([0x07, 0xF0, 0x01, 0xF7])),
            packets.next()
        );
        assert_eq!(None, packets.next());
    }

    #[test]
    fn cable_number_is_carried_in_every_header() {
        let cable = CableNumber::new(2).unwrap();
        for packet in packets(cable, &PLAY) {
            assert_eq!(cable, packet.cable_number(), "Expected left but got right");
        }
    }

    #[test]
    fn packet_count_is_length_divided_by_three_rounded_up() {
        let bytes = [0x55_u8; 48];
        for n in 1..=bytes.len() {
            let packets = packets(CableNumber::CABLE_0, &bytes[..n]);
            assert_eq!(n.div_ceil(3), packets.len(), "Wrong packet count for {n} bytes");
            assert_eq!(n.div_ceil(3), packets.count(), "Wrong packet count for {n} bytes");
        }
    }

    #[test]
    fn unpacking_restores_the_original_message() {
        let mut message = [0_u8; 20];
        for (i, byte) in message.iter_mut().enumerate() {
            *byte = i as u8;
        }
        message[0] = SYSEX_START;
        message[19] = SYSEX_END;

        for n in 1..=message.len() {
            let unpacked = unpack(packets(CableNumber::CABLE_0, &message[..n]));
            assert_eq!(&message[..n], unpacked.as_slice(), "Expected left but got right");
        }
    }
}
