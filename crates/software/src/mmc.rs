//! Provides the [MIDI Machine Control](https://en.wikipedia.org/wiki/MIDI_Machine_Control) transport commands the
//! device sends.
//!
//! MMC commands are Universal Real Time System Exclusive messages of the form `F0 7F <device id> 06 <command> F7`.
//! The device always addresses every listener at once.

use crate::usb_midi::sysex::SysExMessage;

/// The MMC device id which addresses all devices.
pub const ALL_DEVICES: u8 = 0x7F;

const fn command(command: u8) -> [u8; 6] {
    [0xF0, 0x7F, ALL_DEVICES, 0x06, command, 0xF7]
}

const fn sysex(bytes: &'static [u8]) -> SysExMessage<'static> {
    match SysExMessage::new(bytes) {
        Some(message) => message,
        None => panic!("MMC commands must be delimited as SysEx"),
    }
}

const STOP_BYTES: [u8; 6] = command(MmcCommand::Stop as u8);
const PLAY_BYTES: [u8; 6] = command(MmcCommand::Play as u8);
const RECORD_STROBE_BYTES: [u8; 6] = command(MmcCommand::RecordStrobe as u8);

const STOP: SysExMessage<'static> = sysex(&STOP_BYTES);
const PLAY: SysExMessage<'static> = sysex(&PLAY_BYTES);
const RECORD_STROBE: SysExMessage<'static> = sysex(&RECORD_STROBE_BYTES);

/// The subset of MMC commands the device can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MmcCommand {
    /// Stops the transport.
    Stop = 0x01,
    /// Starts the transport.
    Play = 0x02,
    /// Starts recording, entering play if stopped.
    RecordStrobe = 0x06,
}

impl MmcCommand {
    /// Returns the complete SysEx message for this command.
    pub fn message(self) -> SysExMessage<'static> {
        match self {
            Self::Stop => STOP,
            Self::Play => PLAY,
            Self::RecordStrobe => RECORD_STROBE,
        }
    }
}
