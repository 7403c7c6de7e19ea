//! The boundary between the device's logic and whatever physically moves USB-MIDI Event Packets to the host.

use crate::usb_midi::{
    CableNumber, CodeIndexNumber, UsbMidiPacket,
    sysex::SysExMessage,
};
use wmidi::{Channel, ControlFunction, ControlValue, MidiMessage};

/// A MIDI Control Change message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlChange {
    /// The channel on which to send the message.
    pub channel: Channel,
    /// The controller number.
    pub function: ControlFunction,
    /// The value to assign to the controller.
    pub value: ControlValue,
}

impl ControlChange {
    /// Packs the message into a single [`UsbMidiPacket`] on the given cable.
    pub fn packet(&self, cable: CableNumber) -> UsbMidiPacket {
        UsbMidiPacket::new(
            cable,
            CodeIndexNumber::ControlChange,
            [
                0xB0 | self.channel.index(),
                u8::from(self.function),
                u8::from(self.value),
            ],
        )
    }
}

impl From<ControlChange> for MidiMessage<'static> {
    fn from(cc: ControlChange) -> Self {
        MidiMessage::ControlChange(cc.channel, cc.function, cc.value)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControlChange {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ControlChange {{ channel: {}, function: {}, value: {} }}",
            self.channel.index(),
            u8::from(self.function),
            u8::from(self.value)
        );
    }
}

/// Something that delivers USB-MIDI Event Packets to the host.
///
/// Packets may be queued by [`send_packet`](Self::send_packet); [`flush`](Self::flush) returns only once everything
/// queued has gone out. Failures to deliver belong to the transport: implementations swallow them, so nothing here
/// returns an error.
#[allow(async_fn_in_trait)]
pub trait MidiTransmitter {
    /// The cable on which this transmitter sends.
    fn cable(&self) -> CableNumber {
        CableNumber::CABLE_0
    }

    /// Queues a single packet for delivery.
    async fn send_packet(&mut self, packet: UsbMidiPacket);

    /// Delivers everything queued so far.
    async fn flush(&mut self);

    /// Queues every packet of a SysEx message, in order.
    async fn send_sysex(&mut self, message: SysExMessage<'_>) {
        for packet in message.packets(self.cable()) {
            self.send_packet(packet).await;
        }
    }

    /// Queues a Control Change message.
    async fn send_control_change(&mut self, cc: ControlChange) {
        let packet = cc.packet(self.cable());
        self.send_packet(packet).await;
    }
}
