//! The firmware's [`MidiTransmitter`]: USB-MIDI Event Packets over the USB OTG FS peripheral.

use crate::{UsbDriver, connection::ConnectionSpy};
use defmt::{panic, *};
use embassy_usb::{class::midi::MidiClass, driver::EndpointError};
use mmc_remote_lib::{transmitter::MidiTransmitter, usb_midi::UsbMidiPacket};
use tinyvec::ArrayVec;

/// Largest USB packet the MIDI streaming endpoint sends; holds sixteen USB-MIDI Event Packets.
pub const MAX_PACKET_SIZE: usize = 64;

#[doc(hidden)]
struct Disconnected {}

impl From<EndpointError> for Disconnected {
    fn from(val: EndpointError) -> Self {
        match val {
            EndpointError::BufferOverflow => panic!("Buffer overflow"),
            EndpointError::Disabled => Disconnected {},
        }
    }
}

/// Queues packets until flushed, then writes them to the host as a single USB packet.
///
/// When no host is configured the queue is dropped on flush rather than waiting for one to appear.
pub struct UsbMidiTransmitter {
    class: MidiClass<'static, UsbDriver>,
    connection: ConnectionSpy<'static>,
    queue: ArrayVec<[u8; MAX_PACKET_SIZE]>,
}

impl UsbMidiTransmitter {
    /// Constructs a [`UsbMidiTransmitter`].
    pub fn new(class: MidiClass<'static, UsbDriver>, connection: ConnectionSpy<'static>) -> Self {
        Self {
            class,
            connection,
            queue: ArrayVec::new(),
        }
    }

    async fn write_queue(&mut self) -> Result<(), Disconnected> {
        self.class.write_packet(&self.queue).await?;
        Ok(())
    }
}

impl MidiTransmitter for UsbMidiTransmitter {
    async fn send_packet(&mut self, packet: UsbMidiPacket) {
        if self.queue.len() + UsbMidiPacket::LEN > self.queue.capacity() {
            self.flush().await;
        }
        self.queue.extend_from_slice(packet.as_bytes());
    }

    async fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let connected = self.connection.try_get().unwrap_or(false);
        if !connected {
            debug!("No USB host; dropping {} bytes of MIDI", self.queue.len());
        } else if self.write_queue().await.is_err() {
            warn!("USB host went away; dropped {} bytes of MIDI", self.queue.len());
        } else {
            trace!("Sent {=[u8]:x}", self.queue.as_slice());
        }
        self.queue.clear();
    }
}
