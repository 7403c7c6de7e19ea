//! Maps gestures to the MIDI the device sends in response.
//!
//! | Button | Gesture                     | Action                    |
//! |--------|-----------------------------|---------------------------|
//! | Play   | `Clicked` or `Released`     | MMC Play                  |
//! | Stop   | `Clicked` or `Released`     | MMC Stop                  |
//! | Stop   | `DoubleClicked`             | CC 17 = 127 on channel 1  |
//! | Record | `Clicked` or `Released`     | MMC Record Strobe         |
//! | Record | `DoubleClicked`             | CC 18 = 127 on channel 1  |
//!
//! Channel numbers are the zero-based value carried on the wire (status byte `0xB1`), which most hosts display as
//! channel 2.
//!
//! Since a click is always preceded by a release, a single click sends its MMC command twice: once on release and
//! again when the double-click window closes.

use crate::{
    gesture::{Button, GestureEvent, GestureKind},
    mmc::MmcCommand,
    transmitter::{ControlChange, MidiTransmitter},
};
use wmidi::{Channel, ControlFunction, U7};

/// Sent when the Stop button is double clicked.
pub const STOP_DOUBLE_CLICK: ControlChange = ControlChange {
    channel: Channel::Ch2,
    function: ControlFunction(U7::from_u8_lossy(17)),
    value: U7::from_u8_lossy(127),
};

/// Sent when the Record button is double clicked.
pub const RECORD_DOUBLE_CLICK: ControlChange = ControlChange {
    channel: Channel::Ch2,
    function: ControlFunction(U7::from_u8_lossy(18)),
    value: U7::from_u8_lossy(127),
};

/// Something the device sends in response to a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Send an MMC transport command.
    Mmc(MmcCommand),
    /// Send a Control Change message.
    ControlChange(ControlChange),
}

impl Action {
    /// Looks up the action for a gesture, if there is one.
    pub fn for_event(button: Button, kind: GestureKind) -> Option<Self> {
        use GestureKind::*;

        match (button, kind) {
            (Button::Play, Clicked | Released) => Some(Self::Mmc(MmcCommand::Play)),
            (Button::Stop, Clicked | Released) => Some(Self::Mmc(MmcCommand::Stop)),
            (Button::Stop, DoubleClicked) => Some(Self::ControlChange(STOP_DOUBLE_CLICK)),
            (Button::Record, Clicked | Released) => Some(Self::Mmc(MmcCommand::RecordStrobe)),
            (Button::Record, DoubleClicked) => Some(Self::ControlChange(RECORD_DOUBLE_CLICK)),
            (_, Pressed) | (Button::Play, DoubleClicked) => None,
        }
    }

    /// Sends the MIDI for this action, flushing before returning.
    pub async fn perform<T: MidiTransmitter>(self, transmitter: &mut T) {
        match self {
            Self::Mmc(command) => transmitter.send_sysex(command.message()).await,
            Self::ControlChange(cc) => transmitter.send_control_change(cc).await,
        }
        transmitter.flush().await;
    }
}

/// Performs the action associated with a gesture, if any, and returns it.
pub async fn dispatch<T: MidiTransmitter>(
    event: GestureEvent,
    transmitter: &mut T,
) -> Option<Action> {
    let action = Action::for_event(event.button, event.kind)?;
    #[cfg(feature = "defmt")]
    defmt::debug!("{} {} -> {}", event.button, event.kind, action);
    action.perform(transmitter).await;
    Some(action)
}
