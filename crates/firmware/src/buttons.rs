//! Reads the transport buttons and drives the [`Controller`].

use crate::transmitter::UsbMidiTransmitter;
use embassy_stm32::gpio::Input;
use embassy_time::{Duration, Ticker};
use mmc_remote_lib::{Instant, controller::Controller, gesture::Button};

/// How often every button is sampled.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The three transport buttons. Each is wired between its pin and ground, with the pin pulled up, so a held
/// button reads low.
pub struct Buttons {
    play: Input<'static>,
    stop: Input<'static>,
    record: Input<'static>,
}

impl Buttons {
    pub fn new(play: Input<'static>, stop: Input<'static>, record: Input<'static>) -> Self {
        Self { play, stop, record }
    }

    fn is_held(&self, button: Button) -> bool {
        match button {
            Button::Play => self.play.is_low(),
            Button::Stop => self.stop.is_low(),
            Button::Record => self.record.is_low(),
        }
    }
}

/// Cooperative polling loop: samples each button once per [`POLL_INTERVAL`] and sends whatever MIDI results.
#[embassy_executor::task]
pub async fn poll_buttons(
    buttons: Buttons,
    mut controller: Controller,
    mut transmitter: UsbMidiTransmitter,
) -> ! {
    let mut ticker = Ticker::every(POLL_INTERVAL);
    loop {
        controller
            .tick(
                Instant::now(),
                |button| buttons.is_held(button),
                &mut transmitter,
            )
            .await;
        ticker.next().await;
    }
}
