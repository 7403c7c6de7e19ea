//! Ties the buttons, their classifiers, and the outgoing MIDI together.

use crate::{
    configuration::ButtonConfig,
    dispatch::dispatch,
    gesture::{Button, ButtonGestureClassifier},
    transmitter::MidiTransmitter,
};
use embassy_time::Instant;

/// Owns one [`ButtonGestureClassifier`] per [`Button`] and routes what they recognize to a [`MidiTransmitter`].
///
/// Constructed once at startup and driven by calling [`tick`](Self::tick) from a polling loop.
#[derive(Clone, Debug)]
pub struct Controller {
    classifiers: [ButtonGestureClassifier; 3],
}

impl Controller {
    /// Constructs a [`Controller`] whose buttons all share the given configuration.
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            classifiers: Button::ALL.map(|button| ButtonGestureClassifier::new(button, config)),
        }
    }

    /// Runs one iteration of the polling loop.
    ///
    /// Each button is sampled exactly once, in [`Button::ALL`] order, via `sample` (which returns `true` when the
    /// button is held down). Every gesture recognized for a button is dispatched, and its MIDI flushed, before the
    /// next button is sampled. `now` should be read once per iteration.
    pub async fn tick<T: MidiTransmitter>(
        &mut self,
        now: Instant,
        mut sample: impl FnMut(Button) -> bool,
        transmitter: &mut T,
    ) {
        for classifier in self.classifiers.iter_mut() {
            let active = sample(classifier.button());
            for event in classifier.tick(active, now) {
                dispatch(event, transmitter).await;
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ButtonConfig::default())
    }
}
