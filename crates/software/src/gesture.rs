//! Turns raw pushbutton levels into discrete gestures.
//!
//! Each physical button gets its own [`ButtonGestureClassifier`], which hides contact bounce and tells single clicks
//! apart from double clicks. The classifier doesn't read pins or clocks itself; it is fed one raw sample and the
//! current [`Instant`] per poll, which keeps it independent of any particular microcontroller.

mod classifier;
pub use classifier::*;

use embassy_time::Instant;

/// The transport buttons on the device, in the order they are polled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Starts playback.
    #[default]
    Play,
    /// Stops playback; double click for the secondary stop action.
    Stop,
    /// Arms recording; double click for the secondary record action.
    Record,
}

impl Button {
    /// Every button, in polling order.
    pub const ALL: [Button; 3] = [Button::Play, Button::Stop, Button::Record];
}

/// The kinds of gesture a [`ButtonGestureClassifier`] recognizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureKind {
    /// The button went down and stayed down for the debounce delay.
    #[default]
    Pressed,
    /// The button came up and stayed up for the debounce delay.
    Released,
    /// A press and release which wasn't followed by another press within the double-click window.
    Clicked,
    /// Two press/release cycles, the second beginning within the double-click window of the first.
    DoubleClicked,
}

/// A gesture performed on a particular [`Button`] at a particular [`Instant`].
///
/// Events are consumed in the same poll that produced them and are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureEvent {
    /// The button on which the gesture was performed.
    pub button: Button,
    /// What was done.
    pub kind: GestureKind,
    /// When the gesture was recognized.
    pub timestamp: Instant,
}

// required by tinyvec
impl Default for GestureEvent {
    fn default() -> Self {
        Self {
            button: Button::default(),
            kind: GestureKind::default(),
            timestamp: Instant::from_ticks(0),
        }
    }
}
