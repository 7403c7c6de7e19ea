//! Settings which determine how raw pushbutton input is classified into gestures.

use bitmask_enum::bitmask;
use embassy_time::Duration;

/// Optional behaviors of the [`ButtonGestureClassifier`](crate::gesture::ButtonGestureClassifier).
#[bitmask(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feature {
    /// Recognize two clicks in quick succession as a single double click.
    DoubleClick,
    /// Hold back a click until the double-click window closes, so that a click is never reported only to turn out
    /// to be the first half of a double click. Has no effect unless [`Feature::DoubleClick`] is also set.
    SuppressClickBeforeDoubleClick,
}

/// Timing and feature configuration shared by every pushbutton.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    debounce_delay: Duration,
    double_click_delay: Duration,
    features: Feature,
}

impl ButtonConfig {
    /// How long a raw level must hold steady before a press or release is believed.
    pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(20);
    /// How long after a release a second press still counts toward a double click.
    pub const DEFAULT_DOUBLE_CLICK_DELAY: Duration = Duration::from_millis(400);

    /// Getter.
    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    /// Getter.
    pub fn double_click_delay(&self) -> Duration {
        self.double_click_delay
    }

    /// Returns `true` if the given [`Feature`] (or every one of a set of them) is enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    /// Returns a copy with a different debounce delay.
    pub fn with_debounce_delay(self, debounce_delay: Duration) -> Self {
        Self {
            debounce_delay,
            ..self
        }
    }

    /// Returns a copy with a different double-click window.
    pub fn with_double_click_delay(self, double_click_delay: Duration) -> Self {
        Self {
            double_click_delay,
            ..self
        }
    }

    /// Returns a copy with exactly the given features enabled.
    pub fn with_features(self, features: Feature) -> Self {
        Self { features, ..self }
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Self::DEFAULT_DEBOUNCE_DELAY,
            double_click_delay: Self::DEFAULT_DOUBLE_CLICK_DELAY,
            features: Feature::DoubleClick | Feature::SuppressClickBeforeDoubleClick,
        }
    }
}
