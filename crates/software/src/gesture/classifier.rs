use super::{Button, GestureEvent, GestureKind};
use crate::configuration::{ButtonConfig, Feature};
use embassy_time::Instant;
use tinyvec::{ArrayVec, ArrayVecIterator};

/// The most events a single [`ButtonGestureClassifier::tick`] can yield: a click whose window expires in the same
/// tick a new press is confirmed, or a release which completes a double click.
const MAX_EVENTS_PER_TICK: usize = 2;

/// The events produced by one [`ButtonGestureClassifier::tick`], in the order they occurred.
pub type GestureEvents = ArrayVecIterator<[GestureEvent; MAX_EVENTS_PER_TICK]>;

/// A completed press/release cycle which may yet turn out to be the first half of a double click.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PendingClick {
    released_at: Instant,
    /// Whether [`GestureKind::Clicked`] went out at release time rather than waiting for the window to close.
    reported: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Phase {
    Released,
    ConfirmingPress {
        since: Instant,
        pending: Option<PendingClick>,
    },
    /// `second` is set when this press began inside the double-click window of the previous click.
    Pressed {
        second: bool,
    },
    ConfirmingRelease {
        since: Instant,
        second: bool,
    },
    ClickPending(PendingClick),
}

/// A state machine which classifies the raw level of one pushbutton into [`GestureEvent`]s.
///
/// A change in level is only believed once it has held for the debounce delay; flicker shorter than that produces
/// nothing. After a confirmed release the classifier waits out the double-click window. If a second press is
/// confirmed inside the window, its release yields [`GestureKind::DoubleClicked`] and the pending click is dropped;
/// otherwise [`GestureKind::Clicked`] is yielded once the window closes. [`GestureKind::Pressed`] and
/// [`GestureKind::Released`] are yielded for every confirmed edge regardless.
///
/// Clicks are only ever classified on a confirmed release or when the window closes on a released button, so a
/// button held down never produces repeated clicks.
#[derive(Clone, Debug)]
pub struct ButtonGestureClassifier {
    button: Button,
    config: ButtonConfig,
    phase: Phase,
}

impl ButtonGestureClassifier {
    /// Constructs a [`ButtonGestureClassifier`] for a button which is initially released.
    pub fn new(button: Button, config: ButtonConfig) -> Self {
        Self {
            button,
            config,
            phase: Phase::Released,
        }
    }

    /// Getter.
    pub fn button(&self) -> Button {
        self.button
    }

    /// Advances the state machine given the button's raw level (`true` when held down) sampled at `now`.
    ///
    /// `now` must never go backwards between calls.
    pub fn tick(&mut self, active: bool, now: Instant) -> GestureEvents {
        let debounce_delay = self.config.debounce_delay();
        let double_click_delay = self.config.double_click_delay();
        let double_click = self.config.is_enabled(Feature::DoubleClick);
        let delay_click = self.config.is_enabled(Feature::SuppressClickBeforeDoubleClick);

        let mut events = ArrayVec::<[GestureEvent; MAX_EVENTS_PER_TICK]>::new();
        let mut emit = |kind| {
            events.push(GestureEvent {
                button: self.button,
                kind,
                timestamp: now,
            })
        };
        let mut settle = |pending: Option<PendingClick>| match pending {
            Some(click) if now.saturating_duration_since(click.released_at) >= double_click_delay => {
                if !click.reported {
                    emit(GestureKind::Clicked);
                }
                None
            }
            pending => pending,
        };

        self.phase = match self.phase {
            Phase::Released if active => Phase::ConfirmingPress {
                since: now,
                pending: None,
            },
            Phase::Released => Phase::Released,
            Phase::ClickPending(click) => match (settle(Some(click)), active) {
                (pending, true) => Phase::ConfirmingPress { since: now, pending },
                (Some(click), false) => Phase::ClickPending(click),
                (None, false) => Phase::Released,
            },
            Phase::ConfirmingPress { since, pending } => {
                let pending = settle(pending);
                if !active {
                    // bounce
                    pending.map_or(Phase::Released, Phase::ClickPending)
                } else if now.saturating_duration_since(since) >= debounce_delay {
                    emit(GestureKind::Pressed);
                    Phase::Pressed {
                        second: pending.is_some(),
                    }
                } else {
                    Phase::ConfirmingPress { since, pending }
                }
            }
            Phase::Pressed { second } if !active => Phase::ConfirmingRelease { since: now, second },
            Phase::Pressed { second } => Phase::Pressed { second },
            Phase::ConfirmingRelease { second, .. } if active => Phase::Pressed { second },
            Phase::ConfirmingRelease { since, second } => {
                if now.saturating_duration_since(since) < debounce_delay {
                    Phase::ConfirmingRelease { since, second }
                } else {
                    emit(GestureKind::Released);
                    if second {
                        emit(GestureKind::DoubleClicked);
                        Phase::Released
                    } else if !double_click {
                        emit(GestureKind::Clicked);
                        Phase::Released
                    } else {
                        if !delay_click {
                            emit(GestureKind::Clicked);
                        }
                        Phase::ClickPending(PendingClick {
                            released_at: now,
                            reported: !delay_click,
                        })
                    }
                }
            }
        };

        events.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Duration;

    /// Feeds a classifier one sample per millisecond, collecting everything it yields.
    struct Harness {
        classifier: ButtonGestureClassifier,
        now_ms: u64,
        events: ArrayVec<[GestureEvent; 32]>,
    }

    impl Harness {
        fn new(config: ButtonConfig) -> Self {
            Self {
                classifier: ButtonGestureClassifier::new(Button::Stop, config),
                now_ms: 0,
                events: ArrayVec::new(),
            }
        }

        /// Holds the raw level steady for the given number of milliseconds.
        fn hold(&mut self, active: bool, ms: u64) -> &mut Self {
            for _ in 0..ms {
                let now = Instant::from_millis(self.now_ms);
                self.events.extend(self.classifier.tick(active, now));
                self.now_ms += 1;
            }
            self
        }

        /// Flickers the raw level, spending `ms` milliseconds at each level.
        fn bounce(&mut self, times: usize, ms: u64) -> &mut Self {
            for _ in 0..times {
                self.hold(true, ms).hold(false, ms);
            }
            self
        }

        fn kinds(&self) -> ArrayVec<[GestureKind; 32]> {
            self.events.iter().map(|event| event.kind).collect()
        }

        fn count(&self, kind: GestureKind) -> usize {
            self.events.iter().filter(|event| event.kind == kind).count()
        }
    }

    use GestureKind::*;

    #[test]
    fn single_click() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(false, 10).hold(true, 100).hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );

        // press starts at 10 and is confirmed 20 ms later; release starts at 110, likewise
        let timestamps: ArrayVec<[u64; 3]> = h
            .events
            .iter()
            .map(|event| event.timestamp.as_millis())
            .collect();
        assert_eq!(
            &[30, 130, 530],
            timestamps.as_slice(),
            "Expected left but got right"
        );
        assert!(h.events.iter().all(|event| event.button == Button::Stop));
    }

    #[test]
    fn double_click() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50)
            .hold(false, 100)
            .hold(true, 50)
            .hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Pressed, Released, DoubleClicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(0, h.count(Clicked), "A double click must never also click");
    }

    #[test]
    fn clicks_separated_by_more_than_the_window_are_independent() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50)
            .hold(false, 600)
            .hold(true, 50)
            .hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Clicked, Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(0, h.count(DoubleClicked));
    }

    #[test]
    fn third_press_starts_a_new_gesture() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50)
            .hold(false, 100)
            .hold(true, 50)
            .hold(false, 100)
            .hold(true, 50)
            .hold(false, 600);

        assert_eq!(1, h.count(DoubleClicked), "Expected one double click");
        assert_eq!(1, h.count(Clicked), "Expected the third press to click");
    }

    #[test]
    fn bounce_shorter_than_debounce_is_ignored() {
        let mut h = Harness::new(ButtonConfig::default());
        h.bounce(10, 5).hold(false, 600);
        assert!(h.events.is_empty(), "Bounce should produce no events");
    }

    #[test]
    fn release_bounce_is_ignored_while_held() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50);
        for _ in 0..10 {
            h.hold(false, 5).hold(true, 5);
        }
        h.hold(true, 50);

        assert_eq!(
            &[Pressed],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn bouncy_press_is_confirmed_once_stable() {
        let mut h = Harness::new(ButtonConfig::default());
        h.bounce(3, 3).hold(true, 50).bounce(3, 3).hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn bounce_during_second_press_keeps_the_click_pending() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50).hold(false, 100).bounce(5, 5).hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn held_button_is_not_classified_until_released() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 2_000);
        assert_eq!(
            &[Pressed],
            h.kinds().as_slice(),
            "Expected left but got right"
        );

        h.hold(false, 600);
        assert_eq!(
            &[Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn second_press_held_past_the_window_still_double_clicks() {
        let mut h = Harness::new(ButtonConfig::default());
        h.hold(true, 50)
            .hold(false, 100)
            .hold(true, 1_000)
            .hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Pressed, Released, DoubleClicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn second_press_confirmed_after_the_window_is_a_new_gesture() {
        let mut h = Harness::new(ButtonConfig::default());
        // release is confirmed at 70, so the window closes at 470; the second press starts at 460 and is only
        // confirmed at 480
        h.hold(true, 50).hold(false, 410).hold(true, 50);

        assert_eq!(
            &[Pressed, Released, Clicked, Pressed],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(470, h.events[2].timestamp.as_millis());
        assert_eq!(480, h.events[3].timestamp.as_millis());
    }

    #[test]
    fn second_press_confirmed_as_the_window_closes_is_a_new_gesture() {
        let mut h = Harness::new(ButtonConfig::default());
        // release is confirmed at 70; the second press starts at 450 and is confirmed at 470, exactly 400 ms later
        h.hold(true, 50).hold(false, 400).hold(true, 50).hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Clicked, Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(470, h.events[2].timestamp.as_millis());
        assert_eq!(470, h.events[3].timestamp.as_millis());
        assert_eq!(0, h.count(DoubleClicked));
    }

    #[test]
    fn second_press_confirmed_just_inside_the_window_double_clicks() {
        let mut h = Harness::new(ButtonConfig::default());
        // release is confirmed at 70; the second press starts at 449 and is confirmed at 469, 399 ms later
        h.hold(true, 50).hold(false, 399).hold(true, 50).hold(false, 600);

        assert_eq!(
            &[Pressed, Released, Pressed, Released, DoubleClicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(469, h.events[2].timestamp.as_millis());
        assert_eq!(0, h.count(Clicked));
    }

    #[test]
    fn clicked_is_immediate_without_suppression() {
        let config = ButtonConfig::default().with_features(Feature::DoubleClick);
        let mut h = Harness::new(config);
        h.hold(true, 50).hold(false, 30);
        assert_eq!(
            &[Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );

        // second cycle inside the window still double clicks, and the window closing adds nothing
        h.hold(true, 50).hold(false, 600);
        assert_eq!(
            &[Pressed, Released, Clicked, Pressed, Released, DoubleClicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn double_click_disabled() {
        let config = ButtonConfig::default().with_features(Feature::none());
        let mut h = Harness::new(config);
        h.hold(true, 50)
            .hold(false, 100)
            .hold(true, 50)
            .hold(false, 100);

        assert_eq!(
            &[Pressed, Released, Clicked, Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn custom_timing() {
        let config = ButtonConfig::default()
            .with_debounce_delay(Duration::from_millis(5))
            .with_double_click_delay(Duration::from_millis(100));
        let mut h = Harness::new(config);
        h.hold(true, 10).hold(false, 150).hold(true, 10).hold(false, 150);

        assert_eq!(
            &[Pressed, Released, Clicked, Pressed, Released, Clicked],
            h.kinds().as_slice(),
            "Expected left but got right"
        );
        assert_eq!(5, h.events[0].timestamp.as_millis());
    }
}
