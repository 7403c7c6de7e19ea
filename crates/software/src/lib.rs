//! This crate contains architecture-agnostic logic for the MMC Remote, a device with three pushbuttons (Play, Stop,
//! and Record) which sends [MIDI Machine Control](https://en.wikipedia.org/wiki/MIDI_Machine_Control) transport
//! commands to a computer over [USB MIDI](https://www.usb.org/sites/default/files/midi10.pdf).
//!
//! Two pieces carry the interesting logic: the [`gesture`] module turns noisy pushbutton input into discrete gestures
//! (presses, releases, clicks, and double clicks), and the [`usb_midi`] module packs MIDI messages, including System
//! Exclusive messages of arbitrary length, into USB-MIDI Event Packets. Everything else is plumbing between the two.

#![deny(missing_docs)]
#![no_std]

pub mod configuration;
pub mod controller;
pub mod dispatch;
pub mod gesture;
pub mod mmc;
pub mod transmitter;
pub mod usb_midi;

/// Re-exported so the firmware and this crate agree on a single clock.
pub use embassy_time::{Duration, Instant};
