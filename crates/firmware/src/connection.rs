//! Tracks whether a USB host is listening, so that button handling never waits on an absent one.

use crate::UsbDriver;
use defmt::info;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{AnonReceiver, Watch},
};
use embassy_usb::{Handler, UsbDevice};

const CONNECTION_RECEIVER_CNT: usize = 0;
/// Holds `true` while the device is configured by a host.
pub static CONNECTION: Watch<CriticalSectionRawMutex, bool, CONNECTION_RECEIVER_CNT> =
    Watch::new_with(false);
pub type ConnectionSpy<'a> =
    AnonReceiver<'a, CriticalSectionRawMutex, bool, CONNECTION_RECEIVER_CNT>;

/// Publishes changes in USB device state to [`CONNECTION`].
pub struct ConnectionHandler;

impl Handler for ConnectionHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            CONNECTION.sender().send(false);
        }
    }

    fn reset(&mut self) {
        CONNECTION.sender().send(false);
    }

    fn configured(&mut self, configured: bool) {
        if configured {
            info!("USB connected");
        } else {
            info!("USB disconnected");
        }
        CONNECTION.sender().send(configured);
    }
}

#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}
