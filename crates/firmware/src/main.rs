//! MMC Remote is [Embassy](https://embassy.dev)-based firmware for a three-button transport remote. It runs on the
//! [Nucleo-F767ZI development board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which is powered by
//! an F7-series STM32 microcontroller, and enumerates as a class-compliant USB MIDI device.
//!
//! Clicking Play, Stop, or Record sends the corresponding [MIDI Machine
//! Control](https://en.wikipedia.org/wiki/MIDI_Machine_Control) command to the host. Double clicking Stop or Record
//! sends a Control Change instead, for hosts that map secondary transport functions to controllers. See
//! [`mmc_remote_lib::dispatch`] for the full table.
//!
//! The buttons are wired to the Zio connector (active low, internal pull-ups):
//! - Play: PF13 (D7)
//! - Stop: PE9 (D6)
//! - Record: PE11 (D5)

#![no_std]
#![no_main]

mod buttons;
mod connection;
mod transmitter;

use crate::{
    buttons::Buttons,
    connection::{CONNECTION, ConnectionHandler},
    transmitter::{MAX_PACKET_SIZE, UsbMidiTransmitter},
};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config, bind_interrupts,
    gpio::{Input, Pull},
    peripherals,
    time::Hertz,
    usb,
};
use embassy_usb::{Builder, class::midi::MidiClass};
use mmc_remote_lib::{configuration::ButtonConfig, controller::Controller};
use static_cell::StaticCell;

#[cfg(feature = "defmt-rtt")]
use defmt_rtt as _;
#[cfg(not(feature = "panic-probe"))]
use panic_halt as _;
#[cfg(feature = "panic-probe")]
use panic_probe as _;

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        OTG_FS => usb::InterruptHandler<peripherals::USB_OTG_FS>;
    }
);

type UsbDriver = usb::Driver<'static, peripherals::USB_OTG_FS>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing MMC Remote");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            // per section 5.2 of RM0410, the 48MHz clock used for USB OTG FS is derived from main PLL VCO (PLLQ clock)
            divq: Some(PllQDiv::DIV9), // 8mhz / 4 * 216 / 9 = 48Mhz
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.mux.clk48sel = mux::Clk48sel::PLL1_Q;
    }
    let p = embassy_stm32::init(config);

    let buttons = Buttons::new(
        Input::new(p.PF13, Pull::Up),
        Input::new(p.PE9, Pull::Up),
        Input::new(p.PE11, Pull::Up),
    );

    // Create the driver, from the HAL.
    static ENDPOINT_OUT_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    let mut config = embassy_stm32::usb::Config::default();

    // USB devices which are self-powered (i.e., that can stay powered on if unplugged from the host)
    // need to enable vbus_detection to comply with the USB spec. Per section 6.10 of the Nucleo board
    // manual (UM1974), CN13 (the USB port) cannot power the board; external power is necessary.
    config.vbus_detection = true;

    let driver = usb::Driver::new_fs(
        p.USB_OTG_FS,
        Irqs,
        p.PA12,
        p.PA11,
        ENDPOINT_OUT_BUFFER.init([0; 256]),
        config,
    );

    // per https://pid.codes, FOSS projects can apply to be listed under the vendor ID owned by InterBiometrics;
    // 0x0001 is its product ID reserved for testing
    let vendor_id = 0x1209;
    let product_id = 0x0001;

    let mut config = embassy_usb::Config::new(vendor_id, product_id);
    config.manufacturer = Some("Pawpaw Works");
    config.product = Some("MMC Remote");
    config.self_powered = true;
    config.max_power = 0;

    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        CONTROL_BUFFER.init([0; 64]),
    );

    static CONNECTION_HANDLER: StaticCell<ConnectionHandler> = StaticCell::new();
    builder.handler(CONNECTION_HANDLER.init(ConnectionHandler));

    let class = MidiClass::new(&mut builder, 1, 1, MAX_PACKET_SIZE as u16);
    let usb = builder.build();
    unwrap!(spawner.spawn(connection::usb_task(usb)));

    let transmitter = UsbMidiTransmitter::new(class, CONNECTION.anon_receiver());
    let controller = Controller::new(ButtonConfig::default());
    unwrap!(spawner.spawn(buttons::poll_buttons(buttons, controller, transmitter)));
}
