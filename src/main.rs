//! CC112x Radio Node Main Application
//!
//! Entry point for an STM32G474 board carrying a CC112x module.
//! Brings up the radio, forwards event-line edges to the driver, and
//! exchanges beacon frames on the default channel.

#![no_std]
#![no_main]

use core::cell::Cell;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level as PinLevel, Output, Pull, Speed};
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Delay};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cc112x_radio::prelude::*;

type Bus = SpiRadioBus<Spi<'static, Blocking>, Output<'static>>;
type Radio = SharedRadio<Bus, SoftGate>;

static RADIO: StaticCell<Radio> = StaticCell::new();

/// Raised by the event-line task whenever the driver handled an edge
static RADIO_EVENT: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Board register table, exported from SmartRF Studio
/// (868 MHz band, 38.4 kbps 2-GFSK, variable length, CRC on)
const CC112X_CONFIG: &[(Register, u8)] = &[
    (Register::new(0x0000), 0xB0), // IOCFG3
    (reg::IOCFG2, 0x06),           // PKT_SYNC_RXTX
    (Register::new(0x0002), 0xB0), // IOCFG1
    (Register::new(0x0003), 0x40), // IOCFG0
    (Register::new(0x0008), 0x0B), // SYNC_CFG1
    (Register::new(0x000A), 0x48), // DEVIATION_M
    (Register::new(0x000B), 0x05), // MODCFG_DEV_E
    (Register::new(0x000C), 0x1C), // DCFILT_CFG
    (Register::new(0x000D), 0x18), // PREAMBLE_CFG1
    (Register::new(0x000F), 0xC6), // IQIC
    (Register::new(0x0010), 0x08), // CHAN_BW
    (Register::new(0x0012), 0x05), // MDMCFG0
    (Register::new(0x0017), 0x20), // AGC_REF
    (Register::new(0x0018), 0x19), // AGC_CS_THR
    (Register::new(0x001C), 0xA9), // AGC_CFG1
    (Register::new(0x001D), 0xCF), // AGC_CFG0
    (Register::new(0x001E), 0x00), // FIFO_CFG
    (Register::new(0x0020), 0x03), // SETTLING_CFG
    (Register::new(0x0021), 0x12), // FS_CFG
    (Register::new(0x0027), 0x04), // PKT_CFG1: CRC on, no status append
    (Register::new(0x0028), 0x20), // PKT_CFG0: variable length
    (Register::new(0x002D), 0x7E), // PA_CFG0
    (Register::new(0x002E), 0xFF), // PKT_LEN
];

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("CC112x Radio Node v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = Output::new(p.PA5, PinLevel::Low, Speed::Low);

    // Release the chip from hardware reset and keep it released
    let _reset = Output::new(p.PC8, PinLevel::High, Speed::Low);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(SPI_FREQ_HZ);
    let spi = Spi::new_blocking(p.SPI2, p.PB13, p.PB15, p.PB14, spi_config);
    let cs = Output::new(p.PB12, PinLevel::High, Speed::VeryHigh);

    info!("SPI2 initialized at {} Hz", SPI_FREQ_HZ);

    let device = Cc112x::new(
        SpiRadioBus::new(spi, cs),
        SoftGate::new(),
        NodeAddress::default(),
        Channel::default(),
    );
    let radio: &'static Radio = RADIO.init(SharedRadio::new(device));

    let event_line = ExtiInput::new(p.PC6, p.EXTI6, Pull::Down);

    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(event_line_task(radio, event_line)).unwrap();

    let rx_ready = Cell::new(false);
    let mut netdev = Netdev::new(radio, CC112X_CONFIG, Delay, |event| {
        if event == RadioEvent::RxComplete {
            rx_ready.set(true);
        }
    });

    if let Err(e) = netdev.init() {
        defmt::error!("radio init failed: {}", e);
    }

    let mut iid = [0u8; 8];
    if netdev.get(NetOpt::InterfaceId, &mut iid).is_ok() {
        info!("interface id {:02X}", iid);
    }

    info!("Tasks spawned, entering main loop");

    let mut sequence: u8 = 0;
    let mut rx_buf = [0u8; FRAME_BUFFER_LEN];
    loop {
        if with_timeout(Duration::from_secs(10), RADIO_EVENT.wait())
            .await
            .is_ok()
        {
            netdev.isr();
            if rx_ready.replace(false) {
                match netdev.recv(&mut rx_buf).map(|len| Frame::from_bytes(&rx_buf[..len])) {
                    Ok(Ok(frame)) => info!(
                        "rx {} from {}, {}",
                        frame.data(),
                        frame.phy_src(),
                        radio.lock(|r| r.rx_metadata())
                    ),
                    Ok(Err(_)) => {}
                    Err(e) => warn!("recv failed: {}", e),
                }
            }
            continue;
        }

        // Quiet for a while: beacon
        match Frame::new(BROADCAST_ADDRESS, sequence & 0x01, b"beacon") {
            Ok(mut frame) => match radio.send_async(&mut frame, &mut Delay).await {
                Ok(sent) => info!("beacon {} sent ({} bytes)", sequence, sent),
                Err(Error::Fault) => {
                    warn!("radio faulted, recovering");
                    if let Err(e) = radio.lock(Cc112x::recover) {
                        defmt::error!("recovery failed: {}", e);
                    }
                }
                Err(e) => warn!("beacon failed: {}", e),
            },
            Err(e) => warn!("beacon frame: {}", e),
        }
        sequence = sequence.wrapping_add(1);
        info!("{}", radio.lock(|r| r.stats()));
    }
}

/// Event-line task - samples GPIO2 on every edge and runs the driver handler
#[embassy_executor::task]
async fn event_line_task(radio: &'static Radio, mut line: ExtiInput<'static>) {
    loop {
        line.wait_for_any_edge().await;
        let level = Level::from(line.is_high());
        if radio.on_interrupt(level).is_some() {
            RADIO_EVENT.signal(());
        }
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
