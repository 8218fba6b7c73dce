//! Device Adapter
//!
//! Generic network-device surface over one shared CC112x: send, receive,
//! option get/set, deferred event delivery and initialization. Option values
//! travel as raw bytes, multi-byte integers little endian.

use embedded_hal::delay::DelayNs;

use crate::config::PACKET_LENGTH;
use crate::drivers::cc112x::Register;
use crate::error::{Error, Result};
use crate::hal::gpio::IrqControl;
use crate::hal::spi::RadioBus;
use crate::radio::frame::Frame;
use crate::radio::shared::SharedRadio;
use crate::radio::state::RadioEvent;
use crate::types::{Channel, NodeAddress, PowerState};

/// Options reachable through `get`/`set`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetOpt {
    /// Device family, `u16` (get only)
    DeviceType,
    /// Protocol carried above the link, one byte (get only)
    Proto,
    /// Radio channel, `u16` on get, one or two bytes on set
    Channel,
    /// Node address, one byte
    Address,
    /// Largest frame the hardware moves, one byte (get only)
    MaxPacketSize,
    /// 8-byte interface identifier derived from the address (get only)
    InterfaceId,
    /// Power mode, one byte (see [`PowerState::as_u8`])
    State,
}

#[cfg(feature = "embedded")]
impl defmt::Format for NetOpt {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DeviceType => defmt::write!(f, "DeviceType"),
            Self::Proto => defmt::write!(f, "Proto"),
            Self::Channel => defmt::write!(f, "Channel"),
            Self::Address => defmt::write!(f, "Address"),
            Self::MaxPacketSize => defmt::write!(f, "MaxPacketSize"),
            Self::InterfaceId => defmt::write!(f, "InterfaceId"),
            Self::State => defmt::write!(f, "State"),
        }
    }
}

/// Device families known to the network stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum DeviceType {
    /// Unknown device
    Unknown = 0,
    /// Raw link without framing
    Raw = 1,
    /// Ethernet
    Ethernet = 2,
    /// IEEE 802.15.4
    Ieee802154 = 3,
    /// CC110x-style sub-GHz framing, shared by the CC112x
    Cc110x = 4,
}

/// Protocol tag reported for the interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Proto {
    /// No protocol bound
    Undefined = 0,
    /// 6LoWPAN
    SixLowpan = 1,
}

impl Proto {
    /// Tag selected at build time
    #[must_use]
    pub const fn configured() -> Self {
        if cfg!(feature = "sixlowpan") {
            Self::SixLowpan
        } else {
            Self::Undefined
        }
    }
}

/// Operation set a network stack drives a link device through
pub trait NetDevice {
    /// Bring the device up
    fn init(&mut self) -> Result<()>;

    /// Send one wire frame, returns bytes accepted by the hardware
    fn send(&mut self, frame: &[u8]) -> Result<usize>;

    /// Copy the buffered frame into `buf`, returns bytes copied
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Read an option into `value`, returns bytes written
    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize>;

    /// Write an option from `value`, returns bytes consumed
    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize>;

    /// Deliver queued device events; call from task context
    fn isr(&mut self);
}

/// Network-device adapter for a shared CC112x
pub struct Netdev<'a, B, I, D, F> {
    radio: &'a SharedRadio<B, I>,
    config: &'a [(Register, u8)],
    delay: D,
    on_event: F,
}

impl<'a, B, I, D, F> Netdev<'a, B, I, D, F>
where
    B: RadioBus,
    I: IrqControl,
    D: DelayNs,
    F: FnMut(RadioEvent),
{
    /// Bind the adapter to a device
    ///
    /// `config` is the board register table written on `init`; `on_event`
    /// receives every event drained by `isr`.
    pub fn new(radio: &'a SharedRadio<B, I>, config: &'a [(Register, u8)], delay: D, on_event: F) -> Self {
        Self {
            radio,
            config,
            delay,
            on_event,
        }
    }

    /// Underlying shared device
    #[must_use]
    pub fn radio(&self) -> &'a SharedRadio<B, I> {
        self.radio
    }
}

impl<B, I, D, F> NetDevice for Netdev<'_, B, I, D, F>
where
    B: RadioBus,
    I: IrqControl,
    D: DelayNs,
    F: FnMut(RadioEvent),
{
    fn init(&mut self) -> Result<()> {
        let config = self.config;
        let delay = &mut self.delay;
        self.radio.lock(|r| r.init(config, delay))
    }

    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        let mut frame = Frame::from_bytes(frame)?;
        debug!(
            "netdev send: size={} dst={} flags=0x{:02X}",
            frame.wire_len(),
            frame.address(),
            frame.flags()
        );
        self.radio.send(&mut frame, &mut self.delay)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.radio.lock(|r| r.receive(buf))
    }

    fn get(&self, opt: NetOpt, value: &mut [u8]) -> Result<usize> {
        let (address, channel, power) = self
            .radio
            .lock(|r| (r.address(), r.channel(), r.power_state()));

        match opt {
            NetOpt::DeviceType => put(value, &(DeviceType::Cc110x as u16).to_le_bytes()),
            NetOpt::Proto => put(value, &[Proto::configured() as u8]),
            NetOpt::Channel => put(value, &u16::from(channel.number()).to_le_bytes()),
            NetOpt::Address => put(value, &[address.as_u8()]),
            NetOpt::MaxPacketSize => put(value, &[PACKET_LENGTH as u8]),
            NetOpt::InterfaceId => put(value, &address.interface_id()),
            NetOpt::State => put(value, &[power.as_u8()]),
        }
    }

    fn set(&mut self, opt: NetOpt, value: &[u8]) -> Result<usize> {
        match opt {
            NetOpt::Channel => {
                let number = match *value {
                    [n] => u16::from(n),
                    [lo, hi] => u16::from_le_bytes([lo, hi]),
                    _ => return Err(Error::InvalidArgument),
                };
                let channel = u8::try_from(number)
                    .ok()
                    .and_then(Channel::new)
                    .ok_or(Error::InvalidArgument)?;
                self.radio.lock(|r| r.set_channel(channel))?;
                Ok(value.len())
            }
            NetOpt::Address => {
                let address = value
                    .first()
                    .copied()
                    .and_then(NodeAddress::new)
                    .ok_or(Error::InvalidArgument)?;
                self.radio.lock(|r| r.set_address(address))?;
                Ok(1)
            }
            NetOpt::State => {
                let power = value
                    .first()
                    .copied()
                    .and_then(PowerState::from_u8)
                    .ok_or(Error::InvalidArgument)?;
                self.radio.lock(|r| r.set_power(power))?;
                Ok(1)
            }
            _ => {
                debug!("set: option {} not supported", opt);
                Err(Error::NotSupported)
            }
        }
    }

    fn isr(&mut self) {
        while let Some(event) = self.radio.take_event() {
            trace!("delivering {}", event);
            (self.on_event)(event);
        }
    }
}

/// Copy an option value into the caller's buffer
fn put(value: &mut [u8], bytes: &[u8]) -> Result<usize> {
    let target = value.get_mut(..bytes.len()).ok_or(Error::Overflow)?;
    target.copy_from_slice(bytes);
    Ok(bytes.len())
}
