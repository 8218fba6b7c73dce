//! Device Context
//!
//! One [`Cc112x`] owns one transceiver: its bus, its event-line mask, the
//! radio state, both packet slots and the traffic counters. Task-side calls
//! and the interrupt handler both go through it; [`super::shared::SharedRadio`]
//! provides the locking between the two.

use embedded_hal::delay::DelayNs;
use heapless::Deque;

use crate::config::{EVENT_QUEUE_DEPTH, RESET_WAIT_US};
use crate::drivers::cc112x::{freq_word, reg, Register, Strobe};
use crate::error::{Error, Result};
use crate::hal::gpio::{IrqControl, IrqGuard, Level};
use crate::hal::spi::RadioBus;
use crate::radio::buffer::PacketBuffer;
use crate::radio::frame::Frame;
use crate::radio::receive::{self, RxOutcome};
use crate::radio::state::{self, IrqAction, RadioEvent, RadioState};
use crate::radio::transmit;
use crate::types::{Channel, NodeAddress, PowerState, RxMetadata, Statistics};

/// CC112x device context
pub struct Cc112x<B, I> {
    bus: B,
    irq: I,
    state: RadioState,
    address: NodeAddress,
    channel: Channel,
    buffer: PacketBuffer,
    stats: Statistics,
    events: Deque<RadioEvent, EVENT_QUEUE_DEPTH>,
}

impl<B, I> Cc112x<B, I>
where
    B: RadioBus,
    I: IrqControl,
{
    /// Attach to a transceiver; nothing is sent to the chip until `init`
    pub fn new(bus: B, irq: I, address: NodeAddress, channel: Channel) -> Self {
        Self {
            bus,
            irq,
            state: RadioState::Unknown,
            address,
            channel,
            buffer: PacketBuffer::new(),
            stats: Statistics::default(),
            events: Deque::new(),
        }
    }

    /// Reset the chip, load the register table and arm the receiver
    ///
    /// Valid from any state; clears a previous fault.
    pub fn init<D: DelayNs>(&mut self, config: &[(Register, u8)], delay: &mut D) -> Result<()> {
        debug!("init: {} config registers", config.len());
        self.irq.disable();
        self.bus.strobe(Strobe::Sres)?;
        delay.delay_us(RESET_WAIT_US);

        for &(register, value) in config {
            self.bus.write_reg(register, value)?;
        }
        self.bus.write_reg(reg::DEV_ADDR, self.address.as_u8())?;
        self.bus.write_burst(reg::FREQ2, &freq_word(self.channel))?;

        self.events.clear();
        self.switch_to_rx()?;
        info!("radio up: {} on {}", self.address.as_u8(), self.channel.number());
        Ok(())
    }

    /// Current radio state
    #[must_use]
    pub const fn state(&self) -> RadioState {
        self.state
    }

    /// Node address stamped on outgoing frames
    #[must_use]
    pub const fn address(&self) -> NodeAddress {
        self.address
    }

    /// Current channel
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Traffic counters
    #[must_use]
    pub const fn stats(&self) -> Statistics {
        self.stats
    }

    /// Packet slots
    #[must_use]
    pub const fn buffer(&self) -> &PacketBuffer {
        &self.buffer
    }

    /// Metadata of the frame in the receive slot
    #[must_use]
    pub const fn rx_metadata(&self) -> RxMetadata {
        self.buffer.rx_meta()
    }

    /// Power mode implied by the current state
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        match self.state {
            RadioState::Unknown | RadioState::PowerDown => PowerState::Off,
            RadioState::Idle | RadioState::Fault => PowerState::Idle,
            RadioState::Receiving | RadioState::ReceivingBusy | RadioState::Transmitting => {
                PowerState::Rx
            }
        }
    }

    /// Single send attempt
    ///
    /// Fails with [`Error::Busy`] unless the radio is idle or armed for RX,
    /// then with [`Error::Oversize`] if the frame does not fit the FIFO.
    /// Neither failure touches the bus. On success the frame carries this
    /// node's address as source and the return value is `length + 1`.
    pub fn try_send(&mut self, frame: &mut Frame) -> Result<usize> {
        debug!("send to {} wire len {}", frame.address(), frame.wire_len());

        if self.state == RadioState::Fault {
            return Err(Error::Fault);
        }
        if !self.state.accepts_tx() {
            return Err(Error::Busy);
        }
        if !frame.fits_hardware() {
            warn!("refusing oversized frame of {} bytes", frame.wire_len());
            return Err(Error::Oversize);
        }

        frame.set_phy_src(self.address.as_u8());

        let Self {
            bus,
            irq,
            state,
            buffer,
            stats,
            ..
        } = self;
        let _masked = IrqGuard::new(irq);
        *state = RadioState::Transmitting;

        match load_and_start(bus, buffer, frame) {
            Ok(written) => {
                stats.raw_packets_out += 1;
                Ok(written)
            }
            Err(e) => {
                error!("transmit failed: {}, radio needs recovery", e);
                *state = RadioState::Fault;
                Err(e)
            }
        }
    }

    /// Record that a send had to wait; called once per blocked send
    pub(crate) fn note_send_blocked(&mut self) {
        warn!("invalid state for sending: {}", self.state);
        if self.state == RadioState::ReceivingBusy {
            self.stats.packets_in_while_tx += 1;
        }
    }

    /// Event-line interrupt handler
    ///
    /// `level` is the line level sampled when the handler runs. Returns the
    /// action taken, or None when the line is masked and the edge is dropped.
    pub fn on_interrupt(&mut self, level: Level) -> Option<IrqAction> {
        if !self.irq.is_enabled() {
            trace!("event line masked, ignoring {} edge", level);
            return None;
        }

        let action = state::dispatch(self.state, level);
        match action {
            IrqAction::FrameStart => {
                info!("frame appeared");
                self.state = RadioState::ReceivingBusy;
            }
            IrqAction::Rearm => {
                warn!("edge handled too late, re-arming RX");
                self.rearm();
            }
            IrqAction::FrameComplete => {
                info!("whole frame in RX FIFO");
                match receive::read_frame(&mut self.bus, self.state, &mut self.buffer, &mut self.stats) {
                    Ok(RxOutcome::Delivered { .. }) => self.push_event(RadioEvent::RxComplete),
                    Ok(RxOutcome::Rejected) => {}
                    Err(e) => warn!("frame dropped: {}", e),
                }
                self.rearm();
            }
            IrqAction::MissedEdge => warn!("event line still high in RX_BUSY, interrupt lost?"),
            IrqAction::TxComplete => {
                info!("frame sent, back to RX");
                self.push_event(RadioEvent::TxComplete);
                self.rearm();
            }
            IrqAction::TxInProgress => trace!("still transmitting"),
            IrqAction::Unhandled => warn!("unhandled event in state {}", self.state),
        }
        Some(action)
    }

    /// Next notification for the task side
    pub fn take_event(&mut self) -> Option<RadioEvent> {
        self.events.pop_front()
    }

    /// Copy the buffered frame into `out`, see [`PacketBuffer::read_rx`]
    pub fn receive(&mut self, out: &mut [u8]) -> Result<usize> {
        self.buffer.read_rx(out)
    }

    /// Retune to `channel`
    ///
    /// Refused with [`Error::Busy`] while a frame is on air or arriving, and
    /// with [`Error::InvalidState`] while powered down, since any SPI access
    /// wakes the chip.
    pub fn set_channel(&mut self, channel: Channel) -> Result<()> {
        if self.state.is_busy() {
            return Err(Error::Busy);
        }
        if self.state == RadioState::PowerDown {
            return Err(Error::InvalidState);
        }
        self.bus.write_burst(reg::FREQ2, &freq_word(channel))?;
        self.channel = channel;
        debug!("channel {} ({} Hz)", channel.number(), channel.carrier_hz());
        if self.state == RadioState::Receiving {
            self.switch_to_rx()?;
        }
        Ok(())
    }

    /// Change the node address used for filtering and as frame source
    pub fn set_address(&mut self, address: NodeAddress) -> Result<()> {
        self.bus.write_reg(reg::DEV_ADDR, address.as_u8())?;
        self.address = address;
        debug!("address {}", address.as_u8());
        Ok(())
    }

    /// Switch the radio between off, idle and receive
    pub fn set_power(&mut self, power: PowerState) -> Result<()> {
        if self.state == RadioState::Fault {
            return Err(Error::Fault);
        }
        match power {
            PowerState::Off => {
                self.irq.disable();
                self.bus.strobe(Strobe::Sidle)?;
                self.bus.strobe(Strobe::Spwd)?;
                self.state = RadioState::PowerDown;
            }
            PowerState::Idle => {
                self.irq.disable();
                self.bus.strobe(Strobe::Sidle)?;
                self.state = RadioState::Idle;
            }
            PowerState::Rx => self.switch_to_rx()?,
        }
        debug!("power {}", power);
        Ok(())
    }

    /// Leave the fault state: idle, flush both FIFOs, re-arm RX
    pub fn recover(&mut self) -> Result<()> {
        warn!("recovering from {}", self.state);
        self.irq.disable();
        self.bus.strobe(Strobe::Sidle)?;
        self.bus.strobe(Strobe::Sftx)?;
        self.switch_to_rx()
    }

    /// Give back the bus and interrupt control
    pub fn release(self) -> (B, I) {
        (self.bus, self.irq)
    }

    fn switch_to_rx(&mut self) -> Result<()> {
        self.bus.strobe(Strobe::Sidle)?;
        self.bus.strobe(Strobe::Sfrx)?;
        self.bus.strobe(Strobe::Srx)?;
        self.state = RadioState::Receiving;
        self.irq.enable();
        Ok(())
    }

    fn rearm(&mut self) {
        if let Err(e) = self.switch_to_rx() {
            error!("re-arming RX failed: {}", e);
        }
    }

    fn push_event(&mut self, event: RadioEvent) {
        // A single receive slot backs every RxComplete, one pending is enough
        if event == RadioEvent::RxComplete && self.events.iter().any(|e| *e == event) {
            return;
        }
        if self.events.push_back(event).is_err() {
            warn!("event queue full, dropping {}", event);
        }
    }
}

/// Idle the chip, empty the TX FIFO, stage the frame and start it
fn load_and_start<B: RadioBus>(bus: &mut B, buffer: &mut PacketBuffer, frame: &Frame) -> Result<usize> {
    bus.strobe(Strobe::Sidle)?;
    bus.strobe(Strobe::Sftx)?;
    buffer.load_tx(frame);
    transmit::start(bus, buffer.tx())
}
