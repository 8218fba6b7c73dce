//! Task/interrupt sharing of one device
//!
//! The device context lives in a critical-section mutex. Every entry point
//! holds the lock only for a single step, so a sending task can sleep between
//! attempts while the event-line handler keeps running.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{SEND_POLL_ATTEMPTS, SEND_POLL_INTERVAL_MS};
use crate::error::{Error, Result};
use crate::hal::gpio::{IrqControl, Level};
use crate::hal::spi::RadioBus;
use crate::radio::device::Cc112x;
use crate::radio::frame::Frame;
use crate::radio::state::{IrqAction, RadioEvent, RadioState};

/// Outcome of one locked send attempt
enum Attempt {
    Done(Result<usize>),
    Wait,
}

/// Device context shared between task and interrupt context
///
/// Every lock is a global critical section. With the single-core
/// `critical-section` implementation all interrupts stay masked for the whole
/// locked step, including full FIFO bursts of up to 255 bytes in
/// [`Cc112x::try_send`] and in the end-of-frame read.
pub struct SharedRadio<B, I> {
    inner: Mutex<RefCell<Cc112x<B, I>>>,
}

impl<B, I> SharedRadio<B, I>
where
    B: RadioBus,
    I: IrqControl,
{
    /// Wrap a device context
    pub const fn new(radio: Cc112x<B, I>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(radio)),
        }
    }

    /// Run `f` with exclusive access to the device
    pub fn lock<R>(&self, f: impl FnOnce(&mut Cc112x<B, I>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Current radio state
    pub fn state(&self) -> RadioState {
        self.lock(|radio| radio.state())
    }

    /// Send a frame, waiting for the radio to become free
    ///
    /// Polls every 5 ms for at most 100 intervals, then fails with
    /// [`Error::Timeout`]. Every other outcome of [`Cc112x::try_send`] is
    /// returned as is.
    pub fn send<D>(&self, frame: &mut Frame, delay: &mut D) -> Result<usize>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let mut polls = 0;
        loop {
            match self.attempt(frame, polls) {
                Attempt::Done(result) => return result,
                Attempt::Wait => {
                    delay.delay_ms(SEND_POLL_INTERVAL_MS);
                    polls += 1;
                }
            }
        }
    }

    /// [`Self::send`] for async executors, yielding while waiting
    pub async fn send_async<D>(&self, frame: &mut Frame, delay: &mut D) -> Result<usize>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let mut polls = 0;
        loop {
            match self.attempt(frame, polls) {
                Attempt::Done(result) => return result,
                Attempt::Wait => {
                    delay.delay_ms(SEND_POLL_INTERVAL_MS).await;
                    polls += 1;
                }
            }
        }
    }

    /// Event-line handler entry, see [`Cc112x::on_interrupt`]
    pub fn on_interrupt(&self, level: Level) -> Option<IrqAction> {
        self.lock(|radio| radio.on_interrupt(level))
    }

    /// Next queued notification
    pub fn take_event(&self) -> Option<RadioEvent> {
        self.lock(Cc112x::take_event)
    }

    fn attempt(&self, frame: &mut Frame, polls: u32) -> Attempt {
        let result = self.lock(|radio| {
            let result = radio.try_send(frame);
            if polls == 0 && result == Err(Error::Busy) {
                radio.note_send_blocked();
            }
            result
        });
        match result {
            Err(Error::Busy) if polls < SEND_POLL_ATTEMPTS => Attempt::Wait,
            Err(Error::Busy) => {
                error!("radio busy for {} polls, giving up", polls);
                Attempt::Done(Err(Error::Timeout))
            }
            result => Attempt::Done(result),
        }
    }
}
