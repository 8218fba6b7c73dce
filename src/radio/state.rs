//! Radio State Machine
//!
//! The interrupt side of the state machine is a pure function of the current
//! state and the event-line level sampled when the handler runs. The handler
//! may run late relative to the edge that triggered it; it acts on where the
//! line is now, not on which edge fired. Stale combinations map to harmless
//! actions.

use crate::hal::gpio::Level;

/// Device mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioState {
    /// Not initialized yet
    #[default]
    Unknown,
    /// Chip idle, nothing armed
    Idle,
    /// Receiver armed, waiting for a sync word
    Receiving,
    /// A frame is arriving
    ReceivingBusy,
    /// A frame is on air
    Transmitting,
    /// Chip powered down
    PowerDown,
    /// TX FIFO could not be loaded; needs `recover()` or `init()`
    Fault,
}

impl RadioState {
    /// All states, for exhaustive checks
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::Idle,
        Self::Receiving,
        Self::ReceivingBusy,
        Self::Transmitting,
        Self::PowerDown,
        Self::Fault,
    ];

    /// States from which a new frame may be loaded
    #[must_use]
    pub const fn accepts_tx(self) -> bool {
        matches!(self, Self::Idle | Self::Receiving)
    }

    /// Check if a frame is being sent or received
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::ReceivingBusy | Self::Transmitting)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unknown => defmt::write!(f, "UNKNOWN"),
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Receiving => defmt::write!(f, "RX"),
            Self::ReceivingBusy => defmt::write!(f, "RX_BUSY"),
            Self::Transmitting => defmt::write!(f, "TX_BUSY"),
            Self::PowerDown => defmt::write!(f, "PWD"),
            Self::Fault => defmt::write!(f, "FAULT"),
        }
    }
}

/// What the interrupt handler must do for a (state, level) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqAction {
    /// Sync word seen, a frame is arriving
    FrameStart,
    /// Line already low again in RX, the handler ran too late; re-arm
    Rearm,
    /// Whole frame in the RX FIFO; read it, then re-arm
    FrameComplete,
    /// Still high while busy receiving, an edge was lost
    MissedEdge,
    /// Frame left the antenna; re-arm the receiver
    TxComplete,
    /// Still transmitting
    TxInProgress,
    /// No transition defined for this state
    Unhandled,
}

impl IrqAction {
    /// State the device is in once the action has been carried out
    #[must_use]
    pub const fn next_state(self, current: RadioState) -> RadioState {
        match self {
            Self::FrameStart | Self::MissedEdge => RadioState::ReceivingBusy,
            Self::Rearm | Self::FrameComplete | Self::TxComplete => RadioState::Receiving,
            Self::TxInProgress => RadioState::Transmitting,
            Self::Unhandled => current,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for IrqAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::FrameStart => defmt::write!(f, "FrameStart"),
            Self::Rearm => defmt::write!(f, "Rearm"),
            Self::FrameComplete => defmt::write!(f, "FrameComplete"),
            Self::MissedEdge => defmt::write!(f, "MissedEdge"),
            Self::TxComplete => defmt::write!(f, "TxComplete"),
            Self::TxInProgress => defmt::write!(f, "TxInProgress"),
            Self::Unhandled => defmt::write!(f, "Unhandled"),
        }
    }
}

/// Map the current state and sampled line level to an action
#[must_use]
pub const fn dispatch(state: RadioState, level: Level) -> IrqAction {
    match (state, level) {
        (RadioState::Receiving, Level::High) => IrqAction::FrameStart,
        (RadioState::Receiving, Level::Low) => IrqAction::Rearm,
        (RadioState::ReceivingBusy, Level::Low) => IrqAction::FrameComplete,
        (RadioState::ReceivingBusy, Level::High) => IrqAction::MissedEdge,
        (RadioState::Transmitting, Level::Low) => IrqAction::TxComplete,
        (RadioState::Transmitting, Level::High) => IrqAction::TxInProgress,
        _ => IrqAction::Unhandled,
    }
}

/// Notification queued from interrupt context for the task side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioEvent {
    /// A frame is waiting in the receive slot
    RxComplete,
    /// The last frame has been transmitted
    TxComplete,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::RxComplete => defmt::write!(f, "RxComplete"),
            Self::TxComplete => defmt::write!(f, "TxComplete"),
        }
    }
}
