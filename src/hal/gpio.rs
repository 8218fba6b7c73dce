//! Event Line Abstractions
//!
//! The CC112x signals frame boundaries on one GPIO. The driver samples that
//! line's level when the interrupt is dispatched and masks the interrupt while
//! it owns the FIFO.

/// Sampled level of the event line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Line is low
    Low,
    /// Line is high
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Level {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(f, "LOW"),
            Self::High => defmt::write!(f, "HIGH"),
        }
    }
}

/// Mask control for the event-line interrupt
pub trait IrqControl {
    /// Unmask the interrupt
    fn enable(&mut self);

    /// Mask the interrupt
    fn disable(&mut self);

    /// Check whether dispatches are currently accepted
    fn is_enabled(&self) -> bool;
}

/// Scoped interrupt mask
///
/// Masks on creation, unmasks on drop, so every exit path of the owning scope
/// (early `?` returns included) releases the line.
pub struct IrqGuard<'a, I: IrqControl> {
    irq: &'a mut I,
}

impl<'a, I: IrqControl> IrqGuard<'a, I> {
    /// Mask the interrupt until the guard is dropped
    pub fn new(irq: &'a mut I) -> Self {
        irq.disable();
        Self { irq }
    }
}

impl<I: IrqControl> Drop for IrqGuard<'_, I> {
    fn drop(&mut self) {
        self.irq.enable();
    }
}

/// Software interrupt gate
///
/// Used when the edge itself is delivered through an async EXTI wait: the
/// waiting task forwards every edge, and the driver drops the ones that
/// arrive while the gate is closed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftGate {
    enabled: bool,
}

impl SoftGate {
    /// Create a closed gate
    #[must_use]
    pub const fn new() -> Self {
        Self { enabled: false }
    }
}

impl IrqControl for SoftGate {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
