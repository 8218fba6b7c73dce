//! Hardware Abstraction Layer
//!
//! Transport and interrupt-line contracts the driver core is written against.
//! Implementations sit on `embedded-hal` 1.0 traits so the same core runs on
//! the target and against test doubles on the host.

pub mod gpio;
pub mod spi;
