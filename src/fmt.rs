//! Logging shims
//!
//! Forward to `defmt` on embedded builds. Host builds keep the arguments
//! evaluated (so nothing becomes unused) and drop the message.

#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( &$x, )*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "embedded")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(not(feature = "embedded"))]
        let _ = ($( &$x, )*);
    }};
}
