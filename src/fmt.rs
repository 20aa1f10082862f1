//! Logging front end
//!
//! `defmt` on the watch, `log` on the host, nothing when both are disabled.

#![allow(unused)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, info, trace, warn};
    } else if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, info, trace, warn};
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! info {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {{}};
        }
        pub(crate) use {debug, info, trace, warn};
    }
}
