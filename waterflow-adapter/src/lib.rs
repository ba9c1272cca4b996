//! Adapter utilities for the `waterflow` crate.
//!
//! The `waterflow` crate is UI-agnostic and focuses on layout state. This crate provides small,
//! framework-neutral helpers commonly needed by adapters:
//!
//! - Tween-based smooth scrolling (`animate_to`), driven by the adapter's frame clock
//! - Scroll anchoring across data changes (e.g. prepending items above the viewport)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod tween;

#[cfg(test)]
mod tests;

pub use anchor::{FlowAnchor, apply_anchor, capture_first_visible_anchor};
pub use controller::Controller;
pub use tween::{Easing, Tween};
