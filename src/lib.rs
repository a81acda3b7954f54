#![cfg_attr(not(feature = "threaded"), no_std)]

//! # Bot Events Crate
//!
//! This crate provides the event-notification layer of a small robot
//! controller: a fixed set of lifecycle events, a listener trait with
//! default no-op hooks, and a dispatch chain that delivers each event to
//! every attached listener in link order.
//!
//! - **EventListener**: the capability trait; implement only the hooks you
//!   care about.
//! - **EventChain**: owns the listeners and walks them on dispatch.
//! - **EventDispatcher**: trait defining the chain API.
//!
//! By default, the crate uses the `threaded` (multi-threaded, async)
//! implementation. All core types are exported from the `threaded` module.
//!
//! For embedded or single-threaded use, build with `default-features =
//! false` to get the `base` (no_std + alloc) implementation instead.

mod constants;
mod dispatch;
mod error;
mod event;
mod listener;

#[cfg(not(feature = "threaded"))]
mod base;
#[cfg(feature = "threaded")]
mod threaded;

pub use constants::*;
pub use dispatch::{DispatchOutcome, DispatchPolicy, EventDispatcher, ListenerId};
pub use error::ChainError;
pub use event::{Button, Event, Move};
pub use listener::EventListener;

#[cfg(not(feature = "threaded"))]
pub use base::EventChain;
#[cfg(feature = "threaded")]
pub use threaded::EventChain;
