/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! # pots-exchange
//!
//! `pots-exchange` simulates a plain old telephone exchange: telephones register with an
//! [`Exchange`], dial each other, answer, hang up, and stream bits over per-line
//! [`Channel`]s while a call is established.
//!
//! Typical usage goes through [`Exchange`] and the [`Telephone`] handles it returns.
//!
//! ## Placing a call
//!
//! ```
//! use pots_exchange::{DialOutcome, Exchange, Status, TelephoneRecord};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let exchange = Exchange::new("quick-start");
//! let one = exchange.register(TelephoneRecord::new(1).unwrap()).await.unwrap();
//! let two = exchange.register(TelephoneRecord::new(2).unwrap()).await.unwrap();
//!
//! one.dial(two.id()).await.unwrap();
//! assert_eq!(two.caller_id().await.unwrap(), Some(one.id()));
//!
//! let (outcome, opened) = tokio::join!(one.wait_for_answer(), two.answer());
//! assert_eq!(outcome.unwrap(), DialOutcome::Answered);
//! assert_eq!(opened.unwrap().caller_id, one.id());
//!
//! one.hang_up().await.unwrap();
//! assert_eq!(one.status().await.unwrap(), Status::OffCall);
//! assert_eq!(two.status().await.unwrap(), Status::OffCall);
//! # });
//! ```
//!
//! ## Routing contract
//!
//! A busy destination rejects new calls and nothing changes; a telephone can only accept
//! a call that is actually ringing towards it.
//!
//! ```
//! use pots_exchange::{Exchange, ExchangeError, Status, TelephoneRecord};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let exchange = Exchange::new("contract");
//! let mut lines = Vec::new();
//! for number in 1..=3 {
//!     lines.push(exchange.register(TelephoneRecord::new(number).unwrap()).await.unwrap());
//! }
//!
//! lines[0].dial(lines[1].id()).await.unwrap();
//! lines[1].answer().await.unwrap();
//!
//! assert_eq!(
//!     lines[2].dial(lines[0].id()).await,
//!     Err(ExchangeError::Busy(lines[0].id()))
//! );
//! assert_eq!(lines[2].status().await.unwrap(), Status::OffCall);
//!
//! assert!(exchange
//!     .open_call_between(lines[2].id(), lines[0].id())
//!     .await
//!     .is_err());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: outward `Exchange`/`Telephone` surface
//! - Control plane: line registry, call routing transitions and call observers
//! - Data plane: bit channels plus the producer and consumer of each call
//! - Runtime: spawning and joining stream tasks
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization.

mod call_timings;
pub use call_timings::{CallTimings, DEFAULT_DIAL_TIMEOUT, DEFAULT_STREAM_INTERVAL};

mod control_plane;
pub use control_plane::call_observer::{CallObserver, CallOpened};
pub use control_plane::line_registry::TelephoneSnapshot;

mod data_plane;
pub use data_plane::call_stream::{CallStream, StreamMode, StreamReport};
pub use data_plane::channel::{Bit, Channel, ChannelHandle};

mod error;
pub use error::{ChannelError, ExchangeError};

mod exchange;
pub use exchange::Exchange;

#[doc(hidden)]
pub mod observability;
mod runtime;

mod status;
pub use status::Status;

mod telephone;
pub use telephone::{DialOutcome, Telephone};

mod telephone_record;
pub use telephone_record::{TelephoneId, TelephoneRecord};
