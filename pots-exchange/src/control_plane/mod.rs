//! Control-plane layer.
//!
//! Owns the line registry (per-telephone call state keyed by id) and the call-routing
//! transitions between lines. Every transition runs under the exchange's registry lock
//! and either applies completely or not at all.
//!
//! ```
//! use pots_exchange::{Exchange, Status, TelephoneRecord};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let exchange = Exchange::new("control-plane-doc");
//! let one = exchange.register(TelephoneRecord::new(1).unwrap()).await.unwrap();
//! let two = exchange.register(TelephoneRecord::new(2).unwrap()).await.unwrap();
//!
//! exchange.enroute_call(one.id(), two.id()).await.unwrap();
//! assert_eq!(two.status().await.unwrap(), Status::Ringing);
//! assert!(exchange.communication_exists(one.id(), two.id()).await.unwrap());
//! # });
//! ```

pub(crate) mod call_observer;
pub(crate) mod call_routing;
pub(crate) mod line_registry;
