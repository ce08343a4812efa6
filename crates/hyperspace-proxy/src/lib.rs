//! HYP3RSP4C3 Proxy Fallback Engine
//!
//! A load walks an ordered list of delivery strategies, one at a time:
//! direct frame, IP proxies by region, then web CORS relays. Every attempt
//! has its own timeout; a timeout and an explicit error are the same thing
//! (advance to the next descriptor). Running off the end of the list yields a
//! locally synthesized alternatives page instead of an error.

mod cancel;
mod descriptor;
mod engine;
mod error;
mod event;
mod transport;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use descriptor::{default_chain, DeliveryMode, PriorityTier, ProxyDescriptor};
pub use engine::{Delivery, EngineOptions, LoadOutcome, ProxyEngine};
pub use error::{AttemptError, ProxyError};
pub use event::{LoadEvent, LoadEventKind};
pub use transport::{HttpTransport, Transport};

pub type Result<T> = std::result::Result<T, ProxyError>;
