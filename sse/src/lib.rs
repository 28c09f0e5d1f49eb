//! Topic based publish/subscribe core for the infocenter server-sent events broker.
//!
//! # Architecture
//!
//! - **Single registry lock**: the `Registry` lives behind one `RwLock` owned by
//!   the `Broker`. Registration, unregistration, expiry and shutdown write;
//!   publish reads for the full duration of its fan-out.
//! - **Topic index**: subscriptions are indexed by topic so a publish only
//!   touches the subscribers it delivers to.
//! - **Bounded delivery channels**: each subscription owns the receiving end of
//!   a small `mpsc` channel. A publish waits until every matched subscriber has
//!   room, which is the only backpressure the broker applies.
//! - **Absolute idle eviction**: every subscription started with
//!   `Broker::subscribe` is closed a fixed time after connecting, after
//!   receiving a `timeout` event.
//! - **Ephemeral messages**: nothing is stored. A subscriber that connects
//!   after a publish never sees it.
//!
//! # Message Flow
//!
//! 1. A client opens `GET /infocenter/{topic}` and the web layer calls
//!    `Broker::subscribe`
//! 2. A publisher posts to `POST /infocenter/{topic}`, the web layer calls
//!    `Broker::publish` once per form key
//! 3. The broker assigns the next global sequence number and sends the
//!    `Message` to every subscription bound to the topic
//! 4. The stream handler turns each `Message` into an SSE `Event`
//! 5. When the subscription is evicted, shut down or dropped, its registry
//!    entry is removed and its channel closed
//!
//! # Modules
//!
//! - `broker`: `Broker` with register/unregister/publish and the drain hook
//! - `registry`: `Registry` and the type-safe `SubscriptionId`
//! - `subscription`: the subscriber-facing receiving end
//! - `message`: `Message` and its conversion into an SSE event
//! - `timer`: per-subscription idle eviction

pub mod broker;
pub mod error;
pub mod message;
pub mod registry;
pub mod subscription;
mod timer;

pub use broker::Broker;
pub use error::Error;
pub use message::{Kind, Message};
pub use registry::SubscriptionId;
pub use subscription::Subscription;
