//! Encodes metric observations as InfluxDB line protocol and fires them at
//! a Telegraf (or InfluxDB) UDP listener.
//!
//! ```no_run
//! use telegraf_client::{tag_set, ClientConfig, FieldSet, TelegrafClient};
//!
//! let client = TelegrafClient::new(ClientConfig::default().with_tags([("host", "host-001")]))?;
//! client.track("cpu", 0.64, None, None)?;
//! client.track(
//!     "requests",
//!     FieldSet::new().field("count", 12).field("path", "/index"),
//!     Some(&tag_set([("region", "us-west")])),
//!     None,
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod line;
pub mod line_protocol;
pub mod metric;
pub mod transport;

pub use client::{Client, TelegrafClient};
pub use config::ClientConfig;
pub use error::{TransportError, ValidationError};
pub use line::Line;
pub use metric::{tag_set, FieldSet, FieldValue, Fields, TagSet};
pub use transport::{NopTransport, Transport, UdpTransport};
