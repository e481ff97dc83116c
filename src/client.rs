use crate::config::ClientConfig;
use crate::error::{TransportError, ValidationError};
use crate::line::Line;
use crate::line_protocol::join_lines;
use crate::metric::{FieldSet, Fields, TagSet, DEFAULT_FIELD_NAME};
use crate::transport::{Transport, UdpTransport};
use log::{debug, trace};
use std::time::Instant;

/// The client most callers want: line protocol over UDP.
pub type TelegrafClient = Client<UdpTransport>;

/// Builds lines from `track` calls and hands them to a [`Transport`].
///
/// Default tags are fixed at construction and merged into every tracked
/// line; tags passed to `track` win over defaults with the same key.
/// Nothing is mutated after construction, so sharing a client across
/// threads only needs the transport to be `Sync`.
#[derive(Debug)]
pub struct Client<T> {
    default_tags: TagSet,
    transport: T,
}

impl Client<UdpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = UdpTransport::new(config.host, config.port)?;
        Ok(Client::with_transport(config.tags, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(default_tags: TagSet, transport: T) -> Self {
        Client {
            default_tags,
            transport,
        }
    }

    pub fn default_tags(&self) -> &TagSet {
        &self.default_tags
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates a `track` call and builds its line without sending it.
    pub fn prepare(
        &self,
        name: &str,
        fields: impl Into<Fields>,
        tags: Option<&TagSet>,
        timestamp: Option<i64>,
    ) -> Result<Line, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyMeasurement);
        }

        let field_set = match fields.into() {
            Fields::Single(None) => return Err(ValidationError::MissingFields),
            Fields::Single(Some(value)) => FieldSet::new().field(DEFAULT_FIELD_NAME, value),
            Fields::Multi(field_set) if field_set.is_empty() => {
                return Err(ValidationError::EmptyFields)
            }
            Fields::Multi(field_set) => field_set,
        };

        if !field_set.has_values() {
            return Err(ValidationError::NoFieldValues {
                measurement: name.to_string(),
            });
        }

        if let Some((field, _)) = field_set.present().find(|(_, value)| !value.is_finite()) {
            return Err(ValidationError::NonFiniteField {
                measurement: name.to_string(),
                field: field.clone(),
            });
        }

        // Shallow merge, call-site tags override the defaults.
        let mut all_tags = self.default_tags.clone();
        if let Some(tags) = tags {
            all_tags.extend(tags.iter().map(|(key, value)| (key.clone(), value.clone())));
        }

        let line = Line::with_fields(name, field_set).tags(all_tags);
        Ok(match timestamp {
            Some(timestamp) => line.timestamp(timestamp),
            None => line,
        })
    }

    /// Sends one observation. Only validation errors are returned; a failed
    /// send is dropped.
    pub fn track(
        &self,
        name: &str,
        fields: impl Into<Fields>,
        tags: Option<&TagSet>,
        timestamp: Option<i64>,
    ) -> Result<(), ValidationError> {
        let function_start = Instant::now();
        let metric = self.prepare(name, fields, tags, timestamp)?;
        self.send(&metric.to_line_protocol());
        trace!("track duration: {:?}", function_start.elapsed());
        Ok(())
    }

    /// Sends already built lines as one newline-separated payload. Lines are
    /// sent as they are: no default tags, no validation.
    pub fn track_prepared(&self, lines: &[Line]) {
        if lines.is_empty() {
            trace!("track_prepared called without lines, nothing sent");
            return;
        }
        self.send(&join_lines(lines));
    }

    /// Fire and forget. Transport errors are logged and discarded.
    pub fn send(&self, data: &str) {
        trace!("sending payload: {}", data);
        if let Err(error) = self.transport.send(data) {
            debug!("dropped metrics payload: {}", error);
        }
    }
}
