use std::io;

use crate::{
    codec::CodecError,
    config::ConfigError,
    hypertable::HqlError,
    protocol::ProtocolError,
    record::RecordError,
    rpc::RpcError,
    schema::SchemaError,
};

/// Crate-wide error covering every layer, from wire bytes to typed calls.
/// - `From<T>` impls let `?` cross layer boundaries.
/// - Messages name the layer first so logs stay greppable.
#[derive(Debug)]
pub enum ThriftError {
    /// I/O outside the protocol (config files, caller streams).
    Io(io::Error),

    /// Schema table construction or lookup.
    Schema(SchemaError),

    /// Record access by name or typed view conversion.
    Record(RecordError),

    /// Malformed or truncated wire data.
    Protocol(ProtocolError),

    /// Encode shape violations and required-field validation.
    Codec(CodecError),

    /// Envelope faults, application and remote exceptions.
    Rpc(RpcError),

    /// Typed Hypertable client failures.
    Hql(HqlError),

    Config(ConfigError),
}

impl std::fmt::Display for ThriftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThriftError::Io(e) => write!(f, "I/O error: {}", e),
            ThriftError::Schema(e) => write!(f, "schema error: {}", e),
            ThriftError::Record(e) => write!(f, "record error: {}", e),
            ThriftError::Protocol(e) => write!(f, "protocol error: {}", e),
            ThriftError::Codec(e) => write!(f, "codec error: {}", e),
            ThriftError::Rpc(e) => write!(f, "rpc error: {}", e),
            ThriftError::Hql(e) => write!(f, "hql error: {}", e),
            ThriftError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for ThriftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ThriftError::Io(e) => Some(e),
            ThriftError::Schema(e) => Some(e),
            ThriftError::Record(e) => Some(e),
            ThriftError::Protocol(e) => Some(e),
            ThriftError::Codec(e) => Some(e),
            ThriftError::Rpc(e) => Some(e),
            ThriftError::Hql(e) => Some(e),
            ThriftError::Config(e) => Some(e),
        }
    }
}

impl From<io::Error> for ThriftError {
    fn from(e: io::Error) -> Self {
        ThriftError::Io(e)
    }
}

impl From<SchemaError> for ThriftError {
    fn from(e: SchemaError) -> Self {
        ThriftError::Schema(e)
    }
}

impl From<RecordError> for ThriftError {
    fn from(e: RecordError) -> Self {
        ThriftError::Record(e)
    }
}

impl From<ProtocolError> for ThriftError {
    fn from(e: ProtocolError) -> Self {
        ThriftError::Protocol(e)
    }
}

impl From<CodecError> for ThriftError {
    fn from(e: CodecError) -> Self {
        ThriftError::Codec(e)
    }
}

impl From<RpcError> for ThriftError {
    fn from(e: RpcError) -> Self {
        ThriftError::Rpc(e)
    }
}

impl From<HqlError> for ThriftError {
    fn from(e: HqlError) -> Self {
        ThriftError::Hql(e)
    }
}

impl From<ConfigError> for ThriftError {
    fn from(e: ConfigError) -> Self {
        ThriftError::Config(e)
    }
}
