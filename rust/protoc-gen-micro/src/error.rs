use micro_codegen::GenerateError;

/// Failures of a plugin run. Everything except I/O on the protocol streams is
/// reported back to protoc through the response's `error` field.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("malformed CodeGeneratorRequest")]
    Decode(#[from] prost::DecodeError),

    #[error("failed to encode CodeGeneratorResponse")]
    Encode(#[from] prost::EncodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{file} is listed for generation but its descriptor is missing")]
    MissingFile { file: String },

    #[error("{method}: unknown message type {name}")]
    UnknownType { name: String, method: String },

    #[error("routing key {key:?} is generated by both {first} and {second}")]
    DuplicateRoutingKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("{file}: {source}")]
    Generate {
        file: String,
        #[source]
        source: GenerateError,
    },

    #[error(transparent)]
    Options(GenerateError),
}
