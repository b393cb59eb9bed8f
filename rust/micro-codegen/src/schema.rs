//! Schema types consumed by the generator.
//!
//! These are produced by a schema loader (the protoc plugin front-end, or a
//! test fixture) and are never mutated while bindings are generated. Type
//! references are already resolved to Go type names; the generator only
//! decides how to spell them.

/// A Go package that a message type lives in, when it is not the package
/// being generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoPackage {
    /// Full import path, e.g. `github.com/acme/api/common`.
    pub import_path: String,

    /// Package name as declared by the package itself, used as the preferred
    /// import alias.
    pub name: String,
}

/// A reference to a message type used as a method input or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Go type name within its package (`HelloRequest`, `Outer_Inner`).
    pub go_name: String,

    /// `None` when the type is declared in the package being generated.
    pub package: Option<GoPackage>,
}

impl TypeRef {
    /// A type declared in the package being generated.
    pub fn local(go_name: impl Into<String>) -> Self {
        Self {
            go_name: go_name.into(),
            package: None,
        }
    }

    /// A type declared in another Go package.
    pub fn foreign(go_name: impl Into<String>, package: GoPackage) -> Self {
        Self {
            go_name: go_name.into(),
            package: Some(package),
        }
    }
}

/// One RPC method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSchema {
    /// Method name as written in the schema.
    pub name: String,
    pub input: TypeRef,
    pub output: TypeRef,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl MethodSchema {
    /// A method with neither streaming flag set.
    pub fn unary(name: impl Into<String>, input: TypeRef, output: TypeRef) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            client_streaming: false,
            server_streaming: false,
        }
    }

    /// True when either side sends more than one message per call.
    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }
}

/// A named service and its methods, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSchema {
    /// Service name as written in the schema.
    pub name: String,
    pub methods: Vec<MethodSchema>,
}

/// One input schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the schema file, e.g. `helloworld/helloworld.proto`.
    pub name: String,

    /// Schema package (`helloworld`). May be empty.
    pub package: String,

    /// Name of the Go package the bindings are emitted into.
    pub go_package: String,

    pub services: Vec<ServiceSchema>,
}
