#![deny(unsafe_code)]

//! Generates Go RPC bindings for the gffg runtime from service schemas.
//!
//! Given a [`SourceFile`] whose services list typed request/response methods,
//! [`generate_file`] produces, per service:
//!
//! - a client interface, a client struct holding a transport handle, a
//!   constructor, and one method per RPC that validates the request, calls the
//!   transport and decodes the response;
//! - a handler interface for business logic, a `Register<Service>Handler`
//!   function that fills the server's dispatch table, a wrapper struct, and one
//!   byte-level adapter per RPC that decodes, invokes and encodes.
//!
//! Dispatch entries are keyed by `"<Service>.<Method>"`; adapters are named
//! `_<Service>_<Method>_Handler`.
//!
//! ```
//! use micro_codegen::{GoCodegenOptions, ImportRegistry, generate_file};
//! use micro_codegen::schema::{MethodSchema, ServiceSchema, SourceFile, TypeRef};
//!
//! let file = SourceFile {
//!     name: "helloworld.proto".into(),
//!     package: "helloworld".into(),
//!     go_package: "helloworld".into(),
//!     services: vec![ServiceSchema {
//!         name: "Greeter".into(),
//!         methods: vec![MethodSchema::unary(
//!             "SayHello",
//!             TypeRef::local("HelloRequest"),
//!             TypeRef::local("HelloResponse"),
//!         )],
//!     }],
//! };
//!
//! let artifact =
//!     generate_file(&file, &mut ImportRegistry::new(), &GoCodegenOptions::default()).unwrap();
//! assert!(artifact.render().contains("common.GenRid(\"Greeter.SayHello\")"));
//! ```
//!
//! Reading the schema from disk is left to the caller; see the
//! `protoc-gen-micro` plugin for the protoc front-end.

pub mod artifact;
pub mod code_writer;
pub mod error;
pub mod imports;
pub mod options;
pub mod render;
pub mod schema;
pub mod targets;

pub use artifact::{ArtifactBlock, BlockKind, GeneratedArtifact};
pub use error::{GenerateError, Result};
pub use imports::{ImportRegistry, PackageAliases, RuntimePaths};
pub use options::GoCodegenOptions;
pub use targets::go::generate_file;
