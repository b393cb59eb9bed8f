//! Method signatures for the four places a method appears in generated code.
//!
//! The typed roles ([`SignatureRole::Client`], [`SignatureRole::Server`]) carry
//! message types; the byte-level roles ([`SignatureRole::Adapter`],
//! [`SignatureRole::Interface`]) are what the dispatch table sees, so routing
//! never depends on a concrete message type.

use super::{EmitContext, MethodPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignatureRole {
    /// Method on the client interface and client struct.
    Client,
    /// Method on the `<Service>Handler` interface implemented by users.
    Server,
    /// Byte-level adapter method on the handler wrapper.
    Adapter,
    /// Entry of the private interface declared by the registration function.
    Interface,
}

/// Signature text for `method` in `role`, without the `func` keyword or
/// receiver.
pub(crate) fn build_signature(
    role: SignatureRole,
    method: &MethodPlan<'_>,
    ctx: &EmitContext,
) -> String {
    let a = &ctx.aliases;
    let names = &method.names;

    match role {
        SignatureRole::Client => {
            let request = if method.schema.client_streaming {
                String::new()
            } else {
                format!(", in *{}", method.input)
            };
            let response = if method.schema.is_streaming() {
                format!("stream {}", names.stream_client)
            } else {
                format!("out *{}", method.output)
            };
            format!(
                "{}(ctx {}.Context{request}, opts ...{}.CallOption) ({response}, err error)",
                names.method, a.context, a.client
            )
        }
        SignatureRole::Server => format!(
            "{}({}.Context, *{}) (*{}, error)",
            names.method, a.context, method.input, method.output
        ),
        SignatureRole::Adapter | SignatureRole::Interface => format!(
            "{}(ctx {}.Context, in []byte) (out []byte, err error)",
            names.adapter, a.context
        ),
    }
}
