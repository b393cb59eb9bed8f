//! Positional slots in the per-service `Methods` / `Streams` descriptor
//! tables.
//!
//! Slots are assigned in two passes so that an index depends only on the
//! method's position within its class, never on the order in which emitters
//! happen to ask for it.

use std::fmt;

use crate::schema::ServiceSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Neither side streams.
    Unary,
    /// Either side streams.
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSlot {
    pub kind: SlotKind,
    pub index: usize,
}

impl DescriptorSlot {
    /// Go expression addressing this slot in `desc_var`.
    pub fn expr(&self, desc_var: &str) -> String {
        format!("&{desc_var}.{self}")
    }
}

impl fmt::Display for DescriptorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SlotKind::Unary => write!(f, "Methods[{}]", self.index),
            SlotKind::Stream => write!(f, "Streams[{}]", self.index),
        }
    }
}

/// One slot per method, in schema order.
pub fn index_descriptors(service: &ServiceSchema) -> Vec<DescriptorSlot> {
    let kinds: Vec<SlotKind> = service
        .methods
        .iter()
        .map(|m| {
            // Client-only streams count too; go-micro's generator keys on the
            // server flag alone.
            if m.is_streaming() {
                SlotKind::Stream
            } else {
                SlotKind::Unary
            }
        })
        .collect();

    let mut next_unary = 0;
    let mut next_stream = 0;
    kinds
        .into_iter()
        .map(|kind| {
            let counter = match kind {
                SlotKind::Unary => &mut next_unary,
                SlotKind::Stream => &mut next_stream,
            };
            let index = *counter;
            *counter += 1;
            DescriptorSlot { kind, index }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MethodSchema, TypeRef};

    fn method(name: &str, client_streaming: bool, server_streaming: bool) -> MethodSchema {
        MethodSchema {
            client_streaming,
            server_streaming,
            ..MethodSchema::unary(name, TypeRef::local("Req"), TypeRef::local("Resp"))
        }
    }

    #[test]
    fn unary_and_stream_counted_separately() {
        let service = ServiceSchema {
            name: "Chat".into(),
            methods: vec![
                method("Get", false, false),
                method("Watch", false, true),
                method("Put", false, false),
                method("Upload", true, false),
                method("Talk", true, true),
            ],
        };
        let slots: Vec<String> = index_descriptors(&service)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            slots,
            [
                "Methods[0]",
                "Streams[0]",
                "Methods[1]",
                "Streams[1]",
                "Streams[2]"
            ]
        );
    }

    #[test]
    fn slot_expression() {
        let slot = DescriptorSlot {
            kind: SlotKind::Stream,
            index: 3,
        };
        assert_eq!(
            slot.expr("_Chat_serviceDesc"),
            "&_Chat_serviceDesc.Streams[3]"
        );
    }
}
