//! Client-side emission: interface, struct, constructor and method bodies.
//!
//! The client struct holds only the transport handle and the resolved service
//! name, both fixed at construction, so one instance can serve concurrent
//! callers.

use super::signature::{SignatureRole, build_signature};
use super::{EmitContext, MethodPlan, ServicePlan};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;
use crate::error::Result;
use crate::render::go_string;

/// `type <Service> interface { ... }` with one typed method per RPC.
pub(super) fn interface(plan: &ServicePlan<'_>, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    cw_writeln!(w, "// Client API for {} service", plan.names.service)?;
    w.blank_line()?;
    w.block(&format!("type {} interface", plan.names.service), |w| {
        for method in &plan.methods {
            w.writeln(&build_signature(SignatureRole::Client, method, ctx))?;
        }
        Ok(())
    })?;
    w.blank_line()?;
    Ok(out)
}

pub(super) fn client_struct(plan: &ServicePlan<'_>, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    w.block(&format!("type {} struct", plan.names.client_struct), |w| {
        w.writeln("serviceName string")?;
        cw_writeln!(w, "c           *{}.Client", ctx.aliases.client)
    })?;
    w.blank_line()?;
    Ok(out)
}

/// `New<Service>(c, serviceName)`. An empty `serviceName` falls back to the
/// schema package, so one client type can target differently named
/// deployments of the same service.
pub(super) fn constructor(plan: &ServicePlan<'_>, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    let header = format!(
        "func {}(c *{}.Client, serviceName string) {}",
        plan.names.constructor, ctx.aliases.client, plan.names.service,
    );
    w.block(&header, |w| {
        w.block("if len(serviceName) == 0", |w| {
            cw_writeln!(w, "serviceName = {}", go_string(&plan.default_service_name))
        })?;
        cw_writeln!(w, "return &{}{{", plan.names.client_struct)?;
        {
            let _indent = w.indent();
            w.writeln("serviceName: serviceName,")?;
            w.writeln("c:           c,")?;
        }
        w.writeln("}")
    })?;
    w.blank_line()?;
    Ok(out)
}

/// Placeholder for the stream handle a streaming method returns.
pub(super) fn stream_client_type(
    plan: &ServicePlan<'_>,
    method: &MethodPlan<'_>,
) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    cw_writeln!(
        w,
        "// {} is the client side of the {} stream.",
        method.names.stream_client, method.names.routing_key
    )?;
    cw_writeln!(w, "// The {} transport does not carry streams yet.", plan.names.service)?;
    cw_writeln!(w, "type {} interface{{}}", method.names.stream_client)?;
    w.blank_line()?;
    Ok(out)
}

/// One client method body.
///
/// Unary calls: reject a nil request before touching the transport, build the
/// request tagged with the routing key, call, and decode only on success. A
/// decode failure returns a nil response.
pub(super) fn method(
    plan: &ServicePlan<'_>,
    method: &MethodPlan<'_>,
    ctx: &EmitContext,
) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    let key = go_string(&method.names.routing_key);
    let header = format!(
        "func (c *{}) {}",
        plan.names.client_struct,
        build_signature(SignatureRole::Client, method, ctx)
    );

    w.block(&header, |w| {
        if method.schema.is_streaming() {
            let message = format!(
                "{}: streaming calls are not supported",
                method.names.routing_key
            );
            return cw_writeln!(w, "return nil, {}.New({})", ctx.errors, go_string(&message));
        }

        let nil_message = format!("{} req is nil", method.names.routing_key);
        w.block("if in == nil", |w| {
            cw_writeln!(w, "return nil, {}.New({})", ctx.errors, go_string(&nil_message))
        })?;
        cw_writeln!(w, "req := c.c.NewRequest(c.serviceName, {key}, in)")?;
        w.writeln("res, err := c.c.Call(ctx, req, in, opts...)")?;
        w.block("if err != nil", |w| w.writeln("return nil, err"))?;
        cw_writeln!(w, "resp := new({})", method.output)?;
        w.block("if err := resp.Unmarshal(res); err != nil", |w| {
            w.writeln("return nil, err")
        })?;
        w.writeln("return resp, nil")
    })?;
    w.blank_line()?;
    Ok(out)
}
