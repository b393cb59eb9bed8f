//! Server-side emission: handler interface, registration, wrapper and
//! byte-level adapters.
//!
//! The wrapper holds the user's handler in a named field and forwards each
//! typed call explicitly. Adapters keep no state between requests, so the
//! shared dispatch table can call them concurrently.

use super::signature::{SignatureRole, build_signature};
use super::{EmitContext, MethodPlan, ServicePlan};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;
use crate::error::Result;
use crate::render::go_string;

pub(super) fn interface(plan: &ServicePlan<'_>, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    cw_writeln!(w, "// Server API for {} service", plan.names.service)?;
    w.blank_line()?;
    w.block(&format!("type {} interface", plan.names.handler_interface), |w| {
        for method in &plan.methods {
            w.writeln(&build_signature(SignatureRole::Server, method, ctx))?;
        }
        Ok(())
    })?;
    w.blank_line()?;
    Ok(out)
}

/// `Register<Service>Handler`: wraps the handler and adds one dispatch entry
/// per method, keyed by its routing key.
pub(super) fn registration(plan: &ServicePlan<'_>, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);
    let server = &ctx.aliases.server;
    let common = &ctx.aliases.common;

    let header = format!(
        "func {}(s *{server}.Server, hdlr {}, opts ...{server}.HandlerOption)",
        plan.names.registration, plan.names.handler_interface,
    );
    w.block(&header, |w| {
        w.block(&format!("type {} interface", plan.names.adapter_interface), |w| {
            for method in &plan.methods {
                w.writeln(&build_signature(SignatureRole::Interface, method, ctx))?;
            }
            Ok(())
        })?;
        cw_writeln!(
            w,
            "var h {} = &{}{{handler: hdlr}}",
            plan.names.adapter_interface, plan.names.handler_struct
        )?;
        if plan.methods.is_empty() {
            w.writeln("_ = h")?;
        }
        cw_writeln!(w, "handler := {server}.RpcHandler()")?;

        for method in &plan.methods {
            let key = go_string(&method.names.routing_key);
            w.comment(&method.slot.expr(&plan.desc_var))?;
            cw_writeln!(
                w,
                "handler.Add({common}.GenRid({key}), &{server}.RpcItem{{"
            )?;
            {
                let _indent = w.indent();
                cw_writeln!(w, "Call: h.{},", method.names.adapter)?;
                cw_writeln!(w, "Name: {key},")?;
            }
            w.writeln("})")?;
        }
        w.writeln("s.NewHandler(handler)")
    })?;
    w.blank_line()?;
    Ok(out)
}

pub(super) fn handler_struct(plan: &ServicePlan<'_>) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    w.block(&format!("type {} struct", plan.names.handler_struct), |w| {
        cw_writeln!(w, "handler {}", plan.names.handler_interface)
    })?;
    w.blank_line()?;
    Ok(out)
}

/// Decode, invoke, encode. Each stage returns its error unchanged, and a
/// failed stage skips everything after it.
pub(super) fn adapter(
    plan: &ServicePlan<'_>,
    method: &MethodPlan<'_>,
    ctx: &EmitContext,
) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);

    let header = format!(
        "func (h *{}) {}",
        plan.names.handler_struct,
        build_signature(SignatureRole::Adapter, method, ctx)
    );
    w.block(&header, |w| {
        cw_writeln!(w, "var req {}", method.input)?;
        w.block("if err = req.Unmarshal(in); err != nil", |w| {
            w.writeln("return nil, err")
        })?;
        cw_writeln!(w, "res, err := h.handler.{}(ctx, &req)", method.names.method)?;
        w.block("if err != nil", |w| w.writeln("return nil, err"))?;
        w.writeln("return res.Marshal()")
    })?;
    w.blank_line()?;
    Ok(out)
}
