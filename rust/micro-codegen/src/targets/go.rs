//! Go bindings for the gffg RPC runtime.
//!
//! For every service the driver emits, in this order: the client interface,
//! the client struct, its constructor, one client method per RPC, the handler
//! interface, the registration function, the handler wrapper struct and one
//! byte-level adapter per RPC.

mod client;
mod descriptor;
mod server;
mod signature;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

pub use descriptor::{DescriptorSlot, SlotKind, index_descriptors};

use crate::artifact::{ArtifactBlock, BlockKind, GeneratedArtifact};
use crate::code_writer::CodeWriter;
use crate::cw_writeln;
use crate::error::{GenerateError, Result};
use crate::imports::{ImportRegistry, PackageAliases};
use crate::options::GoCodegenOptions;
use crate::render::{
    DerivedNames, GO_RESERVED_IDENTS, ServiceNames, default_service_name, derive, go_string,
    service_desc_var,
};
use crate::schema::{MethodSchema, ServiceSchema, SourceFile, TypeRef};

/// Everything the emitters need about one method, resolved up front.
#[derive(Debug, Clone)]
pub(crate) struct MethodPlan<'a> {
    pub schema: &'a MethodSchema,
    pub names: DerivedNames,
    /// Go spelling of the input type, qualified if foreign.
    pub input: String,
    /// Go spelling of the output type, qualified if foreign.
    pub output: String,
    pub slot: DescriptorSlot,
}

/// Everything the emitters need about one service.
#[derive(Debug, Clone)]
pub(crate) struct ServicePlan<'a> {
    pub names: ServiceNames,
    pub desc_var: String,
    /// Routing namespace used when the constructor gets an empty override.
    pub default_service_name: String,
    pub methods: Vec<MethodPlan<'a>>,
}

/// Package aliases and type spellings shared by every service of a file.
pub(crate) struct EmitContext {
    pub aliases: PackageAliases,
    /// Alias of the standard `errors` package.
    pub errors: String,
    foreign: HashMap<String, String>,
}

impl EmitContext {
    /// Go spelling of `ty`: bare for local types, `alias.Name` otherwise.
    pub fn type_name(&self, ty: &TypeRef) -> String {
        match &ty.package {
            Some(pkg) => match self.foreign.get(&pkg.import_path) {
                Some(alias) => format!("{alias}.{}", ty.go_name),
                None => ty.go_name.clone(),
            },
            None => ty.go_name.clone(),
        }
    }
}

/// Resolve names, type spellings and descriptor slots for one service.
pub(crate) fn plan_service<'a>(
    file: &SourceFile,
    service: &'a ServiceSchema,
    ctx: &EmitContext,
) -> ServicePlan<'a> {
    let slots = index_descriptors(service);

    let methods = service
        .methods
        .iter()
        .zip(slots)
        .map(|(method, slot)| MethodPlan {
            schema: method,
            names: derive(&service.name, &method.name),
            input: ctx.type_name(&method.input),
            output: ctx.type_name(&method.output),
            slot,
        })
        .collect();

    ServicePlan {
        names: ServiceNames::derive(&service.name),
        desc_var: service_desc_var(&service.name),
        default_service_name: default_service_name(file, service),
        methods,
    }
}

/// Reject schemas whose generated names would collide. Runs before anything is
/// emitted so a failure leaves no partial output.
fn validate(file: &SourceFile) -> Result<()> {
    let mut routing_keys = HashSet::new();
    let mut declared: HashMap<String, String> = HashMap::new();
    let mut declare = |name: &str, owner: &str| {
        if GO_RESERVED_IDENTS.contains(&name) {
            return Err(GenerateError::ReservedName {
                name: name.to_string(),
                owner: owner.to_string(),
            });
        }
        match declared.get(name) {
            Some(first) => Err(GenerateError::NameCollision {
                name: name.to_string(),
                first: first.clone(),
                second: owner.to_string(),
            }),
            None => {
                declared.insert(name.to_string(), owner.to_string());
                Ok(())
            }
        }
    };

    for service in &file.services {
        if service.name.is_empty() {
            return Err(GenerateError::EmptyServiceName {
                file: file.name.clone(),
            });
        }

        let mut exported: HashMap<String, &str> = HashMap::new();
        for (index, method) in service.methods.iter().enumerate() {
            if method.name.is_empty() {
                return Err(GenerateError::EmptyMethodName {
                    service: service.name.clone(),
                    index,
                });
            }
            let names = derive(&service.name, &method.name);
            if let Some(first) = exported.insert(names.method.clone(), method.name.as_str()) {
                return Err(GenerateError::DuplicateMethod {
                    service: service.name.clone(),
                    first: first.to_string(),
                    second: method.name.clone(),
                    exported: names.method,
                });
            }
            if !routing_keys.insert(names.routing_key.clone()) {
                return Err(GenerateError::DuplicateRoutingKey {
                    key: names.routing_key,
                });
            }
            if method.is_streaming() {
                declare(
                    &names.stream_client,
                    &format!("method {}.{}", service.name, method.name),
                )?;
            }
        }

        let owner = format!("service {}", service.name);
        for name in ServiceNames::derive(&service.name).declarations() {
            declare(name, &owner)?;
        }
    }

    Ok(())
}

/// Emit every block for one service, in driver order.
pub(crate) fn generate_service(
    plan: &ServicePlan<'_>,
    ctx: &EmitContext,
) -> Result<Vec<ArtifactBlock>> {
    debug!(
        service = %plan.names.service,
        methods = plan.methods.len(),
        "generating service bindings"
    );

    let mut blocks = vec![
        block(BlockKind::ClientInterface, client::interface(plan, ctx)?),
        block(BlockKind::ClientStruct, client::client_struct(plan, ctx)?),
        block(BlockKind::Constructor, client::constructor(plan, ctx)?),
    ];

    for method in &plan.methods {
        debug!(routing_key = %method.names.routing_key, slot = %method.slot, "client method");
        if method.schema.is_streaming() {
            blocks.push(block(
                BlockKind::StreamClientType,
                client::stream_client_type(plan, method)?,
            ));
        }
        blocks.push(block(BlockKind::ClientMethod, client::method(plan, method, ctx)?));
    }

    blocks.push(block(BlockKind::ServerInterface, server::interface(plan, ctx)?));
    blocks.push(block(BlockKind::Registration, server::registration(plan, ctx)?));
    blocks.push(block(BlockKind::HandlerStruct, server::handler_struct(plan)?));
    for method in &plan.methods {
        blocks.push(block(BlockKind::ServerAdapter, server::adapter(plan, method, ctx)?));
    }

    Ok(blocks)
}

fn block(kind: BlockKind, text: String) -> ArtifactBlock {
    ArtifactBlock { kind, text }
}

/// Generate the complete Go source for one schema file.
///
/// `registry` should be fresh for each file. The file's own package name, every
/// name a service declares and [`GO_RESERVED_IDENTS`] are reserved before any
/// alias is handed out, so no import can be shadowed.
pub fn generate_file(
    file: &SourceFile,
    registry: &mut ImportRegistry,
    options: &GoCodegenOptions,
) -> Result<GeneratedArtifact> {
    validate(file)?;

    let mut artifact = GeneratedArtifact::default();
    artifact.push(BlockKind::Header, header(file)?);

    if file.services.is_empty() {
        info!(file = %file.name, "no services, emitting package clause only");
        return Ok(artifact);
    }

    registry.reserve(&file.go_package);
    for name in GO_RESERVED_IDENTS {
        registry.reserve(name);
    }
    for service in &file.services {
        let names = ServiceNames::derive(&service.name);
        for name in names.declarations() {
            registry.reserve(name);
        }
        registry.reserve(&names.adapter_interface);
        for method in service.methods.iter().filter(|m| m.is_streaming()) {
            registry.reserve(&derive(&service.name, &method.name).stream_client);
        }
    }
    let errors = registry.register_unique("errors");
    let aliases = PackageAliases::register(registry, &options.runtime_paths());

    let mut foreign = HashMap::new();
    for method in file.services.iter().flat_map(|s| &s.methods) {
        for ty in [&method.input, &method.output] {
            if let Some(pkg) = &ty.package {
                let alias = registry.alias_for(pkg);
                foreign.insert(pkg.import_path.clone(), alias);
            }
        }
    }
    let ctx = EmitContext {
        aliases,
        errors,
        foreign,
    };

    artifact.push(BlockKind::Imports, imports(registry, &ctx)?);
    for service in &file.services {
        let plan = plan_service(file, service, &ctx);
        artifact.extend(generate_service(&plan, &ctx)?);
    }

    info!(
        file = %file.name,
        services = file.services.len(),
        blocks = artifact.blocks.len(),
        "generated go bindings"
    );
    Ok(artifact)
}

fn header(file: &SourceFile) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);
    w.comment("Code generated by protoc-gen-micro. DO NOT EDIT.")?;
    cw_writeln!(w, "// source: {}", file.name)?;
    w.blank_line()?;
    cw_writeln!(w, "package {}", file.go_package)?;
    w.blank_line()?;
    Ok(out)
}

fn imports(registry: &ImportRegistry, ctx: &EmitContext) -> Result<String> {
    let mut out = String::new();
    let mut w = CodeWriter::go(&mut out);
    w.paren_block("import", |w| {
        if ctx.errors == "errors" {
            w.writeln("\"errors\"")?;
        } else {
            cw_writeln!(w, "{} \"errors\"", ctx.errors)?;
        }
        w.blank_line()?;
        for (path, alias) in registry.imports() {
            cw_writeln!(w, "{alias} {}", go_string(path))?;
        }
        Ok(())
    })?;
    w.blank_line()?;

    let a = &ctx.aliases;
    w.comment("Reference imports to suppress errors if they are not otherwise used.")?;
    cw_writeln!(w, "var _ = {}.New", ctx.errors)?;
    cw_writeln!(w, "var _ {}.Context", a.context)?;
    cw_writeln!(w, "var _ *{}.Client", a.client)?;
    cw_writeln!(w, "var _ *{}.Server", a.server)?;
    cw_writeln!(w, "var _ = {}.GenRid", a.common)?;
    w.blank_line()?;
    Ok(out)
}
