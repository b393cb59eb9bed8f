#![deny(unsafe_code)]

//! protoc plugin front-end for `micro-codegen`.
//!
//! protoc writes a `CodeGeneratorRequest` to the plugin's stdin and expects a
//! `CodeGeneratorResponse` on stdout. Each requested `.proto` file that
//! declares services yields one `<name>.micro.go` file.

pub mod descriptor;
pub mod error;

use std::collections::HashMap;
use std::io::{Read, Write};

use micro_codegen::render::derive;
use micro_codegen::{GoCodegenOptions, ImportRegistry, generate_file};
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use tracing::{debug, error, info};

pub use error::PluginError;

use crate::descriptor::{TypeIndex, output_name, source_file};

pub fn read_request<R: Read>(mut reader: R) -> Result<CodeGeneratorRequest, PluginError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(CodeGeneratorRequest::decode(buf.as_slice())?)
}

pub fn write_response<W: Write>(
    mut writer: W,
    response: &CodeGeneratorResponse,
) -> Result<(), PluginError> {
    let mut buf = Vec::with_capacity(response.encoded_len());
    response.encode(&mut buf)?;
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}

/// Run the generator over `request`. Failures become the response's `error`
/// and no files are returned.
pub fn generate(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    match generate_files(request) {
        Ok(file) => CodeGeneratorResponse {
            supported_features: Some(Feature::Proto3Optional as u64),
            file,
            ..Default::default()
        },
        Err(err) => {
            error!(error = %err, "generation failed");
            CodeGeneratorResponse {
                error: Some(err.to_string()),
                ..Default::default()
            }
        }
    }
}

fn generate_files(request: &CodeGeneratorRequest) -> Result<Vec<File>, PluginError> {
    let options = GoCodegenOptions::parse(request.parameter()).map_err(PluginError::Options)?;
    let types = TypeIndex::build(&request.proto_file);
    debug!(messages = types.len(), parameter = request.parameter(), "indexed request");

    // Routing keys share one dispatch namespace across every generated file.
    let mut routing_keys: HashMap<String, String> = HashMap::new();
    let mut files = Vec::new();
    for name in &request.file_to_generate {
        let proto = request
            .proto_file
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| PluginError::MissingFile { file: name.clone() })?;

        if proto.service.is_empty() {
            debug!(file = %name, "no services, skipping");
            continue;
        }

        let schema = source_file(proto, &types)?;
        for service in &schema.services {
            for method in &service.methods {
                let key = derive(&service.name, &method.name).routing_key;
                if let Some(first) = routing_keys.get(&key)
                    && first != name
                {
                    return Err(PluginError::DuplicateRoutingKey {
                        key,
                        first: first.clone(),
                        second: name.clone(),
                    });
                }
                routing_keys.entry(key).or_insert_with(|| name.clone());
            }
        }

        let mut registry = ImportRegistry::new();
        let artifact = generate_file(&schema, &mut registry, &options).map_err(|source| {
            PluginError::Generate {
                file: name.clone(),
                source,
            }
        })?;

        let output = output_name(proto);
        info!(file = %output, services = schema.services.len(), "writing bindings");
        files.push(File {
            name: Some(output),
            content: Some(artifact.render()),
            ..Default::default()
        });
    }
    Ok(files)
}
