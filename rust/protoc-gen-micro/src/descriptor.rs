//! Conversion from protobuf descriptors to the generator's schema model.

use std::collections::HashMap;

use micro_codegen::render::camel_case;
use micro_codegen::schema::{GoPackage, MethodSchema, ServiceSchema, SourceFile, TypeRef};
use prost_types::{DescriptorProto, FileDescriptorProto};

use crate::error::PluginError;

/// Go package a proto file is generated into.
pub fn go_package(file: &FileDescriptorProto) -> GoPackage {
    let option = file
        .options
        .as_ref()
        .map(|o| o.go_package())
        .filter(|p| !p.is_empty());

    if let Some(option) = option {
        if let Some((path, name)) = option.split_once(';') {
            return GoPackage {
                import_path: path.to_string(),
                name: go_identifier(name),
            };
        }
        let name = option.rsplit('/').next().unwrap_or(option);
        return GoPackage {
            import_path: option.to_string(),
            name: go_identifier(name),
        };
    }

    let file_name = file.name();
    let import_path = match file_name.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    };
    let name = if file.package().is_empty() {
        file_stem(file_name).to_string()
    } else {
        file.package().to_string()
    };
    GoPackage {
        import_path,
        name: go_identifier(&name),
    }
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.strip_suffix(".proto").unwrap_or(base)
}

fn go_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Output path for the bindings of `file`: `foo/bar.proto` becomes
/// `foo/bar.micro.go`.
pub fn output_name(file: &FileDescriptorProto) -> String {
    let name = file.name();
    let stem = name.strip_suffix(".proto").unwrap_or(name);
    format!("{stem}.micro.go")
}

/// Every message type in the request, keyed by fully-qualified proto name
/// (`.pkg.Outer.Inner`).
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: HashMap<String, (String, GoPackage)>,
}

impl TypeIndex {
    pub fn build(files: &[FileDescriptorProto]) -> Self {
        let mut index = Self::default();
        for file in files {
            let package = go_package(file);
            let prefix = if file.package().is_empty() {
                String::new()
            } else {
                format!(".{}", file.package())
            };
            for message in &file.message_type {
                index.add(message, &prefix, None, &package);
            }
        }
        index
    }

    fn add(
        &mut self,
        message: &DescriptorProto,
        proto_prefix: &str,
        go_parent: Option<&str>,
        package: &GoPackage,
    ) {
        let proto_name = format!("{proto_prefix}.{}", message.name());
        let go_name = match go_parent {
            Some(parent) => format!("{parent}_{}", camel_case(message.name())),
            None => camel_case(message.name()),
        };
        for nested in &message.nested_type {
            self.add(nested, &proto_name, Some(&go_name), package);
        }
        self.types.insert(proto_name, (go_name, package.clone()));
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve `proto_name` as seen from code generated into `target`.
    pub fn resolve(&self, proto_name: &str, target: &GoPackage) -> Option<TypeRef> {
        let (go_name, package) = self.types.get(proto_name)?;
        if package.import_path == target.import_path {
            Some(TypeRef::local(go_name.clone()))
        } else {
            Some(TypeRef::foreign(go_name.clone(), package.clone()))
        }
    }
}

/// Build the generator's view of `file`.
pub fn source_file(
    file: &FileDescriptorProto,
    types: &TypeIndex,
) -> Result<SourceFile, PluginError> {
    let target = go_package(file);

    let mut services = Vec::with_capacity(file.service.len());
    for service in &file.service {
        let mut methods = Vec::with_capacity(service.method.len());
        for method in &service.method {
            let resolve = |proto_name: &str| {
                types
                    .resolve(proto_name, &target)
                    .ok_or_else(|| PluginError::UnknownType {
                        name: proto_name.to_string(),
                        method: format!("{}.{}", service.name(), method.name()),
                    })
            };
            methods.push(MethodSchema {
                name: method.name().to_string(),
                input: resolve(method.input_type())?,
                output: resolve(method.output_type())?,
                client_streaming: method.client_streaming(),
                server_streaming: method.server_streaming(),
            });
        }
        services.push(ServiceSchema {
            name: service.name().to_string(),
            methods,
        });
    }

    Ok(SourceFile {
        name: file.name().to_string(),
        package: file.package().to_string(),
        go_package: target.name,
        services,
    })
}

#[cfg(test)]
mod tests {
    use prost_types::FileOptions;

    use super::*;

    fn file(name: &str, package: &str, go_package: Option<&str>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.into()),
            package: Some(package.into()),
            options: go_package.map(|p| FileOptions {
                go_package: Some(p.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn go_package_from_option() {
        let pkg = go_package(&file("a.proto", "acme.v1", Some("github.com/acme/api/v1;apiv1")));
        assert_eq!(pkg.import_path, "github.com/acme/api/v1");
        assert_eq!(pkg.name, "apiv1");

        let pkg = go_package(&file("a.proto", "acme.v1", Some("github.com/acme/api/v1")));
        assert_eq!(pkg.name, "v1");
    }

    #[test]
    fn go_package_without_option() {
        let pkg = go_package(&file("acme/a.proto", "acme.v1", None));
        assert_eq!(pkg.import_path, "acme");
        assert_eq!(pkg.name, "acme_v1");

        let pkg = go_package(&file("hello-world.proto", "", None));
        assert_eq!(pkg.import_path, "");
        assert_eq!(pkg.name, "hello_world");
    }

    #[test]
    fn output_names() {
        assert_eq!(output_name(&file("acme/a.proto", "", None)), "acme/a.micro.go");
    }

    #[test]
    fn nested_messages_are_joined() {
        let mut f = file("a.proto", "acme", None);
        f.message_type.push(DescriptorProto {
            name: Some("outer".into()),
            nested_type: vec![DescriptorProto {
                name: Some("inner_item".into()),
                ..Default::default()
            }],
            ..Default::default()
        });
        let index = TypeIndex::build(&[f.clone()]);
        assert_eq!(index.len(), 2);
        let target = go_package(&f);
        assert_eq!(
            index.resolve(".acme.outer.inner_item", &target),
            Some(TypeRef::local("Outer_InnerItem"))
        );
        assert_eq!(index.resolve(".acme.missing", &target), None);
    }
}
