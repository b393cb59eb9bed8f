//! Import alias bookkeeping for one generated file.
//!
//! Every Go package the generated code refers to gets an alias that is unique
//! within the file. The registry lives for a single generation run; nothing
//! about it is global.

use std::collections::{BTreeMap, HashSet};

use crate::schema::GoPackage;

/// Default import path of the RPC client runtime.
pub const DEFAULT_CLIENT_PKG: &str = "github.com/shockerjue/gffg/client";
/// Default import path of the RPC server runtime.
pub const DEFAULT_SERVER_PKG: &str = "github.com/shockerjue/gffg/server";
/// Default import path of the shared runtime helpers (`GenRid`).
pub const DEFAULT_COMMON_PKG: &str = "github.com/shockerjue/gffg/common";

/// Hands out collision-free package aliases.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    in_use: HashSet<String>,
    by_path: BTreeMap<String, String>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as taken without associating an import with it.
    pub fn reserve(&mut self, name: &str) {
        self.in_use.insert(name.to_string());
    }

    /// Register `base` and return the alias to use. Taken names get a numeric
    /// suffix: `context`, `context1`, `context2`, ...
    pub fn register_unique(&mut self, base: &str) -> String {
        let base = sanitize(base);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.in_use.contains(&candidate) {
            candidate = format!("{base}{n}");
            n += 1;
        }
        self.in_use.insert(candidate.clone());
        candidate
    }

    /// Alias for `package`, registering it on first use. The same import path
    /// always yields the same alias.
    pub fn alias_for(&mut self, package: &GoPackage) -> String {
        if let Some(alias) = self.by_path.get(&package.import_path) {
            return alias.clone();
        }
        let alias = self.register_unique(&package.name);
        self.by_path.insert(package.import_path.clone(), alias.clone());
        alias
    }

    /// Imports registered through [`alias_for`](Self::alias_for), ordered by
    /// import path.
    pub fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path.iter().map(|(path, alias)| (path.as_str(), alias.as_str()))
    }
}

/// Turn an arbitrary package name into a Go identifier.
fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Import paths for the four runtime package roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub context: String,
    pub client: String,
    pub server: String,
    pub common: String,
}

impl Default for RuntimePaths {
    fn default() -> Self {
        Self {
            context: "context".into(),
            client: DEFAULT_CLIENT_PKG.into(),
            server: DEFAULT_SERVER_PKG.into(),
            common: DEFAULT_COMMON_PKG.into(),
        }
    }
}

impl RuntimePaths {
    /// Prefix every path with `prefix` (`prefix/path`). An empty prefix is a
    /// no-op.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        let join = |path: &str| {
            if prefix.is_empty() {
                path.to_string()
            } else {
                format!("{}/{}", prefix.trim_end_matches('/'), path)
            }
        };
        Self {
            context: join(&self.context),
            client: join(&self.client),
            server: join(&self.server),
            common: join(&self.common),
        }
    }
}

/// Aliases for the runtime packages, referenced verbatim in every emitted
/// signature and call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageAliases {
    pub context: String,
    pub client: String,
    pub server: String,
    pub common: String,
}

impl PackageAliases {
    /// Register the four roles in fixed order: context, client, server,
    /// common.
    pub fn register(registry: &mut ImportRegistry, paths: &RuntimePaths) -> Self {
        let mut role = |path: &str, fallback: &str| {
            let name = path.rsplit('/').next().unwrap_or(fallback);
            registry.alias_for(&GoPackage {
                import_path: path.to_string(),
                name: (if name.is_empty() { fallback } else { name }).to_string(),
            })
        };
        let context = role(&paths.context, "context");
        let client = role(&paths.client, "client");
        let server = role(&paths.server, "server");
        let common = role(&paths.common, "common");
        Self {
            context,
            client,
            server,
            common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_suffix_on_collision() {
        let mut registry = ImportRegistry::new();
        registry.reserve("client");
        assert_eq!(registry.register_unique("client"), "client1");
        assert_eq!(registry.register_unique("client"), "client2");
        assert_eq!(registry.register_unique("server"), "server");
    }

    #[test]
    fn same_path_same_alias() {
        let mut registry = ImportRegistry::new();
        let pkg = GoPackage {
            import_path: "github.com/acme/types".into(),
            name: "types".into(),
        };
        let first = registry.alias_for(&pkg);
        let second = registry.alias_for(&pkg);
        assert_eq!(first, "types");
        assert_eq!(first, second);
        assert_eq!(registry.imports().count(), 1);
    }

    #[test]
    fn runtime_roles_avoid_file_package() {
        let mut registry = ImportRegistry::new();
        registry.reserve("server");
        let aliases = PackageAliases::register(&mut registry, &RuntimePaths::default());
        assert_eq!(aliases.context, "context");
        assert_eq!(aliases.client, "client");
        assert_eq!(aliases.server, "server1");
        assert_eq!(aliases.common, "common");
    }

    #[test]
    fn prefix_is_joined() {
        let paths = RuntimePaths::default().with_prefix("vendor/");
        assert_eq!(paths.context, "vendor/context");
        assert_eq!(paths.client, "vendor/github.com/shockerjue/gffg/client");
    }

    #[test]
    fn sanitizes_package_names() {
        let mut registry = ImportRegistry::new();
        assert_eq!(registry.register_unique("my-pkg"), "my_pkg");
        assert_eq!(registry.register_unique("2fa"), "_2fa");
    }
}
