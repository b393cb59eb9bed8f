//! Identifier derivation for generated Go code.

use crate::schema::{ServiceSchema, SourceFile};

/// Exported method names that collide with identifiers the generated client
/// or handler already defines. Matching names get a trailing `_`.
pub const RESERVED_METHOD_NAMES: &[&str] = &[];

/// Convert a schema identifier to the Go protobuf exported form.
///
/// `say_hello` becomes `SayHello`, `_private` becomes `XPrivate`, and
/// `already_Upper` keeps its underscore (`Already_Upper`) since only an
/// underscore followed by a lower-case letter is a word boundary.
pub fn camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    let mut chars = raw.chars().peekable();

    if chars.next_if_eq(&'_').is_some() {
        out.push('X');
    }

    while let Some(c) = chars.next() {
        if c == '_' && chars.peek().is_some_and(char::is_ascii_lowercase) {
            continue;
        }
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }

        out.push(c.to_ascii_uppercase());
        while let Some(next) = chars.next_if(char::is_ascii_lowercase) {
            out.push(next);
        }
    }

    out
}

/// Lower-case the first character, leaving the rest alone.
pub fn unexport(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every identifier the emitters need for one method of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    /// Exported service name, also the client interface name.
    pub service: String,
    /// Unexported client struct name.
    pub client_struct: String,
    /// `<Service>Handler`, the interface business logic implements.
    pub handler_interface: String,
    /// Unexported wrapper that owns the byte-level adapters.
    pub handler_struct: String,
    /// Interface method name, disambiguated against [`RESERVED_METHOD_NAMES`].
    pub method: String,
    /// `"<Service>.<Method>"`, the server dispatch table key.
    pub routing_key: String,
    /// `_<Service>_<Method>_Handler`.
    pub adapter: String,
    /// `<Service>_<Method>Client`, the client return type of streaming calls.
    pub stream_client: String,
}

/// Derive all generated identifiers for `method` inside `service`.
///
/// Only the interface method name is disambiguated; the routing key and the
/// adapter name are part of the wire contract and keep the plain exported
/// form.
pub fn derive(service: &str, method: &str) -> DerivedNames {
    let service = camel_case(service);
    let exported = camel_case(method);
    let handler_interface = format!("{service}Handler");

    let mut method_name = exported.clone();
    if RESERVED_METHOD_NAMES.contains(&exported.as_str()) {
        method_name.push('_');
    }

    DerivedNames {
        client_struct: unexport(&service),
        handler_struct: unexport(&handler_interface),
        method: method_name,
        routing_key: format!("{service}.{exported}"),
        adapter: format!("_{service}_{exported}_Handler"),
        stream_client: format!("{service}_{exported}Client"),
        handler_interface,
        service,
    }
}

/// Identifiers the generated code depends on: Go keywords, the predeclared
/// names it uses, and the parameters and locals of generated functions. A
/// package-level declaration or an import alias with one of these names would
/// shadow it.
pub const GO_RESERVED_IDENTS: &[&str] = &[
    // keywords
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
    // builtins
    "byte",
    "error",
    "len",
    "new",
    "nil",
    "string",
    // parameters and locals
    "c",
    "ctx",
    "err",
    "h",
    "handler",
    "hdlr",
    "in",
    "opts",
    "out",
    "req",
    "res",
    "resp",
    "s",
    "serviceName",
    "stream",
];

/// Identifiers generated once per service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    /// Exported service name, also the client interface name.
    pub service: String,
    pub client_struct: String,
    pub handler_interface: String,
    pub handler_struct: String,
    /// `New<Service>`.
    pub constructor: String,
    /// `Register<Service>Handler`.
    pub registration: String,
    /// Private interface declared inside the registration function.
    pub adapter_interface: String,
}

impl ServiceNames {
    pub fn derive(service: &str) -> Self {
        let service = camel_case(service);
        let handler_interface = format!("{service}Handler");
        Self {
            client_struct: unexport(&service),
            handler_struct: unexport(&handler_interface),
            constructor: format!("New{service}"),
            registration: format!("Register{handler_interface}"),
            adapter_interface: format!("{}Adapters", unexport(&service)),
            handler_interface,
            service,
        }
    }

    /// Names this service declares at package level.
    pub fn declarations(&self) -> [&str; 6] {
        [
            &self.service,
            &self.client_struct,
            &self.handler_interface,
            &self.handler_struct,
            &self.constructor,
            &self.registration,
        ]
    }
}

/// Name of the per-service descriptor table that slot comments refer to.
pub fn service_desc_var(service: &str) -> String {
    format!("_{}_serviceDesc", camel_case(service))
}

/// Service name the generated client sends when the caller passes an empty
/// override: the schema package if there is one, else the lower-cased raw
/// service name.
pub fn default_service_name(file: &SourceFile, service: &ServiceSchema) -> String {
    if file.package.is_empty() {
        service.name.to_lowercase()
    } else {
        file.package.clone()
    }
}

/// Go interpreted string literal for `value`.
pub fn go_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names() {
        let names = ServiceNames::derive("route_guide");
        assert_eq!(
            names.declarations(),
            [
                "RouteGuide",
                "routeGuide",
                "RouteGuideHandler",
                "routeGuideHandler",
                "NewRouteGuide",
                "RegisterRouteGuideHandler",
            ]
        );
        assert_eq!(names.adapter_interface, "routeGuideAdapters");
    }

    #[test]
    fn camel_case_follows_go_protobuf_rules() {
        assert_eq!(camel_case("say_hello"), "SayHello");
        assert_eq!(camel_case("SayHello"), "SayHello");
        assert_eq!(camel_case("sayHello"), "SayHello");
        assert_eq!(camel_case("_private"), "XPrivate");
        assert_eq!(camel_case("get_v2_item"), "GetV2Item");
        assert_eq!(camel_case("HTTPGet"), "HTTPGet");
        assert_eq!(camel_case("already_Upper"), "Already_Upper");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn unexport_only_touches_first_char() {
        assert_eq!(unexport("Greeter"), "greeter");
        assert_eq!(unexport("GreeterHandler"), "greeterHandler");
        assert_eq!(unexport("HTTPGet"), "hTTPGet");
        assert_eq!(unexport(""), "");
    }

    #[test]
    fn exported_and_unexported_differ_only_in_first_char() {
        for raw in ["say_hello", "Ping", "list_all_items", "x", "_z"] {
            let exported = camel_case(raw);
            let lowered = unexport(&exported);
            assert_eq!(exported[1..], lowered[1..], "{raw}");
            assert_eq!(
                lowered.chars().next(),
                exported.chars().next().map(|c| c.to_ascii_lowercase())
            );
        }
    }

    #[test]
    fn derive_greeter_say_hello() {
        let names = derive("greeter", "say_hello");
        assert_eq!(names.service, "Greeter");
        assert_eq!(names.client_struct, "greeter");
        assert_eq!(names.handler_interface, "GreeterHandler");
        assert_eq!(names.handler_struct, "greeterHandler");
        assert_eq!(names.method, "SayHello");
        assert_eq!(names.routing_key, "Greeter.SayHello");
        assert_eq!(names.adapter, "_Greeter_SayHello_Handler");
        assert_eq!(names.stream_client, "Greeter_SayHelloClient");
    }

    #[test]
    fn fallback_service_name() {
        let service = ServiceSchema {
            name: "Greeter".into(),
            methods: vec![],
        };
        let mut file = SourceFile {
            name: "hello.proto".into(),
            package: "helloworld".into(),
            go_package: "helloworld".into(),
            services: vec![],
        };
        assert_eq!(default_service_name(&file, &service), "helloworld");

        file.package.clear();
        assert_eq!(default_service_name(&file, &service), "greeter");
    }

    #[test]
    fn go_string_escapes() {
        assert_eq!(go_string("Greeter.SayHello"), "\"Greeter.SayHello\"");
        assert_eq!(go_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
    }
}
