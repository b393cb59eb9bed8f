use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{
    DescriptorProto, FileDescriptorProto, FileOptions, MethodDescriptorProto,
    ServiceDescriptorProto,
};
use protoc_gen_micro::{generate, read_request, write_response};

fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.into()),
        input_type: Some(input.into()),
        output_type: Some(output.into()),
        ..Default::default()
    }
}

fn common_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common/empty.proto".into()),
        package: Some("common".into()),
        message_type: vec![message("Empty")],
        options: Some(FileOptions {
            go_package: Some("github.com/acme/api/common;commonpb".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn greeter_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("helloworld/helloworld.proto".into()),
        package: Some("helloworld".into()),
        dependency: vec!["common/empty.proto".into()],
        message_type: vec![message("HelloRequest"), message("HelloResponse")],
        service: vec![ServiceDescriptorProto {
            name: Some("Greeter".into()),
            method: vec![
                method("SayHello", ".helloworld.HelloRequest", ".helloworld.HelloResponse"),
                method("Ping", ".common.Empty", ".common.Empty"),
            ],
            ..Default::default()
        }],
        options: Some(FileOptions {
            go_package: Some("github.com/acme/api/helloworld".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn request(parameter: Option<&str>) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["helloworld/helloworld.proto".into()],
        parameter: parameter.map(Into::into),
        proto_file: vec![common_proto(), greeter_proto()],
        ..Default::default()
    }
}

#[test]
fn generates_one_file_per_proto() {
    let response = generate(&request(None));
    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 1);

    let file = &response.file[0];
    assert_eq!(file.name(), "helloworld/helloworld.micro.go");

    let content = file.content();
    assert!(content.contains("package helloworld\n"));
    assert!(content.contains(
        "SayHello(ctx context.Context, in *HelloRequest, opts ...client.CallOption) (out *HelloResponse, err error)"
    ));
    assert!(content.contains("commonpb \"github.com/acme/api/common\""));
    assert!(content.contains("Ping(context.Context, *commonpb.Empty) (*commonpb.Empty, error)"));
    assert!(content.contains("handler.Add(common.GenRid(\"Greeter.Ping\"), &server.RpcItem{"));
}

#[test]
fn files_without_services_are_skipped() {
    let mut req = request(None);
    req.file_to_generate = vec!["common/empty.proto".into()];
    let response = generate(&req);
    assert_eq!(response.error, None);
    assert!(response.file.is_empty());
}

#[test]
fn unknown_type_is_reported() {
    let mut req = request(None);
    req.proto_file[1].service[0]
        .method
        .push(method("Lost", ".helloworld.Missing", ".helloworld.HelloResponse"));

    let response = generate(&req);
    assert!(response.file.is_empty());
    let error = response.error.expect("error is reported");
    assert!(error.contains("Greeter.Lost"), "{error}");
    assert!(error.contains(".helloworld.Missing"), "{error}");
}

#[test]
fn generator_errors_name_the_file() {
    let mut req = request(None);
    req.proto_file[1].service[0]
        .method
        .push(method("say_hello", ".helloworld.HelloRequest", ".helloworld.HelloResponse"));

    let response = generate(&req);
    assert!(response.file.is_empty());
    let error = response.error.expect("error is reported");
    assert!(error.starts_with("helloworld/helloworld.proto: "), "{error}");
}

#[test]
fn routing_keys_are_unique_across_files() {
    let mut copy = greeter_proto();
    copy.name = Some("helloworld/greeter_copy.proto".into());
    copy.message_type.clear();

    let mut req = request(None);
    req.proto_file.push(copy);
    req.file_to_generate.push("helloworld/greeter_copy.proto".into());

    let response = generate(&req);
    assert!(response.file.is_empty());
    let error = response.error.expect("error is reported");
    assert!(error.contains("\"Greeter.SayHello\""), "{error}");
    assert!(error.contains("helloworld/helloworld.proto"), "{error}");
    assert!(error.contains("helloworld/greeter_copy.proto"), "{error}");
}

#[test]
fn missing_descriptor_is_reported() {
    let mut req = request(None);
    req.file_to_generate.push("nope.proto".into());
    let response = generate(&req);
    assert!(response.error.expect("error is reported").contains("nope.proto"));
}

#[test]
fn parameter_controls_runtime_imports() {
    let response = generate(&request(Some("client_pkg=example.com/rpc/transport")));
    assert_eq!(response.error, None);
    let content = response.file[0].content();
    assert!(content.contains("transport \"example.com/rpc/transport\""));
    assert!(content.contains("c           *transport.Client"));

    let response = generate(&request(Some("bogus")));
    assert!(response.error.is_some());
    assert!(response.file.is_empty());
}

#[test]
fn request_and_response_streams() {
    let bytes = request(None).encode_to_vec();
    let decoded = read_request(bytes.as_slice()).expect("request decodes");
    assert_eq!(decoded, request(None));

    let response = generate(&decoded);
    let mut out = Vec::new();
    write_response(&mut out, &response).expect("response encodes");
    let echoed = CodeGeneratorResponse::decode(out.as_slice()).expect("response decodes");
    assert_eq!(echoed, response);
}
