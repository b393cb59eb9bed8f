use std::io;

use anyhow::Context;
use protoc_gen_micro::{generate, read_request, write_response};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // stdout carries the protobuf response, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let request =
        read_request(io::stdin().lock()).context("reading CodeGeneratorRequest from stdin")?;
    let response = generate(&request);
    write_response(io::stdout().lock(), &response)
        .context("writing CodeGeneratorResponse to stdout")?;
    Ok(())
}
