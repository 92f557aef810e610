use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    legacy_bootstrap_lib::run().await
}
