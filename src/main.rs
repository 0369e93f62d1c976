use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match unify_clinic::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
