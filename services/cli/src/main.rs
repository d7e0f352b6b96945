use job_pipeline_cli::run;

// Synchronous on purpose: the HTTP gateway owns its own tokio runtime and
// blocks on it, which panics when nested inside `#[tokio::main]`.
fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
