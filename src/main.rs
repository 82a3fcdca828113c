use post_receive_ci::pipeline;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // stdout is relayed to the pushing client and carries only the dispatch
    // report; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = pipeline::run().await {
        error!("post-receive hook failed: {}", e);
        std::process::exit(1);
    }
}
