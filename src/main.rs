use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    websearch::cli::run().await
}
