use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    goodwe_bridge::run().await
}
