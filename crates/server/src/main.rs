#[tokio::main]
async fn main() -> anyhow::Result<()> {
    climate_qa_server::start().await
}
