#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lingo_trainer_backend::run().await
}
