#[tokio::main]
async fn main() {
    leadbot_backend::run().await;
}
