#[tokio::main]
async fn main() {
    tutoring_backend::run().await;
}
