use org_server::{Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. dotenv, config, logging
    let config = setup_environment();

    print_banner();
    tracing::info!(environment = %config.environment, "Org directory server starting...");

    // 2. Open the database and serve
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
