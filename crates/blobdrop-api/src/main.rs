use blobdrop_core::Config;

// Use mimalloc as the global allocator for lower fragmentation inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, routes)
    let (_state, router) = blobdrop_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    blobdrop_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
