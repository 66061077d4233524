use book_exchange::catalog::memory::MemoryCatalog;
use book_exchange::catalog::types::CatalogSeed;
use book_exchange::config::ServerConfig;
use book_exchange::search::engine::BookQueryService;
use book_exchange::search::handlers::{SearchContext, router};
use book_exchange::viewer::ViewerDirectory;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!(
            "Usage: book-exchange [--bind <addr:port>] [--catalog <file.json>] \
             [--contact-policy public|authenticated|hidden] [--max-limit <n>]"
        );
        return Ok(());
    }

    let config = ServerConfig::from_args(&args)?;

    // 1. Catalog and viewer directory:
    let seed = match &config.catalog_path {
        Some(path) => CatalogSeed::read(path)?,
        None => {
            tracing::warn!("No catalog given (--catalog or BOOKX_CATALOG); starting empty");
            CatalogSeed::default()
        }
    };
    let viewers = Arc::new(ViewerDirectory::from_seed(&seed));
    let catalog = MemoryCatalog::from_seed(seed);

    // 2. Query service:
    let service = Arc::new(BookQueryService::with_max_limit(
        Arc::new(catalog),
        config.max_limit,
    ));

    // 3. HTTP Router:
    let max_limit = service.max_limit();
    let ctx = Arc::new(SearchContext {
        service,
        viewers,
        contact_policy: config.contact_policy,
    });
    let app = router(ctx);

    // 4. Start HTTP server:
    tracing::info!(
        "HTTP server listening on {} (contact policy: {:?}, max limit: {})",
        config.bind_addr,
        config.contact_policy,
        max_limit
    );
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
