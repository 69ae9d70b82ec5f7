use std::path::Path;

use axum::Router;
use notify::{Event, RecursiveMode, Watcher};
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

/// Serve the browser demo with live reload on every file change
pub async fn serve_static(dir: &Path, port: u16) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    // Create live reload layer
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the page whenever the demo or the wasm package is rebuilt
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                tracing::debug!(paths = ?event.paths, "reloading");
                reloader.reload();
            }
        }
    })?;
    watcher.watch(dir, RecursiveMode::Recursive)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, dir = %dir.display(), "dev server listening");

    println!("Demo server running at http://localhost:{port}");
    println!("Watching {} for changes...", dir.display());
    println!("Press Ctrl+C to stop");

    // Keep watcher alive
    let _watcher = watcher;

    axum::serve(listener, app).await?;

    Ok(())
}
