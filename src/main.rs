use kornia_vqa::{VqaEngine, config::ServerArgs, loader::PaligemmaVqa, server};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ServerArgs = argh::from_env();

    // the model is loaded before binding so no request ever sees a cold engine
    let model = PaligemmaVqa::load(args.sample_len)?;
    let engine = Arc::new(VqaEngine::new(model, args.max_in_flight));

    let app = server::router(engine, args.max_upload_bytes);

    let addr = args.addr();
    log::info!("🚀 Starting the server");
    log::info!("🔥 Listening on: {}", addr);
    log::info!("🔧 Admitting up to {} concurrent requests", args.max_in_flight.max(1));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
