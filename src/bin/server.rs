use anyhow::Result;
use axum::Server;
use tower::{
    limit::GlobalConcurrencyLimitLayer, load_shed::LoadShedLayer, make::Shared, ServiceBuilder,
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phonebook::{
    client::HttpRemote,
    config::{config_path_from_env, Config},
    controller::Controller,
    server::router,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::read(config_path_from_env())?;

    let remote = HttpRemote::start(config.remote_url.clone())?;

    let controller = &*Box::leak(Box::new(
        Controller::start(remote, config.notification_timeout()).await,
    ));

    let make_service = Shared::new(
        ServiceBuilder::new()
            .layer(LoadShedLayer::new())
            .layer(GlobalConcurrencyLimitLayer::new(config.request_limit))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default().include_headers(true)),
            )
            .service(router(controller)),
    );

    tracing::info!("Listening on {}", config.bind_addr);
    Server::bind(&config.bind_addr).serve(make_service).await?;

    Ok(())
}
