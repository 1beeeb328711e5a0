use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use studyhub_server::{
    app_state::AppState, config::Config, graphql, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let allowed_origins = config.cors_allowed_origins.clone();

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let schema = graphql::create_schema(state.clone());
    let state = std::sync::Arc::new(state);

    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static(
                studyhub_server::middleware::REQUEST_ID_HEADER,
            )])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .configure(handlers::configure)
            .configure(graphql::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
