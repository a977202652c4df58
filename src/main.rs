use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use admissions_portal::api::ApiClient;
use admissions_portal::config::Config;
use admissions_portal::handlers;
use admissions_portal::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let state = web::Data::new(AppState::new(ApiClient::new(config.api_url.clone())));

    log::info!("Backend API at {}", config.api_url);
    log::info!("Starting server at http://{}", config.bind_addr);

    let secret_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(handlers::not_found))
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
