use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use intervo_server::{app_state::AppState, auth::JwtService, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let state = Arc::new(
        AppState::new(config.clone())
            .await
            .map_err(std::io::Error::other)?,
    );
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    log::info!("Starting intervo server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(handlers::health_check)
            .service(handlers::register)
            .service(handlers::login)
            .service(handlers::current_user)
            .service(handlers::create_question)
            .service(handlers::get_question)
            .service(handlers::list_questions)
            .service(handlers::create_test)
            .service(handlers::list_tests)
            .service(handlers::get_test)
            // Literal session paths must be registered before the
            // parameterized ones.
            .service(handlers::start_session)
            .service(handlers::get_session_history)
            .service(handlers::submit_answer)
            .service(handlers::get_session_turns)
            .service(handlers::quit_session)
            .service(handlers::get_session_score)
            .service(handlers::get_session)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
