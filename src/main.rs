//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Bootstrap idempotente: admin padrão e configuração da loja.
    app_state
        .user_service
        .seed_default_admin()
        .await
        .expect("Falha ao criar o admin padrão.");
    app_state
        .configuration_service
        .seed_default()
        .await
        .expect("Falha ao criar a configuração padrão.");

    // Rotas públicas de autenticação.
    let auth_public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh));

    // Rotas de sessão (protegidas).
    let auth_session_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/change-password", patch(handlers::auth::change_password))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::get_all_products),
        )
        .route("/search", get(handlers::products::search_products))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .patch(handlers::products::update_product)
                .delete(handlers::products::remove_product),
        )
        .route("/{id}/recount", post(handlers::products::recount_product_stock))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let inventory_routes = Router::new()
        .route(
            "/",
            post(handlers::inventory::create_movement)
                .get(handlers::inventory::get_all_movements),
        )
        .route(
            "/{id}",
            get(handlers::inventory::get_movement)
                .patch(handlers::inventory::update_movement)
                .delete(handlers::inventory::remove_movement),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sale_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::create_sale).get(handlers::sales::get_all_sales),
        )
        .route("/summary", get(handlers::sales::get_summary))
        .route(
            "/{id}",
            get(handlers::sales::get_sale)
                .patch(handlers::sales::update_sale)
                .delete(handlers::sales::remove_sale),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // A restrição de admin fica no extractor RequireAdmin de cada handler.
    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::get_all_users),
        )
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::remove_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let configuration_routes = Router::new()
        .route(
            "/",
            get(handlers::configuration::get_configuration)
                .patch(handlers::configuration::update_configuration),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_public_routes.merge(auth_session_routes))
        .nest("/api/products", product_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/users", user_routes)
        .nest("/api/configuration", configuration_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
