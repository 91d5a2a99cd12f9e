// larder-server/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::error;

use crate::state::AppState;
use crate::web::handlers::{
  auth_handlers, cart_handlers, checkout_handlers, order_handlers, payment_handlers, product_handlers,
};

async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match sqlx::query("SELECT 1").execute(&app_state.storefront.pool).await {
    Ok(_) => HttpResponse::Ok().json(json!({ "status": "ok", "database": "ok" })),
    Err(e) => {
      error!(error = %e, "Health check could not reach the database.");
      HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded", "database": "unavailable" }))
    }
  }
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/decrement", web::post().to(cart_handlers::decrement_cart_handler))
          .route("/{product_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::commit_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}/cancel", web::post().to(order_handlers::cancel_order_handler))
          .route("/{order_id}/payments", web::post().to(order_handlers::pay_order_handler)),
      )
      .route("/payments", web::get().to(payment_handlers::payment_history_handler))
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler)),
  );
}
