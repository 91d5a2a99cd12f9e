// larder-server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use larder::models::{NewProduct, Role};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub q: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let catalog = &app_state.storefront.catalog;
  let products = match query.q.as_deref() {
    Some(term) => catalog.search(term).await?,
    None => catalog.list().await?,
  };
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.storefront.catalog.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

async fn require_admin(app_state: &AppState, auth_user: &AuthenticatedUser) -> Result<(), AppError> {
  let user = app_state.storefront.users.get(auth_user.user_id).await.map_err(|e| match e {
    larder::LarderError::NotFound(_) => AppError::Auth("Unknown user.".to_string()),
    other => other.into(),
  })?;
  if user.role != Role::Admin {
    warn!(user_id = user.user_id, "Non-admin tried to change the catalog.");
    return Err(AppError::Forbidden("Admin role required.".to_string()));
  }
  Ok(())
}

#[instrument(name = "handler::create_product", skip(app_state, payload), fields(user_id = auth_user.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let product = app_state.storefront.catalog.create(&payload).await?;
  info!(product_id = product.product_id, "Product created by admin.");
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[instrument(name = "handler::update_product", skip(app_state, payload), fields(user_id = auth_user.user_id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let product = app_state.storefront.catalog.update(path.into_inner(), &payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(name = "handler::delete_product", skip(app_state), fields(user_id = auth_user.user_id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let product_id = path.into_inner();
  if !app_state.storefront.catalog.delete(product_id).await? {
    return Err(larder::LarderError::NotFound(format!("product {}", product_id)).into());
  }
  Ok(HttpResponse::NoContent().finish())
}
