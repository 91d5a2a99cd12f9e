// larder-server/src/web/extractors.rs

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// The caller's identity, taken from the `X-User-ID` header (mock session).
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let parsed = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|raw| raw.trim().parse::<i64>().ok())
      .filter(|id| *id > 0);

    ready(match parsed {
      Some(user_id) => Ok(AuthenticatedUser { user_id }),
      None => {
        warn!("Missing or invalid {} header.", USER_ID_HEADER);
        Err(AppError::Auth(format!(
          "User authentication required: send a positive integer {} header.",
          USER_ID_HEADER
        )))
      }
    })
  }
}
