use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::{ObjectCache, keys};
use crate::models::ApiResponse;
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_logout(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 剔除缓存中的 token -> 用户映射
    if let Some(cache) = request.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        && let Some(token) = request
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
    {
        cache.remove(&keys::user_by_token(token)).await;
    }

    // 清空 refresh token cookie
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::success_empty("Logged out")))
}
