/*!
 * 速率限制中间件
 *
 * 固定时间窗口计数，防止暴力破解与重复提交轰炸。
 *
 * ```rust,ignore
 * web::scope("/auth")
 *     .wrap(RateLimit::login())  // 5次/分钟/IP
 * ```
 *
 * 超过限制返回 429 Too Many Requests。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::ErrorCode;

use super::create_error_response;

/// 全局速率限制缓存
/// 键: 前缀:IP，值: 窗口内请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60)) // 1分钟过期
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32) -> Self {
        Self {
            max_requests,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5).with_prefix("login")
    }

    /// 注册端点限制：3次/分钟/IP
    pub fn register() -> Self {
        Self::new(3).with_prefix("register")
    }

    /// 刷新令牌限制：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10).with_prefix("refresh")
    }

    /// 测验提交限制：10次/分钟/IP，重复提交本身另有唯一约束兜底
    pub fn quiz_submit() -> Self {
        Self::new(10).with_prefix("submit")
    }
}

fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// 剥掉对端地址里的端口，兼容 IPv6 字面量
fn normalize_peer_addr(raw: &str) -> Option<String> {
    if is_valid_ip(raw) {
        return Some(raw.to_string());
    }
    if let Some((host, _)) = raw.rsplit_once(':') {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if is_valid_ip(host) {
            return Some(host.to_string());
        }
    }
    None
}

/// 从请求中提取客户端 IP
///
/// 反向代理部署时依赖代理写入的 X-Forwarded-For / X-Real-IP，
/// 这里会校验 IP 格式，拒绝伪造的无效头。
fn extract_client_ip(req: &ServiceRequest) -> String {
    if let Some(ip) = req
        .connection_info()
        .realip_remote_addr()
        .and_then(normalize_peer_addr)
    {
        return ip;
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    "unknown".to_string()
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let key = format!("{}:{}", self.key_prefix, extract_client_ip(&req));

        Box::pin(async move {
            let current = RATE_LIMIT_CACHE.get(&key).await.unwrap_or(0);

            if current >= max_requests {
                warn!("Rate limit exceeded for key: {}", key);
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::TOO_MANY_REQUESTS,
                        ErrorCode::TooManyRequests,
                        "Too many requests, please try again later",
                    )
                    .map_into_right_body(),
                ));
            }

            RATE_LIMIT_CACHE.insert(key, current + 1).await;

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
        assert!(!is_valid_ip(""));
    }

    #[tokio::test]
    async fn test_window_counter_increments() {
        let key = "test:10.0.0.1".to_string();
        RATE_LIMIT_CACHE.insert(key.clone(), 4).await;
        let current = RATE_LIMIT_CACHE.get(&key).await.unwrap_or(0);
        assert_eq!(current, 4);
        RATE_LIMIT_CACHE.invalidate(&key).await;
    }
}
