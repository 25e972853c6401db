//! 缓存层
//!
//! 通过注册表选择后端（Moka 内存缓存 / Redis），
//! 用于令牌到用户的鉴权查询和课程当前测验的热路径查询。

pub mod keys;
pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端暂时不可用或值无法读取，调用方应回源
    Unavailable,
}

/// 对象缓存后端抽象
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 以 JSON 反序列化读取；损坏的值视为未命中并剔除
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> CacheResult<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(raw) => match serde_json::from_str(&raw) {
            Ok(value) => CacheResult::Found(value),
            Err(_) => {
                cache.remove(key).await;
                CacheResult::NotFound
            }
        },
        CacheResult::NotFound => CacheResult::NotFound,
        CacheResult::Unavailable => CacheResult::Unavailable,
    }
}

/// 以 JSON 序列化写入，序列化失败时静默跳过
pub async fn insert_json<T: Serialize>(
    cache: &dyn ObjectCache,
    key: String,
    value: &T,
    ttl: u64,
) {
    if let Ok(raw) = serde_json::to_string(value) {
        cache.insert_raw(key, raw, ttl).await;
    }
}

/// 声明缓存后端插件，进程启动时自动注册
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $wrapper:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_ $wrapper:snake _plugin>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            let cache = $wrapper::new()
                                .map_err($crate::errors::UpSkillrError::cache_connection)?;
                            Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
