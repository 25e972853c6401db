//! 配置管理
//!
//! 加载顺序：config.toml -> config.<env>.toml -> 环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
