//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_upskillr_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum UpSkillrError {
            $($variant(String),)*
        }

        impl UpSkillrError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(UpSkillrError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(UpSkillrError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(UpSkillrError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl UpSkillrError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        UpSkillrError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_upskillr_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    DuplicateSubmission("E008", "Duplicate Submission"),
    DuplicateKey("E009", "Duplicate Key Error"),
    Serialization("E010", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl UpSkillrError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for UpSkillrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for UpSkillrError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for UpSkillrError {
    fn from(err: sea_orm::DbErr) -> Self {
        UpSkillrError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for UpSkillrError {
    fn from(err: std::io::Error) -> Self {
        UpSkillrError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for UpSkillrError {
    fn from(err: serde_json::Error) -> Self {
        UpSkillrError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for UpSkillrError {
    fn from(err: chrono::ParseError) -> Self {
        UpSkillrError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UpSkillrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(UpSkillrError::cache_connection("test").code(), "E001");
        assert_eq!(UpSkillrError::database_config("test").code(), "E003");
        assert_eq!(UpSkillrError::validation("test").code(), "E006");
        assert_eq!(UpSkillrError::duplicate_submission("test").code(), "E008");
        assert_eq!(UpSkillrError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            UpSkillrError::duplicate_submission("test").error_type(),
            "Duplicate Submission"
        );
        assert_eq!(
            UpSkillrError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = UpSkillrError::validation("Questions are required");
        assert_eq!(err.message(), "Questions are required");
    }

    #[test]
    fn test_format_simple() {
        let err = UpSkillrError::not_found("Assessment not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Assessment not found"));
    }
}
