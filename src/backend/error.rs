// ==========================================
// 鲜奶订送系统 - 远端服务错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 远端服务错误类型
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("远端调用失败: {0}")]
    Remote(String),

    #[error("远端响应解析失败: {0}")]
    Decode(String),

    #[error("远端服务不可用: {0}")]
    Unavailable(String),
}

/// Result 类型别名
pub type BackendResult<T> = Result<T, BackendError>;
