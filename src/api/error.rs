// ==========================================
// 鲜奶订送系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/远端错误为用户可解释的错误
// 约定: 校验错误必须逐层向上传递，不得静默吞掉
// ==========================================

use thiserror::Error;

use crate::backend::error::BackendError;
use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ===== 远端服务错误 =====
    #[error("远端服务错误: {0}")]
    RemoteServiceError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为用户可解释的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 BackendError 转换
// ==========================================
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        ApiError::RemoteServiceError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_propagates_as_validation() {
        let repo_err = RepositoryError::ValidationError("计划中产品重复: cow".to_string());
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::ValidationError(msg) => assert!(msg.contains("cow")),
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_not_found_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Invoice".to_string(),
            id: "INV-1".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Invoice"));
                assert!(msg.contains("INV-1"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_backend_error_conversion() {
        let err: ApiError = BackendError::Remote("timeout".to_string()).into();
        match err {
            ApiError::RemoteServiceError(msg) => assert!(msg.contains("timeout")),
            _ => panic!("Expected RemoteServiceError"),
        }
    }
}
