// ==========================================
// 鲜奶订送系统 - 客户会话 API
// ==========================================
// 职责: 本地会话读写 + 远端客户ID解析
// 说明: 登录接口无结果时回退到纯电话查找（历史数据姓名不全）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::backend::{CustomerDirectory, CustomerId};
use crate::domain::session::{normalize_phone, CustomerSession};
use crate::repository::session_repo::SessionRepository;

pub struct CustomerApi {
    session_repo: Arc<SessionRepository>,
    directory: Arc<dyn CustomerDirectory>,
}

impl CustomerApi {
    pub fn new(session_repo: Arc<SessionRepository>, directory: Arc<dyn CustomerDirectory>) -> Self {
        Self {
            session_repo,
            directory,
        }
    }

    /// 读取本地会话，缺失即未登录
    pub fn get_session(&self) -> ApiResult<Option<CustomerSession>> {
        Ok(self.session_repo.get_session()?)
    }

    /// 写入本地会话（电话归一化为纯数字）
    pub fn set_session(&self, name: &str, phone: &str) -> ApiResult<()> {
        let session = CustomerSession::new(name, phone);
        if session.phone.is_empty() {
            return Err(ApiError::InvalidInput("电话号码不能为空".to_string()));
        }
        self.session_repo.set_session(&session)?;
        Ok(())
    }

    /// 清除本地会话（登出）
    pub fn clear_session(&self) -> ApiResult<()> {
        Ok(self.session_repo.clear_session()?)
    }

    /// 解析客户ID（不写会话）
    ///
    /// 顺序: 登录接口 → 纯电话回退；两路都无结果返回 None。
    pub async fn resolve_customer_id(
        &self,
        name: &str,
        phone: &str,
    ) -> ApiResult<Option<CustomerId>> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Err(ApiError::InvalidInput("电话号码不能为空".to_string()));
        }

        match self.directory.login(name, &digits).await {
            Ok(Some(id)) => return Ok(Some(id)),
            Ok(None) => {}
            Err(e) => {
                // 登录接口故障时仍尝试电话回退（与既有客户端行为一致）
                tracing::warn!("客户登录接口调用失败，回退电话查找: {}", e);
            }
        }

        let found = self.directory.find_by_phone(&digits).await?;
        if found.is_none() {
            tracing::warn!("客户查找无结果，请核对姓名/电话与远端档案");
        }
        Ok(found)
    }

    /// 登录: 解析客户ID成功后写入本地会话
    pub async fn sign_in(&self, name: &str, phone: &str) -> ApiResult<Option<CustomerId>> {
        let resolved = self.resolve_customer_id(name, phone).await?;
        if resolved.is_some() {
            self.set_session(name, phone)?;
        }
        Ok(resolved)
    }

    /// 以当前会话解析客户ID；未登录返回 None
    pub async fn current_customer_id(&self) -> ApiResult<Option<CustomerId>> {
        let Some(session) = self.get_session()? else {
            return Ok(None);
        };
        self.resolve_customer_id(&session.name, &session.phone).await
    }
}
