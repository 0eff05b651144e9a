// ==========================================
// 鲜奶订送系统 - 推送注册 API
// ==========================================
// 职责: 解析客户后向推送网关登记设备令牌
// 说明: 推送注册失败只记录日志不向上抛错（注册属尽力而为，
//       不能阻断登录等主流程）；解析引擎的校验错误不适用此规则
// ==========================================

use std::sync::Arc;

use crate::api::customer_api::CustomerApi;
use crate::api::error::ApiResult;
use crate::backend::PushGateway;

/// 设备令牌登记所用的角色标识
const PUSH_ROLE_CUSTOMER: &str = "customer";

pub struct NotificationApi {
    customer: Arc<CustomerApi>,
    push: Arc<dyn PushGateway>,
}

impl NotificationApi {
    pub fn new(customer: Arc<CustomerApi>, push: Arc<dyn PushGateway>) -> Self {
        Self { customer, push }
    }

    /// 登记客户设备的推送令牌
    ///
    /// 返回 Ok(true) 表示已登记；客户解析无结果、令牌为空或
    /// 远端失败时返回 Ok(false) 并记录日志。
    pub async fn register_push_token(
        &self,
        name: &str,
        phone: &str,
        token: &str,
    ) -> ApiResult<bool> {
        if token.trim().is_empty() {
            tracing::debug!("推送令牌为空，跳过登记");
            return Ok(false);
        }

        let resolved = match self.customer.resolve_customer_id(name, phone).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("推送登记前客户解析失败: {}", e);
                return Ok(false);
            }
        };
        let Some(customer_id) = resolved else {
            tracing::debug!("客户解析无结果，跳过推送登记");
            return Ok(false);
        };

        match self
            .push
            .register_token(&customer_id, PUSH_ROLE_CUSTOMER, token)
            .await
        {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("推送令牌登记失败: {}", e);
                Ok(false)
            }
        }
    }
}
