//! 响应信封 `{ success, data | message }`

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// 后端统一返回的信封结构
///
/// `data` 先保留为原始 JSON，由调用方按各自的响应类型解析。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl ApiEnvelope {
    /// 从响应体解析信封
    pub fn parse(body: &str) -> ApiResult<Self> {
        serde_json::from_str(body).map_err(ApiError::from)
    }

    /// 失败时的提示文案
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
    }

    /// 归一化为 `Result`
    ///
    /// - `success == false` -> [`ApiError::Rejected`]
    /// - `data` 缺失且目标类型不接受 `null` -> [`ApiError::MissingData`]
    pub fn into_result<T: DeserializeOwned>(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::Rejected(self.failure_message()));
        }

        let was_null = self.data.is_null();
        match serde_json::from_value::<T>(self.data) {
            Ok(value) => Ok(value),
            Err(_) if was_null => Err(ApiError::MissingData),
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn success_with_data() {
        let env = ApiEnvelope::parse(r#"{"success":true,"data":"cashier"}"#).unwrap();
        let role: Role = env.into_result().unwrap();
        assert_eq!(role, Role::Cashier);
    }

    #[test]
    fn failure_uses_backend_message() {
        let env = ApiEnvelope::parse(r#"{"success":false,"message":"Branch not found"}"#).unwrap();
        let err = env.into_result::<Role>().unwrap_err();
        assert_eq!(err, ApiError::Rejected("Branch not found".into()));
    }

    #[test]
    fn failure_without_message_falls_back() {
        let env = ApiEnvelope::parse(r#"{"success":false,"error":"  "}"#).unwrap();
        let err = env.into_result::<()>().unwrap_err();
        assert_eq!(err, ApiError::Rejected(DEFAULT_FAILURE_MESSAGE.into()));
    }

    #[test]
    fn unit_response_accepts_missing_data() {
        let env = ApiEnvelope::parse(r#"{"success":true,"message":"Deleted"}"#).unwrap();
        assert!(env.into_result::<()>().is_ok());
    }

    #[test]
    fn missing_data_is_reported() {
        let env = ApiEnvelope::parse(r#"{"success":true}"#).unwrap();
        assert_eq!(env.into_result::<Role>().unwrap_err(), ApiError::MissingData);
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let env = ApiEnvelope::parse(r#"{"success":true,"data":{"x":1}}"#).unwrap();
        assert!(matches!(
            env.into_result::<Vec<String>>(),
            Err(ApiError::Decode(_))
        ));
    }
}
