use async_trait::async_trait;

use crate::error::{ApiError, ProviderError, Result};
use crate::types::Operation;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同），未知时为空
    pub code: String,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供响应级别的信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// HTTP 状态码
    pub status_code: u16,
    /// HTTP 状态行（如 "403 Forbidden"）
    pub status_line: String,
    /// 响应中的请求 ID
    pub request_id: String,
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 解析出原始错误列表后，通过此 trait 映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始错误列表映射为 `ProviderError::Api`
    ///
    /// 第一个错误为主错误，其余放入 `additional`。
    /// 列表为空或消息为空时，用 HTTP 状态行作为消息。
    fn map_errors(&self, raw: Vec<RawApiError>, ctx: &ErrorContext) -> ProviderError {
        let to_api = |raw: RawApiError| ApiError {
            status_code: ctx.status_code,
            message: if raw.message.is_empty() {
                ctx.status_line.clone()
            } else {
                raw.message
            },
            code: raw.code,
            request_id: ctx.request_id.clone(),
        };

        let mut errors = raw.into_iter().map(to_api);
        let error = errors.next().unwrap_or_else(|| ApiError {
            status_code: ctx.status_code,
            code: String::new(),
            message: ctx.status_line.clone(),
            request_id: ctx.request_id.clone(),
        });

        log::debug!(
            "[{}] API error {}: {error}",
            self.provider_name(),
            ctx.status_code
        );

        ProviderError::Api {
            provider: self.provider_name().to_string(),
            error,
            additional: errors.collect(),
        }
    }

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：配置错误
    fn configuration_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::Configuration {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Source of operation snapshots for [`OperationPoller`](crate::OperationPoller).
///
/// Implemented by clients whose mutating calls return an [`Operation`] handle.
#[async_trait]
pub trait OperationSource: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Fetches the current state of `operation`.
    async fn get_operation(&self, operation: &Operation) -> Result<Operation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mapper;

    impl ProviderErrorMapper for Mapper {
        fn provider_name(&self) -> &'static str {
            "test"
        }
    }

    fn ctx() -> ErrorContext {
        ErrorContext {
            status_code: 400,
            status_line: "400 Bad Request".to_string(),
            request_id: "req-9".to_string(),
        }
    }

    #[test]
    fn first_error_wins() {
        let err = Mapper.map_errors(
            vec![
                RawApiError::with_code("A", "first"),
                RawApiError::with_code("B", "second"),
            ],
            &ctx(),
        );
        let ProviderError::Api {
            provider,
            error,
            additional,
        } = err
        else {
            panic!("expected Api error");
        };
        assert_eq!(provider, "test");
        assert_eq!(error.code, "A");
        assert_eq!(error.message, "first");
        assert_eq!(error.request_id, "req-9");
        assert_eq!(error.status_code, 400);
        assert_eq!(additional.len(), 1);
        assert_eq!(additional[0].code, "B");
    }

    #[test]
    fn empty_list_falls_back_to_status_line() {
        let err = Mapper.map_errors(Vec::new(), &ctx());
        let api = err.api_error().cloned().unwrap_or_default();
        assert_eq!(api.code, "");
        assert_eq!(api.message, "400 Bad Request");
        assert_eq!(api.request_id, "req-9");
    }

    #[test]
    fn empty_message_falls_back_to_status_line() {
        let err = Mapper.map_errors(vec![RawApiError::with_code("Code", "")], &ctx());
        let api = err.api_error().cloned().unwrap_or_default();
        assert_eq!(api.code, "Code");
        assert_eq!(api.message, "400 Bad Request");
    }
}
