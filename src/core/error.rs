//! 核心错误处理模块

use serde::Deserialize;

/// 核心错误类型
///
/// 所有失败都终止在发起请求的操作内部，不会继续向上传播导致进程崩溃。
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 网络不可达、超时或非 2xx 状态码
    #[error("请求失败 (status: {status:?}): {detail}")]
    Transport {
        status: Option<u16>,
        /// 服务端响应体中的 `message` 字段
        message: Option<String>,
        detail: String,
    },
    /// 服务端拒绝了令牌 (401/403)，属于传输失败的一个特例
    #[error("认证失败 (status: {status}): {detail}")]
    Unauthorized {
        status: u16,
        message: Option<String>,
        detail: String,
    },
    #[error("表单校验失败: {0}")]
    Validation(String),
    #[error("响应解析失败: {0}")]
    Decode(String),
    #[error("已有商品正在提交")]
    SubmissionInProgress,
    #[error("会话存储错误: {0}")]
    Storage(String),
}

/// 失败响应体，`message` 可选
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// 宽松解析：响应体不是 JSON 或缺少 `message` 时返回空
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}

impl CoreError {
    /// 根据状态码和响应体构造错误
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = ErrorBody::parse(body).message.filter(|m| !m.is_empty());
        let detail = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        };

        match status {
            401 | 403 => CoreError::Unauthorized {
                status,
                message,
                detail,
            },
            _ => CoreError::Transport {
                status: Some(status),
                message,
                detail,
            },
        }
    }

    /// 服务端提供的错误信息（如有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            CoreError::Transport { message, .. } | CoreError::Unauthorized { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CoreError::Decode(err.to_string());
        }
        CoreError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: None,
            detail: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
