use std::path::PathBuf;

use thiserror::Error;

/// 打卡流程错误类型
#[derive(Debug, Error)]
pub enum ClockInError {
    /// 网络请求失败（连接失败、超时等）
    #[error("网络请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 接口返回非 2xx 状态码
    #[error("接口返回异常状态 ({endpoint}): HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// 接口返回 2xx，但内容缺少成功标志
    #[error("接口返回内容异常 ({endpoint}): {detail}")]
    UnexpectedResponse { endpoint: String, detail: String },

    /// 验证码解析在重试上限内未成功
    #[error("验证码获取失败: 已尝试 {attempts} 次")]
    Token { attempts: u32 },

    /// 打卡接口返回了未知的业务代码
    #[error("打卡提交返回异常代码: {code:?}")]
    Submission { code: Option<i64> },

    /// 打卡接口返回内容无法解析为 JSON
    #[error("打卡响应无法解析为 JSON: {body}")]
    MalformedResponse { body: String },

    /// OCR 服务调用失败
    #[error("OCR 识别失败: {0}")]
    Ocr(String),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 配置错误
///
/// 启动阶段即终止进程，不会进入调度循环。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("缺少必填配置项: {key}")]
    Missing { key: &'static str },

    #[error("打卡时间无效: {hour:02}:{minute:02}")]
    InvalidSchedule { hour: u32, minute: u32 },

    #[error("配置项 {key} 无效: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("读取配置文件失败 ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析配置文件失败 ({}): {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

// ========== 便捷构造函数 ==========

impl ClockInError {
    /// 创建网络请求失败错误
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ClockInError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建非 2xx 状态错误
    pub fn bad_status(endpoint: impl Into<String>, status: reqwest::StatusCode) -> Self {
        ClockInError::BadStatus {
            endpoint: endpoint.into(),
            status: status.as_u16(),
        }
    }

    /// 是否属于传输层错误（可按固定间隔重试）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClockInError::Transport { .. } | ClockInError::BadStatus { .. }
        )
    }
}

/// 打卡流程结果类型
pub type ClockInResult<T> = Result<T, ClockInError>;
