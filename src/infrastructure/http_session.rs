//! HTTP 会话 - 基础设施层
//!
//! 持有唯一的 reqwest 客户端（含 cookie），只暴露"发请求"的能力

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, Response, Url};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ClockInError, ClockInResult, ConfigError};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:84.0) Gecko/20100101 Firefox/84.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP 会话
///
/// 职责：
/// - 独占一个带 cookie 的客户端，登录状态保存在其中
/// - 每次尝试新建一个，用完即丢，不在尝试之间共享
/// - 不认识 token / 打卡 等业务概念
pub struct HttpSession {
    client: Client,
    base_url: String,
    base: Url,
}

impl HttpSession {
    /// 创建新的会话
    ///
    /// # 参数
    /// - `base_url`: 门户地址，例如 `https://fangkong.hnu.edu.cn`
    pub fn new(base_url: &str) -> ClockInResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ORIGIN, header_value(&base_url)?);
        headers.insert(REFERER, header_value(&format!("{}/app/", base_url))?);
        let base = Url::parse(&base_url).map_err(|e| invalid_base_url(e.to_string()))?;

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClockInError::transport("client", e))?;

        Ok(Self {
            client,
            base_url,
            base,
        })
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 拼接带查询参数的完整 URL，参数值按表单规则编码
    pub fn url_with_query(&self, path: &str, pairs: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        url.set_path(&format!("{}{}", self.base.path().trim_end_matches('/'), path));
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }

    /// 发送 GET 请求，非 2xx 视为错误
    pub async fn get(&self, path: &str) -> ClockInResult<Response> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ClockInError::transport(path, e))?;
        ensure_success(path, response)
    }

    /// 发送 JSON POST 请求，非 2xx 视为错误
    pub async fn post_json(&self, path: &str, body: &JsonValue) -> ClockInResult<Response> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClockInError::transport(path, e))?;
        ensure_success(path, response)
    }

    /// 读取响应正文
    pub async fn text(path: &str, response: Response) -> ClockInResult<String> {
        response
            .text()
            .await
            .map_err(|e| ClockInError::transport(path, e))
    }
}

fn ensure_success(path: &str, response: Response) -> ClockInResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClockInError::bad_status(path, status))
    }
}

fn header_value(value: &str) -> ClockInResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| invalid_base_url(e.to_string()))
}

fn invalid_base_url(message: String) -> ClockInError {
    ClockInError::Config(ConfigError::InvalidValue {
        key: "portal.baseUrl",
        message,
    })
}
