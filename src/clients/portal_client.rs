/// 打卡门户 API 客户端
///
/// 封装门户的四个接口：取 token、验证码图片、登录、打卡
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClockInError, ClockInResult};
use crate::infrastructure::HttpSession;
use crate::utils::logging::truncate_text;

pub const LOGIN_PATH: &str = "/api/v1/account/login";
pub const TOKEN_PATH: &str = "/api/v1/account/getimgvcode";
pub const IMAGE_PATH: &str = "/imagevcode";
pub const CLOCK_IN_PATH: &str = "/api/v1/clockinlog/add";

/// 取 token 接口的成功标志
const TOKEN_SUCCESS_MSG: &str = "成功";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    msg: Option<String>,
    data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    #[serde(rename = "Token")]
    token: Option<String>,
}

/// 门户客户端
pub struct PortalClient {
    session: HttpSession,
}

impl PortalClient {
    /// 在指定门户地址上新建会话
    pub fn new(base_url: &str) -> ClockInResult<Self> {
        Ok(Self {
            session: HttpSession::new(base_url)?,
        })
    }

    /// 获取一个新的验证 token
    pub async fn fetch_token(&self) -> ClockInResult<String> {
        let response = self.session.get(TOKEN_PATH).await?;
        let body = HttpSession::text(TOKEN_PATH, response).await?;

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|_| ClockInError::UnexpectedResponse {
                endpoint: TOKEN_PATH.to_string(),
                detail: truncate_text(&body, 120),
            })?;

        if parsed.msg.as_deref() != Some(TOKEN_SUCCESS_MSG) {
            return Err(ClockInError::UnexpectedResponse {
                endpoint: TOKEN_PATH.to_string(),
                detail: format!("msg={:?}", parsed.msg),
            });
        }

        parsed
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClockInError::UnexpectedResponse {
                endpoint: TOKEN_PATH.to_string(),
                detail: "缺少 Token 字段".to_string(),
            })
    }

    /// 验证码图片地址（交给 OCR 服务直接拉取）
    pub fn image_url(&self, token: &str) -> String {
        self.session.url_with_query(IMAGE_PATH, &[("token", token)])
    }

    /// 提交登录请求
    ///
    /// 只检查 HTTP 状态；账号密码是否正确要到打卡时才能体现
    pub async fn login(&self, payload: &Value) -> ClockInResult<()> {
        let response = self.session.post_json(LOGIN_PATH, payload).await?;
        let body = HttpSession::text(LOGIN_PATH, response).await?;
        debug!("登录响应: {}", truncate_text(&body, 200));
        Ok(())
    }

    /// 提交打卡信息，返回原始响应正文
    pub async fn add_clock_in(&self, payload: &Value) -> ClockInResult<String> {
        let response = self.session.post_json(CLOCK_IN_PATH, payload).await?;
        let body = HttpSession::text(CLOCK_IN_PATH, response).await?;
        debug!("打卡响应: {}", truncate_text(&body, 200));
        Ok(body)
    }
}
