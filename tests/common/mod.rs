//! 集成测试共用的桩与构造函数
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hnu_clockin::models::{Credentials, LocationProfile, ServiceKeys};
use hnu_clockin::{ClockInError, ClockInResult, Config, RetryPolicy, TextRecognizer};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN_PATH: &str = "/api/v1/account/getimgvcode";
pub const LOGIN_PATH: &str = "/api/v1/account/login";
pub const CLOCK_IN_PATH: &str = "/api/v1/clockinlog/add";

/// 可控的文字识别桩，记录每次收到的图片地址
pub struct StubRecognizer {
    reply: Option<String>,
    calls: AtomicUsize,
    image_urls: Mutex<Vec<String>>,
}

impl StubRecognizer {
    /// 每次都识别为 `text`
    pub fn always(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            image_urls: Mutex::new(Vec::new()),
        })
    }

    /// 每次调用都失败
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            image_urls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.image_urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(&self, image_url: &str) -> ClockInResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.image_urls.lock().unwrap().push(image_url.to_string());
        match &self.reply {
            Some(text) => Ok(vec![text.clone()]),
            None => Err(ClockInError::Ocr("stub failure".to_string())),
        }
    }
}

/// 每次返回一个新的 token：tok-0, tok-1, ...
pub struct FreshTokens(AtomicUsize);

impl FreshTokens {
    pub fn new() -> Self {
        Self(AtomicUsize::new(0))
    }
}

impl Respond for FreshTokens {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "成功",
            "data": { "Token": format!("tok-{}", n) }
        }))
    }
}

/// 依次返回给定的响应，用完后重复最后一个
pub struct Sequence {
    replies: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl Sequence {
    pub fn new(replies: Vec<ResponseTemplate>) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.replies.len() - 1);
        self.replies[idx].clone()
    }
}

pub fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "msg": "成功",
        "data": { "Token": token }
    }))
}

pub fn clock_in_response(code: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": code, "msg": "" }))
}

/// 指向模拟门户、无重试间隔的配置
pub fn test_config(server: &MockServer, step_attempts: u32, run_attempts: u32) -> Config {
    Config::new(
        Credentials::new("201900001", "pw"),
        LocationProfile::default(),
        ServiceKeys::new("AKIDtest", "secret"),
    )
    .with_portal_base_url(server.uri())
    .with_step_retry(RetryPolicy::new(step_attempts, Duration::ZERO))
    .with_attempt_retry(RetryPolicy::new(run_attempts, Duration::ZERO))
}

/// 挂载一个返回新 token 的取 token 接口
pub async fn mount_fresh_tokens(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .respond_with(FreshTokens::new())
        .expect(expected_calls)
        .mount(server)
        .await;
}
