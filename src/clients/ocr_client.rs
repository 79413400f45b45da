//! 文字识别客户端
//!
//! `TextRecognizer` 是对外部 OCR 能力的抽象："给一张图片，返回识别出的文字片段"。
//! 生产实现为腾讯云通用印刷体识别（高精度版），使用 TC3-HMAC-SHA256 签名。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::Config;
use crate::error::{ClockInError, ClockInResult};
use crate::models::ServiceKeys;

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "ocr";
const ACTION: &str = "GeneralAccurateOCR";
const API_VERSION: &str = "2018-11-19";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// 文字识别能力
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// 识别图片中的文字，按检测顺序返回各个片段
    async fn recognize(&self, image_url: &str) -> ClockInResult<Vec<String>>;
}

/// 腾讯云 OCR 客户端
pub struct TencentOcrClient {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    region: String,
    keys: ServiceKeys,
}

impl TencentOcrClient {
    /// 创建新的 OCR 客户端
    ///
    /// # 参数
    /// - `keys`: 腾讯云 SecretId / SecretKey
    /// - `endpoint`: 接入点，例如 `https://ocr.tencentcloudapi.com`
    /// - `region`: 地域，例如 `ap-beijing`
    pub fn new(keys: ServiceKeys, endpoint: &str, region: &str) -> ClockInResult<Self> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| ClockInError::Ocr(format!("接入点地址无效 {}: {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(ClockInError::Ocr(format!("接入点缺少主机名: {}", endpoint))),
        };

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClockInError::transport("ocr", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            host,
            region: region.to_string(),
            keys,
        })
    }

    /// 使用程序配置创建
    pub fn from_config(config: &Config) -> ClockInResult<Self> {
        Self::new(
            config.service_keys.clone(),
            &config.ocr_endpoint,
            &config.ocr_region,
        )
    }
}

#[async_trait]
impl TextRecognizer for TencentOcrClient {
    async fn recognize(&self, image_url: &str) -> ClockInResult<Vec<String>> {
        let payload = json!({ "ImageUrl": image_url }).to_string();
        let timestamp = Utc::now().timestamp();
        let authorization = authorization(&self.keys, &self.host, &payload, timestamp)?;

        debug!("调用 OCR: {}", image_url);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await
            .map_err(|e| ClockInError::transport(ACTION, e))?;

        if !response.status().is_success() {
            return Err(ClockInError::bad_status(ACTION, response.status()));
        }

        let envelope: OcrEnvelope = response
            .json()
            .await
            .map_err(|e| ClockInError::Ocr(format!("响应解析失败: {}", e)))?;

        envelope.into_texts()
    }
}

// ========== 响应结构 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrEnvelope {
    response: OcrResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrResponse {
    #[serde(default)]
    text_detections: Vec<TextDetection>,
    error: Option<OcrApiError>,
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextDetection {
    detected_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrApiError {
    code: String,
    message: String,
}

impl OcrEnvelope {
    fn into_texts(self) -> ClockInResult<Vec<String>> {
        let response = self.response;
        if let Some(err) = response.error {
            return Err(ClockInError::Ocr(format!(
                "{}: {} (RequestId: {})",
                err.code,
                err.message,
                response.request_id.unwrap_or_default()
            )));
        }
        Ok(response
            .text_detections
            .into_iter()
            .map(|d| d.detected_text)
            .collect())
    }
}

// ========== TC3 签名 ==========

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], data: &str) -> ClockInResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ClockInError::Ocr(format!("签名密钥无效: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// 生成 Authorization 请求头
fn authorization(
    keys: &ServiceKeys,
    host: &str,
    payload: &str,
    timestamp: i64,
) -> ClockInResult<String> {
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| ClockInError::Ocr(format!("时间戳无效: {}", timestamp)))?
        .format("%Y-%m-%d")
        .to_string();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        SIGNED_HEADERS,
        sha256_hex(payload)
    );
    let credential_scope = format!("{}/{}/tc3_request", date, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        credential_scope,
        sha256_hex(&canonical_request)
    );

    let secret_date = hmac_sha256(format!("TC3{}", keys.ocr_key_secret).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, SERVICE)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, keys.ocr_key_id, credential_scope, SIGNED_HEADERS, signature
    ))
}
