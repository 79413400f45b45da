//! 配置解析
//!
//! 来源优先级：系统路径配置文件 → 当前目录配置文件 → 命令行参数。
//! 文件支持 TOML 与 JSON 两种格式，按扩展名区分。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::models::{Credentials, LocationProfile, ServiceKeys};

/// 门户默认地址
pub const DEFAULT_PORTAL_BASE_URL: &str = "https://fangkong.hnu.edu.cn";
/// 腾讯云 OCR 默认接入点
pub const DEFAULT_OCR_ENDPOINT: &str = "https://ocr.tencentcloudapi.com";
/// 腾讯云 OCR 默认地域
pub const DEFAULT_OCR_REGION: &str = "ap-beijing";

/// 按顺序查找的配置文件
pub const CONFIG_CANDIDATES: [&str; 4] = [
    "/opt/conf/settings.toml",
    "/opt/conf/settings.json",
    "settings.toml",
    "settings.json",
];

/// 重试策略：最多尝试次数 + 两次尝试之间的固定间隔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// 单个步骤（取 token、识别、登录、提交）的默认策略：5 次，间隔 3 秒
    pub const fn step_default() -> Self {
        Self::new(5, Duration::from_secs(3))
    }

    /// 整次尝试的默认策略：5 次，间隔 20 秒
    pub const fn attempt_default() -> Self {
        Self::new(5, Duration::from_secs(20))
    }

    /// 第 `attempt` 次（从 1 开始）失败后是否还有机会
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// 每日打卡时间（本机时区）
///
/// 只能通过 [`ScheduleTime::new`] 构造，小时与分钟总在合法范围内。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    hour: u32,
    minute: u32,
}

impl ScheduleTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ConfigError> {
        if hour >= 24 || minute >= 60 {
            return Err(ConfigError::InvalidSchedule { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// 当天的触发时刻
    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for ScheduleTime {
    fn default() -> Self {
        Self { hour: 9, minute: 20 }
    }
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub location: LocationProfile,
    pub service_keys: ServiceKeys,
    pub schedule: ScheduleTime,
    /// 门户地址（不带末尾斜杠）
    pub portal_base_url: String,
    pub ocr_endpoint: String,
    pub ocr_region: String,
    /// 单个步骤的重试策略
    pub step_retry: RetryPolicy,
    /// 整次尝试的重试策略
    pub attempt_retry: RetryPolicy,
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    CommandLine,
}

impl Config {
    /// 用默认的门户、OCR 与重试设置创建配置
    pub fn new(credentials: Credentials, location: LocationProfile, service_keys: ServiceKeys) -> Self {
        Self {
            credentials,
            location,
            service_keys,
            schedule: ScheduleTime::default(),
            portal_base_url: DEFAULT_PORTAL_BASE_URL.to_string(),
            ocr_endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            ocr_region: DEFAULT_OCR_REGION.to_string(),
            step_retry: RetryPolicy::step_default(),
            attempt_retry: RetryPolicy::attempt_default(),
        }
    }

    pub fn with_portal_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.portal_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_ocr_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ocr_endpoint = endpoint.into();
        self
    }

    pub fn with_step_retry(mut self, policy: RetryPolicy) -> Self {
        self.step_retry = policy;
        self
    }

    pub fn with_attempt_retry(mut self, policy: RetryPolicy) -> Self {
        self.attempt_retry = policy;
        self
    }

    /// 按默认候选路径解析配置
    pub fn resolve(args: CliArgs) -> Result<(Self, ConfigSource), ConfigError> {
        let candidates: Vec<PathBuf> = CONFIG_CANDIDATES.iter().map(PathBuf::from).collect();
        Self::resolve_from(&candidates, args)
    }

    /// 依次检查候选文件，第一个存在的文件生效；都不存在时使用命令行参数
    pub fn resolve_from(
        candidates: &[PathBuf],
        args: CliArgs,
    ) -> Result<(Self, ConfigSource), ConfigError> {
        for path in candidates {
            if path.is_file() {
                let config = Self::from_file(path)?;
                return Ok((config, ConfigSource::File(path.clone())));
            }
        }
        Ok((Self::from_args(args)?, ConfigSource::CommandLine))
    }

    /// 从配置文件加载
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let settings: SettingsFile = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        settings.into_config()
    }

    /// 从命令行参数构建
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        SettingsFile::from(args).into_config()
    }
}

// ========== 文件格式 ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(alias = "studentID")]
    student_id: Option<String>,
    password: Option<String>,
    province: Option<String>,
    city: Option<String>,
    #[serde(alias = "country")]
    county: Option<String>,
    address: Option<String>,
    #[serde(default)]
    schedule: ScheduleSection,
    #[serde(alias = "SecretId", alias = "secretId")]
    ocr_key_id: Option<String>,
    #[serde(alias = "SecretKey", alias = "secretKey")]
    ocr_key_secret: Option<String>,
    #[serde(default)]
    portal: PortalSection,
    #[serde(default)]
    ocr: OcrSection,
    retry: Option<RetrySection>,
    attempts: Option<RetrySection>,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleSection {
    hour: Option<u32>,
    minute: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalSection {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrSection {
    endpoint: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrySection {
    max_attempts: Option<u32>,
    delay_secs: Option<f64>,
}

impl RetrySection {
    fn apply(&self, base: RetryPolicy, key: &'static str) -> Result<RetryPolicy, ConfigError> {
        let max_attempts = self.max_attempts.unwrap_or(base.max_attempts).max(1);
        let delay = match self.delay_secs {
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|e| {
                ConfigError::InvalidValue {
                    key,
                    message: e.to_string(),
                }
            })?,
            None => base.delay,
        };
        Ok(RetryPolicy::new(max_attempts, delay))
    }
}

impl From<CliArgs> for SettingsFile {
    fn from(args: CliArgs) -> Self {
        Self {
            student_id: args.username,
            password: args.password,
            province: Some(args.province),
            city: Some(args.city),
            county: Some(args.county),
            address: Some(args.address),
            schedule: ScheduleSection {
                hour: Some(args.hour),
                minute: Some(args.minute),
            },
            ocr_key_id: args.secret_id,
            ocr_key_secret: args.secret_key,
            ..Default::default()
        }
    }
}

impl SettingsFile {
    fn into_config(self) -> Result<Config, ConfigError> {
        let credentials = Credentials::new(
            required(self.student_id, "studentId")?,
            required(self.password, "password")?,
        );
        let service_keys = ServiceKeys::new(
            required(self.ocr_key_id, "ocrKeyId")?,
            required(self.ocr_key_secret, "ocrKeySecret")?,
        );

        let defaults = LocationProfile::default();
        let location = LocationProfile {
            province: self.province.unwrap_or(defaults.province),
            city: self.city.unwrap_or(defaults.city),
            county: self.county.unwrap_or(defaults.county),
            address: self.address.unwrap_or(defaults.address),
        };

        let default_schedule = ScheduleTime::default();
        let schedule = ScheduleTime::new(
            self.schedule.hour.unwrap_or(default_schedule.hour()),
            self.schedule.minute.unwrap_or(default_schedule.minute()),
        )?;

        let mut config = Config::new(credentials, location, service_keys);
        config.schedule = schedule;

        if let Some(base_url) = self.portal.base_url {
            config = config.with_portal_base_url(base_url);
        }
        if let Some(endpoint) = self.ocr.endpoint {
            config.ocr_endpoint = endpoint;
        }
        if let Some(region) = self.ocr.region {
            config.ocr_region = region;
        }
        if let Some(retry) = &self.retry {
            config.step_retry = retry.apply(config.step_retry, "retry.delaySecs")?;
        }
        if let Some(attempts) = &self.attempts {
            config.attempt_retry = attempts.apply(config.attempt_retry, "attempts.delaySecs")?;
        }

        Ok(config)
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing { key }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn full_args() -> CliArgs {
        CliArgs::parse_from([
            "hnu-clockin", "-s", "201900001", "-p", "pw", "-i", "AKID", "-k", "secret",
        ])
    }

    #[test]
    fn default_policies() {
        assert_eq!(RetryPolicy::step_default().max_attempts, 5);
        assert_eq!(RetryPolicy::step_default().delay, Duration::from_secs(3));
        assert_eq!(RetryPolicy::attempt_default().delay, Duration::from_secs(20));
        assert!(RetryPolicy::step_default().has_next(4));
        assert!(!RetryPolicy::step_default().has_next(5));
    }

    #[test]
    fn schedule_rejects_out_of_range() {
        assert!(ScheduleTime::new(23, 59).is_ok());
        assert!(matches!(
            ScheduleTime::new(24, 0),
            Err(ConfigError::InvalidSchedule { hour: 24, minute: 0 })
        ));
        assert!(ScheduleTime::new(8, 60).is_err());
    }

    #[test]
    fn schedule_exposes_validated_time() {
        let time = ScheduleTime::new(23, 59).unwrap();
        assert_eq!((time.hour(), time.minute()), (23, 59));
        assert_eq!(time.as_naive_time(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());

        let default = ScheduleTime::default();
        assert_eq!(default.as_naive_time(), NaiveTime::from_hms_opt(9, 20, 0).unwrap());
    }

    #[test]
    fn args_fill_location_defaults() {
        let config = Config::from_args(full_args()).unwrap();
        assert_eq!(config.credentials.student_id, "201900001");
        assert_eq!(config.location, LocationProfile::default());
        assert_eq!(config.schedule, ScheduleTime::new(9, 20).unwrap());
        assert_eq!(config.portal_base_url, DEFAULT_PORTAL_BASE_URL);
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let args = CliArgs::parse_from(["hnu-clockin", "-s", "201900001", "-i", "AKID", "-k", "x"]);
        assert!(matches!(
            Config::from_args(args),
            Err(ConfigError::Missing { key: "password" })
        ));

        let args = CliArgs::parse_from(["hnu-clockin", "-s", "201900001", "-p", "pw"]);
        assert!(matches!(
            Config::from_args(args),
            Err(ConfigError::Missing { key: "ocrKeyId" })
        ));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let args = CliArgs::parse_from([
            "hnu-clockin", "-s", "  ", "-p", "pw", "-i", "AKID", "-k", "secret",
        ]);
        assert!(matches!(
            Config::from_args(args),
            Err(ConfigError::Missing { key: "studentId" })
        ));
    }

    #[test]
    fn legacy_json_settings_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "settings.json",
            r#"{
                "studentID": "201900002",
                "password": "pw",
                "province": "湖南省",
                "city": "长沙市",
                "country": "天心区",
                "address": "某地",
                "schedule": {"hour": 7, "minute": null},
                "SecretId": "AKID",
                "SecretKey": "secret"
            }"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.credentials.student_id, "201900002");
        assert_eq!(config.location.county, "天心区");
        assert_eq!(config.schedule, ScheduleTime::new(7, 20).unwrap());
        assert_eq!(config.service_keys.ocr_key_id, "AKID");
    }

    #[test]
    fn toml_settings_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "settings.toml",
            r#"
studentId = "201900003"
password = "pw"
ocrKeyId = "AKID"
ocrKeySecret = "secret"

[schedule]
hour = 6
minute = 45

[portal]
baseUrl = "http://127.0.0.1:9000/"

[retry]
maxAttempts = 3
delaySecs = 0.5

[attempts]
maxAttempts = 2
"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schedule, ScheduleTime::new(6, 45).unwrap());
        assert_eq!(config.portal_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.location, LocationProfile::default());
        assert_eq!(
            config.step_retry,
            RetryPolicy::new(3, Duration::from_millis(500))
        );
        assert_eq!(config.attempt_retry.max_attempts, 2);
        assert_eq!(config.attempt_retry.delay, Duration::from_secs(20));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "settings.toml",
            r#"
studentId = "1"
password = "pw"
ocrKeyId = "AKID"
ocrKeySecret = "secret"

[retry]
delaySecs = -1.0
"#,
        );

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidValue { key: "retry.delaySecs", .. })
        ));
    }

    #[test]
    fn first_existing_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let present = write_file(
            dir.path(),
            "settings.toml",
            "studentId = \"from-file\"\npassword = \"pw\"\nocrKeyId = \"a\"\nocrKeySecret = \"b\"\n",
        );

        let (config, source) =
            Config::resolve_from(&[missing, present.clone()], full_args()).unwrap();
        assert_eq!(source, ConfigSource::File(present));
        assert_eq!(config.credentials.student_id, "from-file");
    }

    #[test]
    fn falls_back_to_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) =
            Config::resolve_from(&[dir.path().join("nope.json")], full_args()).unwrap();
        assert_eq!(source, ConfigSource::CommandLine);
        assert_eq!(config.credentials.student_id, "201900001");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "settings.json", "{ not json");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
