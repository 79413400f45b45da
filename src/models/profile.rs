//! 打卡所需的静态资料
//!
//! 整个运行期间保持不变，由配置层一次性提供。

use std::fmt;

/// 登录凭据（学号 + 密码）
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub student_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(student_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("student_id", &self.student_id)
            .field("password", &"***")
            .finish()
    }
}

/// 所在地信息，原样写入每次打卡提交
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationProfile {
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
}

impl Default for LocationProfile {
    fn default() -> Self {
        Self {
            province: "湖南省".to_string(),
            city: "长沙市".to_string(),
            county: "岳麓区".to_string(),
            address: "湖南大学软件大楼".to_string(),
        }
    }
}

/// OCR 服务密钥，仅验证码识别使用
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceKeys {
    pub ocr_key_id: String,
    pub ocr_key_secret: String,
}

impl ServiceKeys {
    pub fn new(ocr_key_id: impl Into<String>, ocr_key_secret: impl Into<String>) -> Self {
        Self {
            ocr_key_id: ocr_key_id.into(),
            ocr_key_secret: ocr_key_secret.into(),
        }
    }
}

impl fmt::Debug for ServiceKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceKeys")
            .field("ocr_key_id", &self.ocr_key_id)
            .field("ocr_key_secret", &"***")
            .finish()
    }
}

/// 一次性的验证 token 与识别出的验证码
///
/// 二者总是成对获取，并且只用于一次登录请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub token: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("201900001", "hunter2");
        let keys = ServiceKeys::new("AKIDxxx", "very-secret");

        let creds_dbg = format!("{:?}", creds);
        let keys_dbg = format!("{:?}", keys);

        assert!(creds_dbg.contains("201900001"));
        assert!(!creds_dbg.contains("hunter2"));
        assert!(keys_dbg.contains("AKIDxxx"));
        assert!(!keys_dbg.contains("very-secret"));
    }

    #[test]
    fn default_location_is_campus() {
        let location = LocationProfile::default();
        assert_eq!(location.province, "湖南省");
        assert_eq!(location.county, "岳麓区");
    }
}
