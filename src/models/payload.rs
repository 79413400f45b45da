//! 门户接口请求体
//!
//! 字段名与门户前端保持一致，不做重命名。

use serde_json::{json, Value};

use crate::models::profile::{Credentials, LocationProfile, Verification};

/// 构建登录请求体
pub fn login_payload(credentials: &Credentials, verification: &Verification) -> Value {
    json!({
        "Code": credentials.student_id,
        "Password": credentials.password,
        "Token": verification.token,
        "VerCode": verification.code,
        "WechatUserinfoCode": null
    })
}

/// 构建打卡请求体
///
/// 健康申报部分固定为：体温不填、无异常、无接触、无行程。
pub fn clock_in_payload(location: &LocationProfile) -> Value {
    json!({
        "Temperature": null,
        "RealProvince": location.province,
        "RealCity": location.city,
        "RealCounty": location.county,
        "RealAddress": location.address,
        "IsUnusual": "0",
        "UnusualInfo": "",
        "IsTouch": "0",
        "IsInsulated": "0",
        "IsSuspected": "0",
        "IsDiagnosis": "0",
        "tripinfolist": [
            {
                "aTripDate": "",
                "FromAdr": "",
                "ToAdr": "",
                "Number": "",
                "trippersoninfolist": []
            }
        ],
        "toucherinfolist": [],
        "dailyinfo": {
            "IsVia": "0",
            "DateTrip": ""
        },
        "IsInCampus": "0",
        "IsViaHuBei": "0",
        "IsViaWuHan": "0",
        "InsulatedAddress": "",
        "TouchInfo": "",
        "IsNormalTemperature": "1",
        "Longitude": null,
        "Latitude": null
    })
}
