use clap::Parser;

/// 命令行参数
///
/// 仅在找不到配置文件时生效。
#[derive(Debug, Clone, Parser)]
#[command(name = "hnu-clockin")]
#[command(version, about = "湖南大学疫情防控平台每日自动打卡", long_about = None)]
pub struct CliArgs {
    /// 所在省份
    #[arg(short = 'a', long, default_value = "湖南省")]
    pub province: String,

    /// 所在城市
    #[arg(short = 'b', long, default_value = "长沙市")]
    pub city: String,

    /// 所在区县
    #[arg(short = 'c', long, alias = "country", default_value = "岳麓区")]
    pub county: String,

    /// 具体地址
    #[arg(short = 'd', long, default_value = "湖南大学软件大楼")]
    pub address: String,

    /// 学号
    #[arg(short = 's', long)]
    pub username: Option<String>,

    /// 密码
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// 打卡时间（小时）
    #[arg(short = 't', long, default_value_t = 9)]
    pub hour: u32,

    /// 打卡时间（分钟）
    #[arg(short = 'm', long, default_value_t = 20)]
    pub minute: u32,

    /// 腾讯云密钥 id
    #[arg(short = 'i', long = "secretid")]
    pub secret_id: Option<String>,

    /// 腾讯云密钥 key
    #[arg(short = 'k', long = "secretkey")]
    pub secret_key: Option<String>,
}
