use anyhow::Result;
use clap::Parser;
use hnu_clockin::config::ConfigSource;
use hnu_clockin::{logger, App, CliArgs, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置（缺少必填项时直接退出）
    let (config, source) = Config::resolve(CliArgs::parse())?;
    match &source {
        ConfigSource::File(path) => info!("正在使用 {} 中的配置", path.display()),
        ConfigSource::CommandLine => info!("正在使用命令行参数"),
    }

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
