use anyhow::Result;
use minicode_judge::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();
    config.validate()?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
