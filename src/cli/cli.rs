use clap::Parser;

/// Process Manager - 主机进程查看与生命周期控制 API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// 监听端口
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// 监听地址
    #[arg(short = 'a', long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// 所有进程路由共用的静态 API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,
}
