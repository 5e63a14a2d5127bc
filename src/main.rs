use anyhow::{Context, Result};
use clap::Parser;
use remove_duplicate_authors::{logger, App, Config};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Open Library 重复作者清理机器人
#[derive(Parser, Debug)]
#[command(name = "remove_duplicate_authors", version)]
struct Args {
    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 真实写回修改（默认只模拟）
    #[arg(long)]
    live: bool,

    /// 最多处理多少个作品
    #[arg(long)]
    max_works: Option<usize>,

    /// 作品之间的等待时间（毫秒）
    #[arg(long)]
    delay_ms: Option<u64>,

    /// 重复作者 JSON 文件
    #[arg(long)]
    input: Option<String>,

    /// 跳过 LIVE 模式的确认提示
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置：文件 → 环境变量 → 命令行
    let config = load_config(&args)?;

    // 先确认再建日志文件，取消时不留下空日志
    if needs_confirmation(&config, args.yes) && !confirm_live_mode()? {
        println!("已取消。");
        return Ok(());
    }

    // 初始化日志
    let log_file = logger::init(&config.log_dir)?;

    // 初始化并运行应用
    App::initialize(config, Some(log_file))
        .await?
        .run()
        .await?;

    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_toml_file(path)?.with_env_overrides()?,
        None => Config::from_env()?,
    };

    if args.live {
        config.dry_run = false;
    }
    if let Some(n) = args.max_works {
        config.max_works = Some(n);
    }
    if let Some(ms) = args.delay_ms {
        config.delay_ms = ms;
    }
    if let Some(input) = &args.input {
        config.input_file = input.clone();
    }

    Ok(config)
}

/// 只有 LIVE 模式且没有 `--yes` 时才需要确认
fn needs_confirmation(config: &Config, yes: bool) -> bool {
    !config.dry_run && !yes
}

fn confirm_live_mode() -> Result<bool> {
    print!("\n当前为 LIVE 模式，将真实修改 Open Library 数据。是否继续？(yes/no): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("无法读取确认输入")?;

    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
