//! UniSoVet CLI 客户端
//!
//! 非交互式 CLI，用于对接后端做冒烟测试：全量同步、查看销售历史、生成预测。

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};
use unisovet_sdk_core::clinic::client::DEFAULT_API_URL;
use unisovet_sdk_core::clinic::inventory::{describe_sale_item, format_brl};
use unisovet_sdk_core::{ClientConfig, ClinicClient, Notifier, Page, PageView};

/// UniSoVet CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "unisovet-cli")]
#[command(about = "UniSoVet CLI 客户端 - 用于测试诊所后端", long_about = None)]
struct Args {
    /// 后端 API 根地址
    #[arg(long, env = "UNISOVET_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// 日志级别（默认: info,unisovet_sdk_core=debug）
    #[arg(long, default_value = "info,unisovet_sdk_core=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 全量拉取并打印各集合数量和库存统计
    Sync,
    /// 打印一页销售历史
    History {
        /// 页码（从 1 开始）
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// 生成销售预测和补货建议
    Forecast,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .context("无法创建日志文件 debug.log")?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
    Ok(())
}

/// 提示写入日志；无人值守时拒绝所有确认
struct CliNotifier;

#[async_trait]
impl Notifier for CliNotifier {
    async fn alert(&self, message: String) {
        warn!("[CLI] 🔔 {}", message);
    }

    async fn confirm(&self, message: String) -> bool {
        warn!("[CLI] ❓ {}（非交互模式，默认取消）", message);
        false
    }
}

async fn run_sync(client: &ClinicClient) -> Result<()> {
    let report = client.fetch_all().await;
    if !report.is_complete() {
        warn!("[CLI] ⚠️ 部分集合拉取失败: {:?}", report.failed);
    }

    for page in Page::ALL {
        match client.page_view(page).await {
            PageView::Dashboard {
                clients,
                appointments,
            } => info!(
                "[CLI] {} - 客户: {}, 预约: {}",
                page,
                clients.len(),
                appointments.len()
            ),
            PageView::Clients { clients } => {
                let pets: usize = clients.iter().map(|c| c.pet_count()).sum();
                info!("[CLI] {} - 客户: {}, 宠物: {}", page, clients.len(), pets);
            }
            PageView::Appointments { appointments, .. } => {
                for a in &appointments {
                    info!(
                        "[CLI]   - #{} {} | {} | {}",
                        a.id,
                        a.date,
                        a.reason,
                        a.status.label()
                    );
                }
            }
            PageView::Inventory {
                products,
                services,
                sales,
                ..
            } => info!(
                "[CLI] {} - 商品: {}, 服务: {}, 销售: {}",
                page,
                products.len(),
                services.len(),
                sales.len()
            ),
        }
    }

    let overview = client.overview().await;
    info!(
        "[CLI] 📊 商品总数: {}, 低库存: {}, 总收入: {}",
        overview.product_count,
        overview.low_stock_count,
        format_brl(overview.total_revenue)
    );
    Ok(())
}

async fn run_history(client: &ClinicClient, page: usize) -> Result<()> {
    // 明细名称需要当前的商品和服务列表
    client.fetch_all().await;
    let state = client.snapshot().await;

    let mut history = client.sales_history();
    history
        .load_page(page)
        .await
        .with_context(|| format!("加载第 {} 页销售历史失败", page))?;

    info!(
        "[CLI] 🧾 第 {} 页，共 {} 页",
        history.page(),
        history
            .total_pages()
            .map_or_else(|| "?".to_string(), |n| n.to_string())
    );
    for sale in history.sales() {
        info!("[CLI] 销售 #{} | {} | {}", sale.id, sale.date, format_brl(sale.total));
        for item in &sale.items {
            info!(
                "[CLI]   - {} x{} @ {}",
                describe_sale_item(item, &state.products, &state.services),
                item.quantity,
                format_brl(item.price)
            );
        }
    }
    if history.show_pager() {
        info!(
            "[CLI] 上一页: {}, 下一页: {}",
            history.has_prev(),
            history.has_next()
        );
    }
    Ok(())
}

async fn run_forecast(client: &ClinicClient) -> Result<()> {
    let mut panel = client.forecast_panel();
    if let Err(e) = panel.generate().await {
        warn!("[CLI] 预测请求失败: {}", e);
    }
    if let Some(message) = panel.error() {
        warn!("[CLI] ⚠️ {}", message);
        return Ok(());
    }

    if let Some(summary) = panel.summary() {
        info!("[CLI] 📈 {}", summary);
    }
    for point in panel.forecast().unwrap_or_default() {
        info!("[CLI]   {} → {}", point.date, format_brl(point.predicted_sales));
    }
    for s in panel.suggestions().unwrap_or_default() {
        info!(
            "[CLI] 📦 {} | 库存: {} | 预计 30 天销量: {} | {}",
            s.product_name, s.current_stock, s.estimated_sales_30_days, s.suggestion
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level)?;

    info!("[CLI] 🚀 UniSoVet CLI 客户端");
    info!("[CLI] 🌐 API: {}", args.api_url);

    let mut config = ClientConfig::from_env().context("读取环境变量配置失败")?;
    config.api_base_url = args.api_url;
    let client = ClinicClient::new(config, Arc::new(CliNotifier)).context("创建客户端失败")?;

    match args.command {
        Command::Sync => run_sync(&client).await,
        Command::History { page } => run_history(&client, page).await,
        Command::Forecast => run_forecast(&client).await,
    }
}
