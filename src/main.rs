//! DFC 命令列工具

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dfc::{
    compute_from_source, CoverageSummary, CoverageTimeline, CsvTableSource, DfcConfig,
    ResultAggregator, SyntheticSettings, SyntheticTableSource, TableSource,
};

#[derive(Parser)]
#[command(name = "dfc", version, about = "Days Forward Coverage 計算工具")]
struct Cli {
    /// TOML 配置檔（欄位映射、臨界天數、排行筆數）
    #[arg(long, global = true, env = "DFC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 計算各產品覆蓋天數並輸出結果表
    Compute(ComputeArgs),
    /// 生成模擬預測表與庫存表
    Generate(GenerateArgs),
    /// 計算單一產品在各預測日的覆蓋天數
    Timeline(TimelineArgs),
}

#[derive(Args)]
struct TableArgs {
    /// 預測表 CSV
    #[arg(long, env = "DFC_FORECAST_FILE", default_value = "data/forecast.csv")]
    forecast: PathBuf,

    /// 庫存表 CSV
    #[arg(long, env = "DFC_INVENTORY_FILE", default_value = "data/inventory.csv")]
    inventory: PathBuf,
}

#[derive(Args)]
struct ComputeArgs {
    #[command(flatten)]
    tables: TableArgs,

    /// 覆蓋結果 CSV
    #[arg(long, env = "DFC_COVERAGE_FILE", default_value = "data/coverage.csv")]
    output: PathBuf,

    /// 參考日（YYYY-MM-DD，預設今天）
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// 以預測表最早日期為參考日
    #[arg(long, conflicts_with = "reference_date")]
    from_earliest_forecast: bool,

    /// 臨界覆蓋天數
    #[arg(long)]
    critical_threshold: Option<u32>,

    /// 最高/最低排行筆數
    #[arg(long)]
    top_n: Option<usize>,

    /// 按產品並行計算
    #[arg(long)]
    parallel: bool,

    /// 以 JSON 輸出彙總
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    tables: TableArgs,

    /// 產品數量
    #[arg(long, default_value_t = 100)]
    products: usize,

    /// 預測天數
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// 預測起始日
    #[arg(long, default_value = "2024-08-01")]
    start: NaiveDate,

    /// 效期上限日
    #[arg(long, default_value = "2024-08-31")]
    end: NaiveDate,

    /// 隨機種子
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct TimelineArgs {
    #[command(flatten)]
    tables: TableArgs,

    /// 產品ID
    #[arg(long)]
    product: String,

    /// 時間序列 CSV（省略則輸出到 stdout）
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    dfc::logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DfcConfig::load(path)
            .with_context(|| format!("無法載入配置檔 {}", path.display()))?,
        None => DfcConfig::default(),
    };

    match cli.command {
        Command::Compute(args) => compute(config, args),
        Command::Generate(args) => generate(config, args),
        Command::Timeline(args) => timeline(config, args),
    }
}

fn compute(mut config: DfcConfig, args: ComputeArgs) -> Result<()> {
    if let Some(days) = args.critical_threshold {
        config = config.with_critical_threshold_days(days);
    }
    if let Some(top_n) = args.top_n {
        config = config.with_top_n(top_n);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }

    let source = CsvTableSource::new(&args.tables.forecast, &args.tables.inventory);
    let tables = source
        .load_tables(&config)
        .context("輸入表格驗證失敗")?;

    // 時鐘只在此處讀取，核心計算一律使用注入的參考日
    let reference_date = if args.from_earliest_forecast {
        tables
            .earliest_forecast_date()
            .context("預測表為空，無法決定參考日")?
    } else {
        args.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    };

    let run = compute_from_source(
        &dfc::InMemoryTableSource::new(tables),
        &config,
        reference_date,
    )?;

    ensure_parent(&args.output)?;
    let file = File::create(&args.output)
        .with_context(|| format!("無法建立 {}", args.output.display()))?;
    dfc_io::write_coverage_table(BufWriter::new(file), &run.results, &config.columns.coverage)?;
    tracing::info!("覆蓋結果已寫入 {}", args.output.display());

    let summary = run.summarize(&ResultAggregator::from_config(&config));
    if args.json {
        let report = serde_json::json!({
            "run_id": run.run_id,
            "reference_date": run.reference_date,
            "warnings": run.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            "products_without_forecast": run.products_without_forecast,
            "calculation_time_ms": run.calculation_time_ms,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(reference_date, &summary, &run.products_without_forecast);
    }

    Ok(())
}

fn print_summary(
    reference_date: NaiveDate,
    summary: &CoverageSummary,
    without_forecast: &[String],
) {
    println!("Days Forward Coverage 彙總（參考日 {}）", reference_date);

    match &summary.statistics {
        Some(stats) => {
            println!("分析產品數: {}", stats.count);
            println!("平均覆蓋天數: {:.2}", stats.mean);
            println!("標準差: {:.2}", stats.std);
            println!(
                "最小 / 25% / 中位數 / 75% / 最大: {} / {:.1} / {:.1} / {:.1} / {}",
                stats.min, stats.p25, stats.median, stats.p75, stats.max
            );
        }
        None => println!("沒有可分析的產品"),
    }

    println!(
        "\n覆蓋低於 {} 天的產品: {}",
        summary.critical_threshold_days,
        summary.critical.len()
    );
    for result in summary.critical.iter().take(10) {
        println!("  {:<12} {:>4} 天", result.product_id, result.days_forward_coverage);
    }

    println!("\n覆蓋最高:");
    for result in &summary.top {
        println!("  {:<12} {:>4} 天", result.product_id, result.days_forward_coverage);
    }
    println!("\n覆蓋最低:");
    for result in &summary.bottom {
        println!("  {:<12} {:>4} 天", result.product_id, result.days_forward_coverage);
    }

    println!("\n無可用庫存的產品: {}", summary.zero_inventory.len());
    if !without_forecast.is_empty() {
        println!("有庫存但無預測的產品: {}", without_forecast.len());
    }
}

fn generate(config: DfcConfig, args: GenerateArgs) -> Result<()> {
    let settings = SyntheticSettings {
        num_products: args.products,
        forecast_days: args.days,
        start_date: args.start,
        end_date: args.end,
        seed: args.seed,
        ..SyntheticSettings::default()
    };
    let source = SyntheticTableSource::new(settings);
    let tables = source.load_tables(&config)?;

    ensure_parent(&args.tables.forecast)?;
    ensure_parent(&args.tables.inventory)?;
    let forecast_file = File::create(&args.tables.forecast)
        .with_context(|| format!("無法建立 {}", args.tables.forecast.display()))?;
    dfc_io::write_forecast_table(
        BufWriter::new(forecast_file),
        &tables.forecasts,
        &config.columns.forecast,
    )?;
    let inventory_file = File::create(&args.tables.inventory)
        .with_context(|| format!("無法建立 {}", args.tables.inventory.display()))?;
    dfc_io::write_inventory_table(
        BufWriter::new(inventory_file),
        &tables.batches,
        &config.columns.inventory,
    )?;

    println!(
        "已生成 {} 個產品 {} 天的預測（{} 筆）與 {} 個庫存批次",
        source.settings().num_products,
        source.settings().forecast_days,
        tables.forecasts.len(),
        tables.batches.len()
    );
    Ok(())
}

fn timeline(config: DfcConfig, args: TimelineArgs) -> Result<()> {
    let tables = CsvTableSource::new(&args.tables.forecast, &args.tables.inventory)
        .load_tables(&config)
        .context("輸入表格驗證失敗")?;

    let points = CoverageTimeline::compute(&args.product, &tables.forecasts, &tables.batches)?;
    if points.is_empty() {
        tracing::warn!("產品 {} 缺少預測或庫存資料", args.product);
    }

    match &args.output {
        Some(path) => {
            ensure_parent(path)?;
            let file =
                File::create(path).with_context(|| format!("無法建立 {}", path.display()))?;
            dfc_io::write_timeline(BufWriter::new(file), &args.product, &points)?;
        }
        None => dfc_io::write_timeline(std::io::stdout().lock(), &args.product, &points)?,
    }

    Ok(())
}

fn ensure_parent(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("無法建立目錄 {}", parent.display()))?;
    }
    Ok(())
}
