// ==========================================
// ONE Tracker 质检分析引擎 - 命令行入口
// ==========================================
// 用法: one-tracker-qc <检验日志.xlsx|csv> [角色|all] [期间] [配置档.json]
// 输出: 角色视图 JSON（stdout）；日志写 stderr
// ==========================================

use anyhow::{anyhow, Context, Result};
use one_tracker_qc::engine::{AnalysisPeriod, PeriodPreset, RoleViewComposer};
use one_tracker_qc::{i18n, logging, AnalysisProfile, InspectionImporter, Role};
use std::path::PathBuf;

struct CliArgs {
    input: PathBuf,
    roles: Vec<Role>,
    period: String,
    profile: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("用法: one-tracker-qc <文件> [角色|all] [期间] [配置档.json]"))?;

    let roles = match args.next() {
        None => Role::ALL.to_vec(),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Role::ALL.to_vec(),
        Some(raw) => vec![Role::parse(&raw).ok_or_else(|| anyhow!("未知角色: {}", raw))?],
    };

    let period = args.next().unwrap_or_else(|| "latest".to_string());
    let profile = args.next().map(PathBuf::from);

    Ok(CliArgs {
        input,
        roles,
        period,
        profile,
    })
}

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", one_tracker_qc::APP_NAME, one_tracker_qc::VERSION);
    tracing::info!("==================================================");

    let args = parse_args()?;

    let profile = match &args.profile {
        Some(path) => AnalysisProfile::from_json_file(path)
            .with_context(|| format!("加载配置档失败: {}", path.display()))?,
        None => AnalysisProfile::default(),
    };

    let dataset = InspectionImporter::new(profile.sku_catalog.clone())
        .import_file(&args.input)
        .with_context(|| format!("导入检验日志失败: {}", args.input.display()))?;

    let period = AnalysisPeriod::parse_selection(&args.period, &dataset.months())
        .ok_or_else(|| anyhow!("无法解析分析期间或期间内无数据: {}", args.period))?;
    match PeriodPreset::parse(&args.period) {
        Some(preset) => tracing::info!(
            preset = %i18n::t_in(&profile.locale, preset.label_key()),
            period = %period,
            "分析期间已确定"
        ),
        None => tracing::info!(period = %period, "分析期间已确定"),
    }

    let composer = RoleViewComposer::new(&profile);
    let payloads: Vec<_> = args
        .roles
        .iter()
        .map(|role| composer.compose(*role, &dataset, &period))
        .collect();

    let json = serde_json::to_string_pretty(&payloads).context("序列化角色视图失败")?;
    println!("{}", json);
    Ok(())
}
