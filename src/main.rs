// src/main.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod audit;
mod config;
mod error;
mod flatten;
mod generator;
mod model;
mod parser;
mod report;
mod resolver;
mod scaffold;
mod validator;

use audit::{audit_routes, render_audit_markdown};
use config::{load_sidebar_config, SettingsOverrides, ToolSettings};
use flatten::flatten_routes;
use generator::{generate_routes, write_routes, RouteLayout, WriteOutcome};
use model::SidebarConfig;
use resolver::SourceFlavor;
use report::{print_summary, render_validation_markdown, write_report};
use scaffold::scaffold_missing;
use validator::validate_components;

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "Sidebar Route Tool",
    version = "0.1.0",
    about = "sidebar 設定からルートを生成し、参照コンポーネントの存在を検証・補完する CLI ツール"
)]
struct Cli {
    /// 対象プロジェクトのルート
    #[arg(
        short = 'r',
        long = "project-root",
        value_name = "DIR",
        default_value = ".",
        global = true
    )]
    project_root: PathBuf,

    /// sidebar 設定ファイル (.ts / .tsx / .json)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// component 参照の基準ディレクトリ
    #[arg(long = "src-dir", value_name = "DIR", global = true)]
    src_dir: Option<PathBuf>,

    /// component ファイルの拡張子
    #[arg(long, value_name = "EXT", global = true)]
    ext: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Router と Layout を含む入れ子のルーティングモジュールを生成する
    RouteGenerate {
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// 既存の Routes に埋め込むフラットなルート定義を生成する
    RouteFix {
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// 参照コンポーネントの存在を確認し、足りないものを仮実装で作る
    ComponentValidate,
    /// sidebar から辿れないページコンポーネントを探す
    RouteAudit,
    /// 正規化した設定を JSON で出力する
    Dump {
        /// ルート一覧ではなくツリー全体を出力
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sidebar_route_tool=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let routes_file = match &cli.command {
        Command::RouteGenerate { out } | Command::RouteFix { out } => out.clone(),
        _ => None,
    };
    let settings = ToolSettings::resolve(
        &cli.project_root,
        SettingsOverrides {
            config_file: cli.config,
            src_dir: cli.src_dir,
            extension: cli.ext,
            routes_file,
        },
    )?;
    tracing::debug!(?settings, "resolved settings");

    // どのコマンドも設定ツリーを明示的に読み込んでから渡す
    let config = load_sidebar_config(&settings.config_file)?;

    match cli.command {
        Command::RouteGenerate { .. } => run_generate(&config, &settings, RouteLayout::Nested),
        Command::RouteFix { .. } => run_generate(&config, &settings, RouteLayout::Flat),
        Command::ComponentValidate => run_validate(&config, &settings),
        Command::RouteAudit => run_audit(&config, &settings),
        Command::Dump { tree } => run_dump(&config, tree),
    }
}

fn run_generate(
    config: &SidebarConfig,
    settings: &ToolSettings,
    layout: RouteLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    config.check_unique_ids()?;

    let routes = flatten_routes(&config.items);
    let flavor = SourceFlavor::from_path(&settings.routes_file);
    let generated = generate_routes(&routes, layout, flavor);
    let outcome = write_routes(&settings.routes_file, &generated)?;

    let shown = settings.display(&settings.routes_file);
    match outcome {
        WriteOutcome::Written => println!("Routes generated successfully at {}", shown),
        WriteOutcome::Unchanged => println!("Routes already up to date at {}", shown),
    }
    println!("- Routes: {}", generated.routes);
    println!("- Imports: {}", generated.imports);
    if !generated.skipped.is_empty() {
        println!("- Skipped (file path with extension): {}", generated.skipped.join(", "));
    }
    Ok(())
}

fn run_validate(
    config: &SidebarConfig,
    settings: &ToolSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    config.check_unique_ids()?;

    // 必ず検証してからスキャフォールドする
    let mut report = validate_components(config, &settings.src_dir, &settings.extension);
    scaffold_missing(&mut report, &settings.src_dir, &settings.extension);

    let markdown = render_validation_markdown(&report, &settings.extension);
    write_report(&settings.validation_report, &markdown)?;
    println!(
        "Component validation report generated at {}",
        settings.display(&settings.validation_report)
    );

    print_summary(&report);
    Ok(())
}

fn run_audit(
    config: &SidebarConfig,
    settings: &ToolSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = audit_routes(config, &settings.src_dir, &settings.extension);
    write_report(&settings.audit_report, &render_audit_markdown(&report))?;

    println!("=== Route Audit ===");
    println!("Total component files found: {}", report.total_files);
    println!("Referenced by the sidebar: {}", report.referenced_files);
    println!("Potentially unrouted pages: {}", report.unrouted.len());
    for suggestion in &report.unrouted {
        println!("- {} -> {}", suggestion.component, suggestion.path);
    }
    println!("Route audit report written to {}", settings.display(&settings.audit_report));
    Ok(())
}

fn run_dump(config: &SidebarConfig, tree: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = if tree {
        serde_json::to_string_pretty(config)?
    } else {
        serde_json::to_string_pretty(&flatten_routes(&config.items))?
    };
    println!("{}", json);
    Ok(())
}
