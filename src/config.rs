// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::model::{RawSidebarItem, SidebarConfig};
use crate::parser::parse_sidebar_file;
use crate::resolver::{absolutize_root, resolve_under};

pub const DEFAULT_CONFIG_FILE: &str = "src/config/sidebarConfig.ts";
pub const DEFAULT_SRC_DIR: &str = "src";
pub const DEFAULT_EXTENSION: &str = "tsx";
pub const DEFAULT_ROUTES_FILE: &str = "src/AppRoutes.tsx";
pub const VALIDATION_REPORT_FILE: &str = "COMPONENT_VALIDATION.md";
pub const AUDIT_REPORT_FILE: &str = "ROUTE_AUDIT_REPORT.md";

/// 各ツールが読み書きする場所をまとめた設定。すべて絶対パス。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub project_root: PathBuf,
    pub config_file: PathBuf,
    /// component 参照の基準ディレクトリ
    pub src_dir: PathBuf,
    /// component 参照に付ける拡張子 (ドットなし)
    pub extension: String,
    pub routes_file: PathBuf,
    pub validation_report: PathBuf,
    pub audit_report: PathBuf,
}

/// CLI から渡される上書き値。None ならデフォルト。
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub src_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub routes_file: Option<PathBuf>,
}

impl ToolSettings {
    /// プロジェクトルートを絶対パス化し、相対指定をすべてその下に解決する
    pub fn resolve(project_root: &Path, overrides: SettingsOverrides) -> Result<Self, ToolError> {
        let io_err = |source| ToolError::Io {
            path: project_root.to_path_buf(),
            source,
        };
        let root = absolutize_root(project_root).map_err(io_err)?;

        let under = |value: Option<PathBuf>, default: &str| -> Result<PathBuf, ToolError> {
            let value = value.unwrap_or_else(|| PathBuf::from(default));
            resolve_under(&root, &value).map_err(|source| ToolError::Io { path: value, source })
        };

        let extension = overrides
            .extension
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();

        Ok(ToolSettings {
            config_file: under(overrides.config_file, DEFAULT_CONFIG_FILE)?,
            src_dir: under(overrides.src_dir, DEFAULT_SRC_DIR)?,
            extension,
            routes_file: under(overrides.routes_file, DEFAULT_ROUTES_FILE)?,
            validation_report: root.join(VALIDATION_REPORT_FILE),
            audit_report: root.join(AUDIT_REPORT_FILE),
            project_root: root,
        })
    }

    /// 表示用にプロジェクトルートからの相対パスにする
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// 設定ファイルを読み込む。`.json` なら JSON、それ以外は TypeScript として解析する。
pub fn load_sidebar_config(path: &Path) -> Result<SidebarConfig, ToolError> {
    let is_json = path.extension().map_or(false, |ext| ext == "json");
    let raw = if is_json {
        load_json(path)?
    } else {
        parse_sidebar_file(path)?
    };

    let config = SidebarConfig::from_raw(raw);
    tracing::info!(path = %path.display(), top_level = config.items.len(), "sidebar config loaded");
    Ok(config)
}

pub fn load_json(path: &Path) -> Result<Vec<RawSidebarItem>, ToolError> {
    let text = fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
