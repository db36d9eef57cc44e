// src/error.rs
use std::path::PathBuf;

/// ツール全体で使うエラー型
///
/// ここに来るのは「実行全体を止めるべき」失敗だけ。
/// スキャフォールド 1 件ごとの失敗は `scaffold::ScaffoldFailure` としてレポートに積む。
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// 設定ファイルなどの読み込みに失敗
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 形式の sidebar 設定が壊れている
    #[error("invalid JSON sidebar config: {0}")]
    Json(#[from] serde_json::Error),

    /// TypeScript のパースに失敗
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// ファイル内に sidebar 配列が見つからない
    #[error("no sidebar configuration array found in {0}")]
    ConfigNotFound(PathBuf),

    /// id の重複
    #[error("duplicate sidebar id '{id}' (used by '{first}' and '{second}')")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    /// 生成物 (ルートファイル・レポート) の書き込みに失敗
    #[error("cannot write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
