use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::types::TimeOfDay;

/// Prayer-time board CLI
#[derive(Parser, Debug)]
#[command(
    name = "salat",
    version,
    about = "礼拝時刻ボード（アザーン・イカーマ表示）",
    long_about = "モスク向けの礼拝時刻ボード。\n年ごとの時刻表からイカーマ時刻を求め、現在の礼拝とカウントダウンを表示します。",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイルのパス（既定: ~/.salat/config.json）
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Subcommand definitions
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// ボードを表示し続ける（Ctrl-Cで終了）
    Run,

    /// 指定日の礼拝時刻と状態を1回だけ表示
    Show(ShowArgs),

    /// シェル補完スクリプトを生成
    Completions {
        /// シェルの種類
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// show command arguments
#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// 対象日（YYYY-MM-DD、既定: 今日）
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// 評価する時刻（HH:MM、既定: 現在時刻）
    #[arg(short, long, value_name = "HH:MM")]
    pub time: Option<TimeOfDay>,
}
