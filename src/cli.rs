use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "content-analyzer")]
#[command(about = "AI image content analyzer with preference learning", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ（省略時は設定ファイルの値）
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,

    /// 学習データの保存先ディレクトリ
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTP APIサーバーを起動
    Serve {
        /// 待ち受けアドレス（例: 127.0.0.1:3000）
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// 画像（またはフォルダ内の画像）を解析
    Analyze {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        path: PathBuf,

        /// 解析の目的など自由記述のコンテキスト
        #[arg(short, long)]
        context: Option<String>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 結果を学習に記録しない
        #[arg(long)]
        no_learn: bool,

        /// 各結果の後に役に立ったかを尋ねる
        #[arg(long)]
        feedback: bool,
    },

    /// カテゴリへのフィードバックを記録
    Feedback {
        /// 対象カテゴリ
        #[arg(required = true)]
        category: String,

        /// 役に立たなかった（省略時は役に立った）
        #[arg(long)]
        not_helpful: bool,

        /// 対象アップロードID
        #[arg(long, default_value = "")]
        upload_id: String,
    },

    /// 学習プロファイルを表示/リセット
    Profile {
        /// 次回の解析に付与される学習コンテキストを表示
        #[arg(long)]
        context: bool,

        /// 生のプロファイルJSONを表示
        #[arg(long)]
        json: bool,

        /// 学習データを削除
        #[arg(long)]
        reset: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 既定のプロバイダを設定
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
