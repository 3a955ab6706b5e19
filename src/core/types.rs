// パイプラインを流れるデータ型定義

/// パイプラインを流れる作業単位
///
/// ペイロードはステージごとに変化する:
/// 最初は整数インデックス、最初の変換ステージ以降はダイジェスト文字列。
/// アイテム単位の失敗は`Failed`としてそのまま下流へ流し、
/// 集約ステージで成功結果と併せて報告する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Job {
    /// 署名対象の初期値（整数インデックス）
    Index(u64),
    /// ステージ変換後のダイジェスト文字列
    Digest(String),
    /// アイテム単位の失敗
    Failed { item: String, error: String },
}

impl Job {
    /// ステージへの入力データとしての文字列表現を取得
    ///
    /// `Failed`はデータを持たないため`None`を返す
    pub fn into_data(self) -> Option<String> {
        match self {
            Self::Index(value) => Some(value.to_string()),
            Self::Digest(digest) => Some(digest),
            Self::Failed { .. } => None,
        }
    }
}

/// 署名処理全体のサマリー
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SignSummary {
    pub total_items: usize,
    pub signed_items: usize,
    pub error_count: usize,
    /// 全アイテムのダイジェストをソートして`_`で結合した最終結果
    pub digest: String,
    pub total_processing_time_ms: u64,
    pub average_time_per_item_ms: f64,
}
