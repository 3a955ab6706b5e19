// 並列署名システムのトレイト定義
// 全ての抽象化インターフェースを定義

use super::error::SignerResult;
use super::types::Job;
use async_trait::async_trait;
use mockall::automock;
use tokio::sync::mpsc;

/// 並列署名の設定を抽象化するトレイト
#[automock]
pub trait SignerConfig: Send + Sync {
    /// 同時に処理するアイテム数の上限を取得
    fn max_concurrent_items(&self) -> usize;

    /// ステージ間フィードのバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// SignerConfig for Box<dyn SignerConfig>
impl SignerConfig for Box<dyn SignerConfig> {
    fn max_concurrent_items(&self) -> usize {
        self.as_ref().max_concurrent_items()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_items: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// アイテム単位のエラー報告
    async fn report_item_error(&self, item: &str, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_signed: usize, total_errors: usize);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_items: usize) {
        self.as_ref().report_started(total_items).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_item_error(&self, item: &str, error: &str) {
        self.as_ref().report_item_error(item, error).await
    }

    async fn report_completed(&self, total_signed: usize, total_errors: usize) {
        self.as_ref().report_completed(total_signed, total_errors).await
    }
}

/// パイプラインステージの抽象化トレイト
///
/// ステージは入力フィードを消費し、出力フィードへ生産する。
/// 出力フィードの送信側はステージが専有し、runの完了と同時に
/// ドロップされて閉じる（後続ステージへの終了シグナル）。
/// 入力フィードの送信側は決して所有しない。
#[automock]
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// ステージ名（診断・エラー表示用）
    fn name(&self) -> &'static str;

    /// 入力フィードを消費して出力フィードへ生産する
    ///
    /// 全ての生産が完了してからリターンすること。
    /// リターン値はフィード閉鎖とは独立した明示的な完了シグナルとして
    /// Runnerに回収される。
    async fn run(&self, input: mpsc::Receiver<Job>, output: mpsc::Sender<Job>)
        -> SignerResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_signer_config() {
        let mut mock = MockSignerConfig::new();
        mock.expect_max_concurrent_items().returning(|| 8);
        mock.expect_channel_buffer_size().returning(|| 100);
        mock.expect_enable_progress_reporting().returning(|| false);

        assert_eq!(mock.max_concurrent_items(), 8);
        assert_eq!(mock.channel_buffer_size(), 100);
        assert!(!mock.enable_progress_reporting());
    }

    #[test]
    fn test_boxed_signer_config_forwards() {
        let mut mock = MockSignerConfig::new();
        mock.expect_max_concurrent_items().returning(|| 4);
        mock.expect_channel_buffer_size().returning(|| 50);
        mock.expect_enable_progress_reporting().returning(|| true);

        let boxed: Box<dyn SignerConfig> = Box::new(mock);
        assert_eq!(boxed.max_concurrent_items(), 4);
        assert_eq!(boxed.channel_buffer_size(), 50);
        assert!(boxed.enable_progress_reporting());
    }

    #[tokio::test]
    async fn test_mock_progress_reporter() {
        let mut mock = MockProgressReporter::new();
        mock.expect_report_started().times(1).return_const(());
        mock.expect_report_completed().times(1).return_const(());

        mock.report_started(10).await;
        mock.report_completed(9, 1).await;
    }
}
