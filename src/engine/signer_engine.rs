// SignerEngine - 完全依存性注入による並列署名エンジン
// 全ての依存関係がコンストラクタで注入される真のDIパターン実装

use super::{run_pipeline, CombineStage, DigestPairStage, InputStage, WideDigestStage};
use crate::core::{
    Job, PipelineStage, ProgressReporter, SignSummary, SignerConfig, SignerError, SignerResult,
};
use crate::hash_service::HashService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// 完全依存性注入による並列署名エンジン
///
/// 全ての依存関係がコンストラクタで注入される真のDIパターンを実装。
/// テスタビリティと保守性を重視した設計。
///
/// 並列処理で共有される依存関係はArcで管理し、
/// 不要なクローンを避ける効率的な設計。
pub struct SignerEngine<H, C, R> {
    hash_service: Arc<H>,
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<H, C, R> SignerEngine<H, C, R>
where
    H: HashService + 'static,
    C: SignerConfig,
    R: ProgressReporter + 'static,
{
    /// 新しい署名エンジンを作成
    ///
    /// 全ての依存関係をコンストラクタで注入する（Constructor Injection）
    pub fn new(hash_service: H, config: C, reporter: R) -> Self {
        Self {
            hash_service: Arc::new(hash_service),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// `0..count`の整数列を署名する高レベルAPI
    pub async fn sign_range(&self, count: u64) -> SignerResult<SignSummary> {
        self.sign_items((0..count).collect()).await
    }

    /// 指定されたアイテムリストを署名する
    ///
    /// 4ステージ（入力配信 → ダイジェストペア → 6系統ダイジェスト →
    /// 集約）のパイプラインを構築して実行し、サマリーを返す。
    pub async fn sign_items(&self, items: Vec<u64>) -> SignerResult<SignSummary> {
        self.validate_config()?;

        let start_time = Instant::now();
        let total_items = items.len();

        self.reporter.report_started(total_items).await;

        // GlobalSlowHashLock - slow_hashをプロセス全体で直列化する
        // 容量1のセマフォ。実行ごとに作成し、必要なステージへ明示的に
        // 注入する。
        let slow_hash_lock = Arc::new(Semaphore::new(1));
        let item_limit = Arc::new(Semaphore::new(self.config.max_concurrent_items()));

        let signed_count = Arc::new(AtomicUsize::new(0));
        let error_count = Arc::new(AtomicUsize::new(0));

        let stages: Vec<Box<dyn PipelineStage>> = vec![
            Box::new(InputStage::new(items)),
            Box::new(DigestPairStage::new(
                Arc::clone(&self.hash_service),
                slow_hash_lock,
                Arc::clone(&item_limit),
            )),
            Box::new(WideDigestStage::new(
                Arc::clone(&self.hash_service),
                item_limit,
            )),
            Box::new(CombineStage::new(
                Arc::clone(&self.reporter),
                Arc::clone(&signed_count),
                Arc::clone(&error_count),
                total_items,
            )),
        ];

        let mut outputs = run_pipeline(stages, self.config.channel_buffer_size()).await?;

        // 終端フィードは結合ダイジェストを1つだけ返す
        let digest = match (outputs.pop(), outputs.is_empty()) {
            (Some(Job::Digest(digest)), true) => digest,
            _ => {
                return Err(SignerError::pipeline_execution(
                    "終端フィードは1つの結合ダイジェストを返す必要があります",
                ))
            }
        };

        let signed_items = signed_count.load(Ordering::SeqCst);
        let errors = error_count.load(Ordering::SeqCst);
        self.reporter.report_completed(signed_items, errors).await;

        let total_processing_time_ms = start_time.elapsed().as_millis() as u64;
        let average_time_per_item_ms = if total_items > 0 {
            total_processing_time_ms as f64 / total_items as f64
        } else {
            0.0
        };

        Ok(SignSummary {
            total_items,
            signed_items,
            error_count: errors,
            digest,
            total_processing_time_ms,
            average_time_per_item_ms,
        })
    }

    /// 実行前の設定検証
    fn validate_config(&self) -> SignerResult<()> {
        if self.config.max_concurrent_items() == 0 {
            return Err(SignerError::configuration(
                "同時処理アイテム数は1以上である必要があります",
            ));
        }
        if self.config.channel_buffer_size() == 0 {
            return Err(SignerError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }
        Ok(())
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_service::HashService;
    use crate::services::{DefaultSignerConfig, NoOpProgressReporter};
    use anyhow::Result;
    use async_trait::async_trait;

    struct StubHashService;

    #[async_trait]
    impl HashService for StubHashService {
        async fn fast_hash(&self, input: &str) -> Result<String> {
            Ok(format!("F({input})"))
        }

        async fn slow_hash(&self, input: &str) -> Result<String> {
            Ok(format!("S({input})"))
        }
    }

    /// スタブバックエンドでの期待値を手元で計算する
    fn expected_digest(items: &[u64]) -> String {
        let mut wide_digests: Vec<String> = items
            .iter()
            .map(|item| {
                let pair = format!("F({item})~F(S({item}))");
                (0..crate::engine::FANOUT_WIDTH)
                    .map(|index| format!("F({index}{pair})"))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect();
        wide_digests.sort();
        wide_digests.join("_")
    }

    fn make_engine() -> SignerEngine<StubHashService, DefaultSignerConfig, NoOpProgressReporter> {
        SignerEngine::new(
            StubHashService,
            DefaultSignerConfig::default(),
            NoOpProgressReporter::new(),
        )
    }

    #[tokio::test]
    async fn test_sign_items_matches_hand_computed_digest() {
        let engine = make_engine();

        let summary = engine.sign_items(vec![0, 1, 2]).await.unwrap();

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.signed_items, 3);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.digest, expected_digest(&[0, 1, 2]));
    }

    #[tokio::test]
    async fn test_sign_range_uses_zero_based_indices() {
        let engine = make_engine();

        let from_range = engine.sign_range(3).await.unwrap();
        let from_items = engine.sign_items(vec![0, 1, 2]).await.unwrap();

        assert_eq!(from_range.digest, from_items.digest);
    }

    #[tokio::test]
    async fn test_sign_items_empty_input() {
        let engine = make_engine();

        let summary = engine.sign_items(vec![]).await.unwrap();

        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.signed_items, 0);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.digest, "");
        assert!((summary.average_time_per_item_ms - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_sign_items_rejects_zero_concurrency() {
        let engine = SignerEngine::new(
            StubHashService,
            DefaultSignerConfig::default().with_max_concurrent_items(0),
            NoOpProgressReporter::new(),
        );

        let result = engine.sign_items(vec![0]).await;

        assert!(matches!(
            result,
            Err(SignerError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_items_rejects_zero_buffer() {
        let engine = SignerEngine::new(
            StubHashService,
            DefaultSignerConfig::default().with_buffer_size(0),
            NoOpProgressReporter::new(),
        );

        let result = engine.sign_items(vec![0]).await;

        assert!(matches!(
            result,
            Err(SignerError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_engine_is_reusable_after_completed_run() {
        // 実行ごとにフィードとロックを作り直すため、同一エンジンで
        // 連続実行しても状態が残らない
        let engine = make_engine();

        let first = engine.sign_items(vec![0, 1]).await.unwrap();
        let second = engine.sign_items(vec![0, 1]).await.unwrap();

        assert_eq!(first.digest, second.digest);
    }

    #[tokio::test]
    async fn test_config_accessor() {
        let engine = SignerEngine::new(
            StubHashService,
            DefaultSignerConfig::default()
                .with_max_concurrent_items(4)
                .with_buffer_size(10),
            NoOpProgressReporter::new(),
        );

        assert_eq!(engine.config().max_concurrent_items(), 4);
        assert_eq!(engine.config().channel_buffer_size(), 10);
    }
}
