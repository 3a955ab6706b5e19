// Combine - 全アイテム結果のファンイン・集約ステージ

use crate::core::{Job, PipelineStage, ProgressReporter, SignerError, SignerResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 上流の全結果を収集し、ソートして`_`で結合する終端ステージ
///
/// 内部並行性を持たない純粋なファンインコレクター。ソートが
/// 上流の非決定的な完了順を吸収し、最終出力を再現可能にする。
/// 失敗アイテムはレポーターへ報告し、カウンターに集計する。
/// 入力が空の場合は空文字列を出力する。
pub struct CombineStage<R> {
    reporter: Arc<R>,
    signed_count: Arc<AtomicUsize>,
    error_count: Arc<AtomicUsize>,
    total_items: usize,
}

impl<R> CombineStage<R>
where
    R: ProgressReporter + 'static,
{
    pub fn new(
        reporter: Arc<R>,
        signed_count: Arc<AtomicUsize>,
        error_count: Arc<AtomicUsize>,
        total_items: usize,
    ) -> Self {
        Self {
            reporter,
            signed_count,
            error_count,
            total_items,
        }
    }
}

#[async_trait]
impl<R> PipelineStage for CombineStage<R>
where
    R: ProgressReporter + 'static,
{
    fn name(&self) -> &'static str {
        "combine"
    }

    async fn run(
        &self,
        mut input: mpsc::Receiver<Job>,
        output: mpsc::Sender<Job>,
    ) -> SignerResult<()> {
        let mut digests = Vec::new();
        let mut errors = 0usize;

        while let Some(job) = input.recv().await {
            match job {
                Job::Failed { item, error } => {
                    self.reporter.report_item_error(&item, &error).await;
                    errors += 1;
                }
                job => {
                    if let Some(data) = job.into_data() {
                        digests.push(data);
                    }
                }
            }

            self.reporter
                .report_progress(digests.len() + errors, self.total_items)
                .await;
        }

        // 辞書順ソートで上流の完了順に依存しない決定的な出力にする
        digests.sort();
        let combined = digests.join("_");

        self.signed_count.store(digests.len(), Ordering::SeqCst);
        self.error_count.store(errors, Ordering::SeqCst);

        if output.send(Job::Digest(combined)).await.is_err() {
            return Err(SignerError::channel(
                "終端フィードの受信側が先に閉じられました",
            ));
        }
        Ok(())
    }
}
