// WideDigest - アイテムごとの6系統ファンアウトステージ

use crate::core::{Job, PipelineStage, SignerError, SignerResult};
use crate::hash_service::HashService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// ファンアウト幅（アイテムごとの並行サブ計算数）
pub const FANOUT_WIDTH: usize = 6;

/// アイテムごとに6系統の`fast_hash(index + item)`を並行計算し、
/// インデックス順に連結するステージ
///
/// 連結は位置順であり到着順ではない。サブ計算の完了順がどうであれ、
/// 結果は常に`0‖1‖2‖3‖4‖5`の順で並ぶ。`slow_hash`を使わないため
/// グローバルロックは不要。
pub struct WideDigestStage<H> {
    hash_service: Arc<H>,
    item_limit: Arc<Semaphore>,
}

impl<H> WideDigestStage<H>
where
    H: HashService + 'static,
{
    pub fn new(hash_service: Arc<H>, item_limit: Arc<Semaphore>) -> Self {
        Self {
            hash_service,
            item_limit,
        }
    }
}

#[async_trait]
impl<H> PipelineStage for WideDigestStage<H>
where
    H: HashService + 'static,
{
    fn name(&self) -> &'static str {
        "wide_digest"
    }

    async fn run(
        &self,
        mut input: mpsc::Receiver<Job>,
        output: mpsc::Sender<Job>,
    ) -> SignerResult<()> {
        let mut workers = Vec::new();

        while let Some(job) = input.recv().await {
            let data = match job {
                // 失敗アイテムは変換せずそのまま下流へ
                failed @ Job::Failed { .. } => {
                    if output.send(failed).await.is_err() {
                        break;
                    }
                    continue;
                }
                job => match job.into_data() {
                    Some(data) => data,
                    None => continue,
                },
            };

            let hash_service = Arc::clone(&self.hash_service);
            let item_limit = Arc::clone(&self.item_limit);
            let output = output.clone();

            workers.push(tokio::spawn(async move {
                let _admission = match item_limit.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                let job = compute_wide(hash_service, data).await;
                let _ = output.send(job).await;
            }));
        }

        // 全アイテムの完了を待ってから出力フィードを閉じる
        for worker in workers {
            worker.await.map_err(SignerError::task)?;
        }
        Ok(())
    }
}

/// 1アイテム分の6系統ダイジェストを計算
async fn compute_wide<H>(hash_service: Arc<H>, data: String) -> Job
where
    H: HashService + 'static,
{
    let mut parts = Vec::with_capacity(FANOUT_WIDTH);
    for index in 0..FANOUT_WIDTH {
        let hash_service = Arc::clone(&hash_service);
        let data = data.clone();
        parts.push(tokio::spawn(async move {
            hash_service.fast_hash(&format!("{index}{data}")).await
        }));
    }

    // 固定幅バッファ相当: JoinHandleのベクタをインデックス順に回収する
    let mut combined = String::new();
    for part in parts {
        match part.await {
            Ok(Ok(digest)) => combined.push_str(&digest),
            Ok(Err(error)) => {
                return Job::Failed {
                    item: data.clone(),
                    error: error.to_string(),
                }
            }
            Err(error) => {
                return Job::Failed {
                    item: data.clone(),
                    error: error.to_string(),
                }
            }
        }
    }
    Job::Digest(combined)
}
