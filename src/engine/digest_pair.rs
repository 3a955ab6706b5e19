// DigestPair - アイテムごとの2系統ファンアウトステージ

use crate::core::{Job, PipelineStage, SignerError, SignerResult};
use crate::hash_service::HashService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// アイテムごとにダイジェストペア`"{fast}~{slowFast}"`を計算するステージ
///
/// 前半は`fast_hash(item)`、後半は`slow_hash(item)`の結果への
/// `fast_hash`。両者は同一アイテム内で並行実行されるが、`slow_hash`
/// だけは全アイテム横断でGlobalSlowHashLock（容量1のセマフォ）により
/// 直列化される。これがパイプライン全体の決定的な調整制約であり、
/// ロックはコンストラクタで注入して依存を可視化する。
pub struct DigestPairStage<H> {
    hash_service: Arc<H>,
    slow_hash_lock: Arc<Semaphore>,
    item_limit: Arc<Semaphore>,
}

impl<H> DigestPairStage<H>
where
    H: HashService + 'static,
{
    pub fn new(
        hash_service: Arc<H>,
        slow_hash_lock: Arc<Semaphore>,
        item_limit: Arc<Semaphore>,
    ) -> Self {
        Self {
            hash_service,
            slow_hash_lock,
            item_limit,
        }
    }
}

#[async_trait]
impl<H> PipelineStage for DigestPairStage<H>
where
    H: HashService + 'static,
{
    fn name(&self) -> &'static str {
        "digest_pair"
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
            let slow_hash_lock = Arc::clone(&self.slow_hash_lock);
            let item_limit = Arc::clone(&self.item_limit);
            let output = output.clone();

            // アイテムごとに独立したワーカーを起動
            workers.push(tokio::spawn(async move {
                let _admission = match item_limit.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return, // セマフォが閉じられた場合は終了
                };

                let job = compute_pair(hash_service, slow_hash_lock, data).await;

                // 下流が先に閉じられた場合は結果を捨てる
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

/// 1アイテム分のダイジェストペアを計算
async fn compute_pair<H>(
    hash_service: Arc<H>,
    slow_hash_lock: Arc<Semaphore>,
    data: String,
) -> Job
where
    H: HashService + 'static,
{
    // 前半: fast_hash(data) - 同時実行制限なし
    let fast_half = {
        let hash_service = Arc::clone(&hash_service);
        let data = data.clone();
        tokio::spawn(async move { hash_service.fast_hash(&data).await })
    };

    // 後半: 排他ロック下でslow_hash、その結果をfast_hash
    let slow_fast_half = {
        let data = data.clone();
        tokio::spawn(async move {
            let slow = {
                let _permit = slow_hash_lock
                    .acquire()
                    .await
                    .map_err(|e| anyhow::anyhow!("GlobalSlowHashLockエラー: {e}"))?;
                hash_service.slow_hash(&data).await?
            }; // slow_hash完了と同時にロックを解放
            hash_service.fast_hash(&slow).await
        })
    };

    // 連結順は到着順ではなく固定（fast~slowFast）
    let fast = flatten(fast_half.await);
    let slow_fast = flatten(slow_fast_half.await);

    match (fast, slow_fast) {
        (Ok(fast), Ok(slow_fast)) => Job::Digest(format!("{fast}~{slow_fast}")),
        (Err(error), _) | (_, Err(error)) => Job::Failed { item: data, error },
    }
}

/// JoinHandleの結果をアイテム単位のエラー文字列に平坦化
fn flatten(joined: Result<anyhow::Result<String>, tokio::task::JoinError>) -> Result<String, String> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.to_string()),
        Err(error) => Err(error.to_string()),
    }
}
