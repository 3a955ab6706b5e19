// Input - 署名対象インデックスの配信ステージ

use crate::core::{Job, PipelineStage, SignerResult};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Producer: 署名対象のインデックス列を最初のフィードへ配信
pub struct InputStage {
    items: Vec<u64>,
}

impl InputStage {
    pub fn new(items: Vec<u64>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl PipelineStage for InputStage {
    fn name(&self) -> &'static str {
        "input"
    }

    async fn run(
        &self,
        _input: mpsc::Receiver<Job>,
        output: mpsc::Sender<Job>,
    ) -> SignerResult<()> {
        for &item in &self.items {
            if output.send(Job::Index(item)).await.is_err() {
                // 下流が閉じられた場合は正常終了
                break;
            }
        }
        Ok(())
    }
}
