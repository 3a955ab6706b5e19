// Pipeline Runner - ステージ列の配線と並行実行

use crate::core::{Job, PipelineStage, SignerError, SignerResult};
use tokio::sync::mpsc;

/// ステージ列をフィードで直列に接続し、全ステージを並行実行する
///
/// ステージiの出力フィードがステージi+1の入力フィードになる。
/// 先頭ステージには閉じた空の入力フィードが渡される（先頭は生成専用）。
/// 終端フィードの内容を排出して返し、全ステージの完了結果を
/// JoinHandle経由で明示的に回収する。フィードの閉鎖だけに依存しない
/// 完了判定のため、ステージ内のパニックも停止ではなくエラーとして
/// 表面化する。
pub async fn run_pipeline(
    stages: Vec<Box<dyn PipelineStage>>,
    channel_buffer_size: usize,
) -> SignerResult<Vec<Job>> {
    if stages.is_empty() {
        return Err(SignerError::configuration(
            "ステージが1つも指定されていません",
        ));
    }
    if channel_buffer_size == 0 {
        return Err(SignerError::configuration(
            "チャンネルバッファサイズは1以上である必要があります",
        ));
    }

    // 先頭ステージ用の空入力フィード（送信側を即ドロップして閉じる）
    let (head_tx, head_rx) = mpsc::channel(1);
    drop(head_tx);

    let mut handles = Vec::with_capacity(stages.len());
    let mut upstream_rx = head_rx;

    for stage in stages {
        let (out_tx, out_rx) = mpsc::channel(channel_buffer_size);
        let input_rx = std::mem::replace(&mut upstream_rx, out_rx);
        handles.push(tokio::spawn(
            async move { stage.run(input_rx, out_tx).await },
        ));
    }

    // 終端フィードの排出はステージ結合より先に行う
    // （バッファ満杯時に互いを待ち合うのを防ぐ）
    let mut terminal_rx = upstream_rx;
    let mut outputs = Vec::new();
    while let Some(job) = terminal_rx.recv().await {
        outputs.push(job);
    }

    // 各ステージの完了結果を明示的に回収
    for handle in handles {
        handle.await.map_err(SignerError::task)??;
    }

    Ok(outputs)
}
