// シミュレーションバックエンド - 外部ハッシュサービスの遅延と契約を再現

use super::HashService;
use anyhow::Result;
use async_trait::async_trait;
use md5::{Digest, Md5};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;

/// デフォルトの高速ハッシュ遅延
const DEFAULT_FAST_LATENCY: Duration = Duration::from_millis(100);

/// デフォルトの低速ハッシュ遅延
const DEFAULT_SLOW_LATENCY: Duration = Duration::from_millis(10);

/// 外部ハッシュサービスのシミュレーション実装
///
/// `fast_hash`は入力のCRC32チェックサムを10進文字列として返す。
/// `slow_hash`は入力のMD5ダイジェストを16進文字列として返す。
/// どちらも決定的だが、設定された遅延だけ呼び出しをブロックする。
///
/// `slow_hash`は同時呼び出しを検出するとエラーを返す。
/// パイプライン側の排他制御（GlobalSlowHashLock）が正しく機能して
/// いれば決して発生しない。
pub struct SimulatedHashService {
    fast_latency: Duration,
    slow_latency: Duration,
    slow_in_flight: AtomicBool,
}

impl SimulatedHashService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 遅延を指定して作成（テスト・ベンチマーク用）
    pub fn with_latencies(fast_latency: Duration, slow_latency: Duration) -> Self {
        Self {
            fast_latency,
            slow_latency,
            slow_in_flight: AtomicBool::new(false),
        }
    }

    /// 遅延なしで作成（テスト用）
    pub fn instant() -> Self {
        Self::with_latencies(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for SimulatedHashService {
    fn default() -> Self {
        Self::with_latencies(DEFAULT_FAST_LATENCY, DEFAULT_SLOW_LATENCY)
    }
}

#[async_trait]
impl HashService for SimulatedHashService {
    async fn fast_hash(&self, input: &str) -> Result<String> {
        if !self.fast_latency.is_zero() {
            sleep(self.fast_latency).await;
        }
        Ok(crc32fast::hash(input.as_bytes()).to_string())
    }

    async fn slow_hash(&self, input: &str) -> Result<String> {
        // 同時呼び出しの検出 - 容量1の契約違反はエラーとして表面化させる
        if self.slow_in_flight.swap(true, Ordering::SeqCst) {
            return Err(anyhow::anyhow!(
                "slow_hashが同時に呼び出されました（容量1の契約違反）"
            ));
        }

        if !self.slow_latency.is_zero() {
            sleep(self.slow_latency).await;
        }
        let digest = Md5::digest(input.as_bytes());
        let result = hex::encode(digest);

        self.slow_in_flight.store(false, Ordering::SeqCst);
        Ok(result)
    }
}
