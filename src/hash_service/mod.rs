use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

pub mod simulated;

pub use simulated::SimulatedHashService;

/// 外部ハッシュサービスのトレイト
///
/// どちらの操作も入力に対して決定的な純粋関数だが、呼び出しは
/// 一定時間ブロックする（外部サービスの遅延を想定）。
///
/// 並行性の契約:
/// - `fast_hash`は同時呼び出し数に制限なし
/// - `slow_hash`はプロセス全体で同時に1呼び出しまで。呼び出し側が
///   排他を保証すること（パイプラインではGlobalSlowHashLockが担う）
#[automock]
#[async_trait]
pub trait HashService: Send + Sync {
    /// 高速ハッシュを計算（同時実行制限なし）
    async fn fast_hash(&self, input: &str) -> Result<String>;

    /// 低速ハッシュを計算（プロセス全体で同時1呼び出しまで）
    async fn slow_hash(&self, input: &str) -> Result<String>;
}

// HashService for Box<dyn HashService>
#[async_trait]
impl HashService for Box<dyn HashService> {
    async fn fast_hash(&self, input: &str) -> Result<String> {
        self.as_ref().fast_hash(input).await
    }

    async fn slow_hash(&self, input: &str) -> Result<String> {
        self.as_ref().slow_hash(input).await
    }
}

// HashService for Arc<T> - 共有バックエンドをそのまま注入できるようにする
#[async_trait]
impl<T: HashService + ?Sized> HashService for std::sync::Arc<T> {
    async fn fast_hash(&self, input: &str) -> Result<String> {
        self.as_ref().fast_hash(input).await
    }

    async fn slow_hash(&self, input: &str) -> Result<String> {
        self.as_ref().slow_hash(input).await
    }
}
