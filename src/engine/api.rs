// 高レベル公開API
// SignerEngineを簡単に使用できるようにするための便利な関数

use super::SignerEngine;
use crate::{
    core::{error::SignerResult, SignSummary, SignerConfig, ProgressReporter},
    hash_service::HashService,
    services::{ConsoleProgressReporter, DefaultSignerConfig, NoOpProgressReporter},
};

// ========================================
// DI対応API - SignerEngineベース
// ========================================

/// 設定済みSignerEngineで整数列を署名（DI推奨）
///
/// 全ての依存関係が事前注入されたエンジンを使用する真のDI API
pub async fn sign_range_with_engine<H, C, R>(
    count: u64,
    engine: &SignerEngine<H, C, R>,
) -> SignerResult<SignSummary>
where
    H: HashService + 'static,
    C: SignerConfig,
    R: ProgressReporter + 'static,
{
    engine.sign_range(count).await
}

/// SignerEngine作成のヘルパー関数
///
/// デフォルト設定での簡単なエンジン作成
pub fn create_default_signer_engine<H>(
    hash_service: H,
) -> SignerEngine<H, DefaultSignerConfig, ConsoleProgressReporter>
where
    H: HashService + 'static,
{
    SignerEngine::new(
        hash_service,
        DefaultSignerConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// SignerEngine作成のヘルパー関数（静音版）
///
/// テストやバックグラウンド処理用の静音エンジン作成
pub fn create_quiet_signer_engine<H>(
    hash_service: H,
) -> SignerEngine<H, DefaultSignerConfig, NoOpProgressReporter>
where
    H: HashService + 'static,
{
    SignerEngine::new(
        hash_service,
        DefaultSignerConfig::default(),
        NoOpProgressReporter::new(),
    )
}
