// data_signer - 並列署名パイプラインライブラリ
//
// レイヤー構成:
// - core: トレイト、型、エラーの基盤定義
// - hash_service: 外部ハッシュサービスの抽象化と模擬実装
// - services: 設定・監視の具象実装
// - engine: パイプラインとオーケストレーション

pub mod core;
pub mod engine;
pub mod hash_service;
pub mod services;

// 公開API - 利用側が最もよく使う型と関数を再エクスポート
pub use crate::core::{Job, SignSummary, SignerError, SignerResult};
pub use crate::engine::{
    create_default_signer_engine, create_quiet_signer_engine, sign_range_with_engine, SignerEngine,
};
pub use crate::hash_service::{HashService, SimulatedHashService};
pub use crate::services::{ConsoleProgressReporter, DefaultSignerConfig, NoOpProgressReporter};
