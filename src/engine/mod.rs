// エンジン層 - 並列パイプラインとオーケストレーション
// サービス層とハッシュサービスを組み合わせて高レベルな処理を提供

pub mod api;
pub mod combine;
pub mod digest_pair;
pub mod input;
pub mod pipeline;
pub mod signer_engine;
pub mod wide_digest;

// 公開API - 主要エンジンクラス
pub use api::{create_default_signer_engine, create_quiet_signer_engine, sign_range_with_engine};
pub use combine::CombineStage;
pub use digest_pair::DigestPairStage;
pub use input::InputStage;
pub use pipeline::run_pipeline;
pub use signer_engine::SignerEngine;
pub use wide_digest::{WideDigestStage, FANOUT_WIDTH};
