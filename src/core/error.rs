// Custom error types for the signing pipeline
// 並列署名パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// 署名パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("チャンネルエラー: {message}")]
    ChannelError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("ハッシュ計算エラー: {item} - {source}")]
    HashError {
        item: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("パイプライン実行エラー: {message}")]
    PipelineExecutionError { message: String },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl SignerError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::ChannelError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// ハッシュ計算エラーの作成
    pub fn hash(item: impl Into<String>, source: anyhow::Error) -> Self {
        Self::HashError {
            item: item.into(),
            source,
        }
    }

    /// パイプライン実行エラーの作成
    pub fn pipeline_execution(message: impl Into<String>) -> Self {
        Self::PipelineExecutionError {
            message: message.into(),
        }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 設定エラーは実行前に修正が必要。ハッシュ計算エラーは
    /// アイテム単位で隔離されるため、実行全体としては回復可能。
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigurationError { .. } => false,
            Self::InternalError { .. } => false,
            Self::ChannelError { .. } => true,
            Self::TaskError { .. } => true,
            Self::HashError { .. } => true,
            Self::PipelineExecutionError { .. } => true,
        }
    }
}

/// 署名パイプラインの結果型
pub type SignerResult<T> = std::result::Result<T, SignerError>;

// From実装を個別に追加
impl From<anyhow::Error> for SignerError {
    fn from(error: anyhow::Error) -> Self {
        SignerError::InternalError { source: error }
    }
}

impl From<tokio::task::JoinError> for SignerError {
    fn from(error: tokio::task::JoinError) -> Self {
        SignerError::TaskError { source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_signer_error_creation() {
        let config_error = SignerError::configuration("バッファサイズは1以上である必要があります");
        assert!(config_error.to_string().contains("設定エラー"));

        let channel_error = SignerError::channel("チャンネルが閉じられました");
        assert!(channel_error.to_string().contains("チャンネルエラー"));

        let pipeline_error = SignerError::pipeline_execution("ステージが失敗しました");
        assert!(pipeline_error.to_string().contains("パイプライン実行エラー"));

        let internal_error = SignerError::internal(anyhow::anyhow!("予期しないエラー"));
        assert!(internal_error.to_string().contains("内部エラー"));
    }

    #[test]
    fn test_hash_error_contains_item() {
        let error = SignerError::hash("42", anyhow::anyhow!("サービス呼び出し失敗"));

        assert!(error.to_string().contains("ハッシュ計算エラー"));
        assert!(error.to_string().contains("42"));
        assert!(error.to_string().contains("サービス呼び出し失敗"));
    }

    #[test]
    fn test_error_source_chain() {
        let source_error = anyhow::anyhow!("ルートエラー");
        let signer_error = SignerError::internal(source_error);

        // エラーチェーンが正しく設定されていることを確認
        assert!(signer_error.source().is_some());
    }

    #[tokio::test]
    async fn test_task_error() {
        // タスクをキャンセルしてJoinErrorを発生させる
        let task = tokio::spawn(async {
            tokio::task::yield_now().await;
            std::future::pending::<()>().await;
        });
        task.abort();

        let join_result = task.await;
        assert!(join_result.is_err(), "タスクは失敗するべきです");
        let join_error = join_result.expect_err("タスクエラーが期待されます");
        let signer_error = SignerError::task(join_error);

        assert!(signer_error.to_string().contains("タスクエラー"));
    }

    #[test]
    fn test_error_recoverability() {
        let config_error = SignerError::configuration("無効な設定です");
        assert!(!config_error.is_recoverable());

        let internal_error = SignerError::internal(anyhow::anyhow!("内部不整合"));
        assert!(!internal_error.is_recoverable());

        let hash_error = SignerError::hash("3", anyhow::anyhow!("一時的な失敗"));
        assert!(hash_error.is_recoverable());

        let channel_error = SignerError::channel("受信側が先に終了");
        assert!(channel_error.is_recoverable());
    }

    #[test]
    fn test_from_anyhow_error() {
        let error: SignerError = anyhow::anyhow!("変換テスト").into();
        assert!(matches!(error, SignerError::InternalError { .. }));
    }
}
