use anyhow::Result;

// 並列署名APIをインポート
use data_signer::{
    core::SignerConfig,
    services::{ConsoleProgressReporter, DefaultSignerConfig},
    hash_service::SimulatedHashService,
    SignerEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    println!("🚀 データ署名ツール - 並列パイプライン版");

    // 1. 署名対象のアイテム数（引数で指定、デフォルト100）
    let item_count: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(100);

    println!("📂 対象アイテム数: {item_count}");

    // 2. 署名エンジン構築
    let engine = SignerEngine::new(
        SimulatedHashService::new(), // 模擬ハッシュバックエンド
        DefaultSignerConfig::default()
            .with_max_concurrent_items(num_cpus::get() * 2) // CPU数x2の並列度
            .with_buffer_size(100) // バッファサイズ100
            .with_progress_reporting(true), // 進捗報告有効
        ConsoleProgressReporter::new(), // コンソール出力
    );

    println!("⚙️  設定:");
    println!("   - 最大並列数: {}", engine.config().max_concurrent_items());
    println!("   - バッファサイズ: {}", engine.config().channel_buffer_size());

    // 3. 並列署名実行
    match engine.sign_range(item_count).await {
        Ok(summary) => {
            println!("\n✅ 署名完了!");
            println!("📊 処理結果:");
            println!("   - 対象アイテム数: {}", summary.total_items);
            println!("   - 署名成功数: {}", summary.signed_items);
            println!("   - エラー数: {}", summary.error_count);
            println!(
                "   - 総処理時間: {:.2}秒",
                summary.total_processing_time_ms as f64 / 1000.0
            );
            println!(
                "   - 平均処理時間: {:.2}ms/アイテム",
                summary.average_time_per_item_ms
            );

            if summary.error_count > 0 {
                println!(
                    "⚠️  {}個のアイテムでエラーが発生しました",
                    summary.error_count
                );
            }

            println!("🔏 最終ダイジェスト: {}", summary.digest);
        }
        Err(error) => {
            eprintln!("❌ エラー: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}
