// 設定管理の具象実装

use crate::core::SignerConfig;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultSignerConfig {
    max_concurrent_items: usize,
    buffer_size: usize,
    enable_progress: bool,
}

impl DefaultSignerConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            max_concurrent_items: cpu_count.max(1) * 2,
            buffer_size: 100,
            enable_progress: true,
        }
    }

    pub fn with_max_concurrent_items(mut self, max_concurrent_items: usize) -> Self {
        self.max_concurrent_items = max_concurrent_items;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultSignerConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl SignerConfig for DefaultSignerConfig {
    fn max_concurrent_items(&self) -> usize {
        self.max_concurrent_items
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
