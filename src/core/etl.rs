use crate::core::{ExportSummary, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行 extract → transform → load；任何階段失敗都直接回傳，不寫出任何檔案
    pub async fn run(&self) -> Result<ExportSummary> {
        tracing::info!("🚀 Starting price export");
        self.monitor.log_stats("Start");

        // Extract
        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} listing(s) from {} page(s)",
            extracted.fragments.len(),
            extracted.pages_visited
        );
        self.monitor.log_stats("Extract");

        // Transform
        let transformed = self.pipeline.transform(extracted.fragments).await?;
        tracing::info!("🔄 Parsed {} price row(s)", transformed.rows.len());
        if transformed.skipped > 0 {
            tracing::warn!("⚠️ Skipped {} malformed listing(s)", transformed.skipped);
        }
        self.monitor.log_stats("Transform");

        // Load
        let destination = self.pipeline.load(&transformed).await?;
        tracing::info!("💾 Wrote {} row(s) to {}", transformed.rows.len(), destination);
        self.monitor.log_final_stats();

        Ok(ExportSummary {
            destination,
            pages_visited: extracted.pages_visited,
            rows_written: transformed.rows.len(),
            rows_skipped: transformed.skipped,
        })
    }
}
