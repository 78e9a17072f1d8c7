use crate::core::Pipeline;
use crate::domain::model::SkippedRow;
use crate::utils::error::Result;

/// Outcome of one full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub total_rows: usize,
    pub plotted_rows: usize,
    pub markers: usize,
    pub skipped: Vec<SkippedRow>,
}

pub struct MapEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Reading job applications...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Read {} rows", records.len());

        let plan = self.pipeline.transform(records).await?;
        tracing::info!(
            "Plotted {} of {} rows as {} markers",
            plan.plotted_rows(),
            plan.total_rows,
            plan.groups.len()
        );
        if !plan.skipped.is_empty() {
            tracing::warn!("Skipped {} rows", plan.skipped.len());
        }

        let output_path = self.pipeline.load(&plan).await?;

        Ok(RunReport {
            output_path,
            total_rows: plan.total_rows,
            plotted_rows: plan.plotted_rows(),
            markers: plan.groups.len(),
            skipped: plan.skipped,
        })
    }
}
