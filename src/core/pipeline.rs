use crate::adapters::html::render_map;
use crate::adapters::input::{parse_records, InputFormat, COL_LOCATION, COL_STATUS};
use crate::core::classifier::classify;
use crate::core::map_builder::{LocationTally, MarkerGroupBuilder};
use crate::core::{ConfigProvider, Geocoder, Pipeline, Storage};
use crate::domain::model::{
    ApplicationRecord, GeoPoint, GeocodeQuery, MapPlan, RowOutcome, SkipReason, SkippedRow, Variant,
};
use crate::utils::error::Result;

pub struct JobMapPipeline<S: Storage, C: ConfigProvider, G: Geocoder> {
    storage: S,
    config: C,
    geocoder: G,
}

impl<S: Storage, C: ConfigProvider, G: Geocoder> JobMapPipeline<S, C, G> {
    pub fn new(storage: S, config: C, geocoder: G) -> Self {
        Self {
            storage,
            config,
            geocoder,
        }
    }

    /// Geocodes and classifies one row, appending it to `builder` on success.
    pub async fn plot_row(
        &self,
        record: &ApplicationRecord,
        tally: &LocationTally,
        builder: &mut MarkerGroupBuilder,
    ) -> RowOutcome {
        match self.locate_row(record).await {
            Ok(point) => {
                let variant = self.config.variant();
                let color = classify(&record.status, variant.match_mode());
                let radius = match variant {
                    Variant::Freeform => self.config.map_settings().marker_radius,
                    Variant::Structured => tally.occurrences(&record.location),
                };
                builder.add(point, record, color, radius);
                RowOutcome::Plotted(point)
            }
            Err(reason) => RowOutcome::Skipped(reason),
        }
    }

    async fn locate_row(
        &self,
        record: &ApplicationRecord,
    ) -> std::result::Result<GeoPoint, SkipReason> {
        if record.status.is_empty() {
            return Err(SkipReason::MissingField(COL_STATUS));
        }
        let query = build_query(
            record,
            self.config.variant(),
            &self.config.map_settings().geocoder.country,
        )?;
        Ok(self.geocoder.locate(&query).await?)
    }
}

/// Builds the geocoder query for a row according to the variant.
pub fn build_query(
    record: &ApplicationRecord,
    variant: Variant,
    country: &str,
) -> std::result::Result<GeocodeQuery, SkipReason> {
    let location = record.location.trim();
    if location.is_empty() {
        return Err(SkipReason::MissingField(COL_LOCATION));
    }

    match variant {
        Variant::Freeform => Ok(GeocodeQuery::Freeform(location.to_string())),
        Variant::Structured => {
            let mut parts = location.split(',').map(str::trim).filter(|p| !p.is_empty());
            let (Some(city), Some(state)) = (parts.next(), parts.next()) else {
                return Err(SkipReason::MalformedLocation(location.to_string()));
            };
            let venue = Some(record.company.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string);

            Ok(GeocodeQuery::Structured {
                venue,
                city: city.to_string(),
                state: state.to_string(),
                country: country.to_string(),
            })
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: Geocoder> Pipeline for JobMapPipeline<S, C, G> {
    async fn extract(&self) -> Result<Vec<ApplicationRecord>> {
        let path = self.config.input_path();
        let format = InputFormat::from_path(path)?;

        tracing::debug!("Reading {:?} input from {}", format, path);
        let data = self.storage.read_file(path).await?;

        parse_records(&data, format)
    }

    async fn transform(&self, records: Vec<ApplicationRecord>) -> Result<MapPlan> {
        let total_rows = records.len();
        let tally = LocationTally::from_records(&records);
        let mut builder = MarkerGroupBuilder::new(self.config.variant().shows_pending_list());
        let mut skipped = Vec::new();

        for (i, record) in records.iter().enumerate() {
            tracing::info!(
                "Processing ({}/{}): {}, {}, {}",
                i + 1,
                total_rows,
                record.title,
                record.company,
                record.location
            );

            match self.plot_row(record, &tally, &mut builder).await {
                RowOutcome::Plotted(point) => {
                    tracing::debug!("Row {} plotted at ({}, {})", record.row, point.lat, point.lon);
                }
                RowOutcome::Skipped(reason) => {
                    tracing::warn!(
                        "Skipping row {} ({} - {}, {:?}): {}",
                        record.row,
                        record.company,
                        record.title,
                        record.location,
                        reason
                    );
                    skipped.push(SkippedRow {
                        row: record.row,
                        company: record.company.clone(),
                        title: record.title.clone(),
                        location: record.location.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::debug!("Built {} marker groups", builder.len());
        let (groups, pending) = builder.finish();

        Ok(MapPlan {
            groups,
            pending,
            skipped,
            total_rows,
        })
    }

    async fn load(&self, plan: &MapPlan) -> Result<String> {
        let html = render_map(
            plan,
            self.config.map_settings(),
            self.config.variant().shows_pending_list(),
        )?;

        let output_path = self.config.output_path();
        tracing::debug!("Writing map ({} bytes) to storage", html.len());
        self.storage.write_file(output_path, html.as_bytes()).await?;

        tracing::info!("Map saved as {}", output_path);
        Ok(output_path.to_string())
    }
}
