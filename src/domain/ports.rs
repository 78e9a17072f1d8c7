use crate::config::MapSettings;
use crate::domain::model::{ApplicationRecord, GeoPoint, GeocodeQuery, MapPlan, Variant};
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn variant(&self) -> Variant;
    fn map_settings(&self) -> &MapSettings;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, query: &GeocodeQuery) -> std::result::Result<GeoPoint, GeocodeError>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ApplicationRecord>>;
    async fn transform(&self, records: Vec<ApplicationRecord>) -> Result<MapPlan>;
    async fn load(&self, plan: &MapPlan) -> Result<String>;
}
