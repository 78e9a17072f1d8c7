pub mod classifier;
pub mod etl;
pub mod map_builder;
pub mod pipeline;

pub use crate::domain::model::{ApplicationRecord, MapPlan};
pub use crate::domain::ports::{ConfigProvider, Geocoder, Pipeline, Storage};
pub use crate::utils::error::Result;
