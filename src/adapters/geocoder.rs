use crate::config::GeocoderSettings;
use crate::domain::model::{GeoPoint, GeocodeQuery};
use crate::domain::ports::Geocoder;
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        // The public Nominatim instance rejects requests without a User-Agent.
        let client = Client::builder().user_agent(&settings.user_agent).build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    async fn search(
        &self,
        params: &[(&str, &str)],
    ) -> std::result::Result<Vec<Value>, GeocodeError> {
        tracing::debug!("Geocoding request to {} with {:?}", self.endpoint, params);

        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("Geocoder returned status {}", status);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if body.is_empty() {
            return Err(GeocodeError::EmptyBody);
        }

        if !content_type.contains("application/json") {
            tracing::debug!("Response content: {}", String::from_utf8_lossy(&body));
            return Err(GeocodeError::NotJson(content_type));
        }

        serde_json::from_slice(&body).map_err(|e| GeocodeError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, query: &GeocodeQuery) -> std::result::Result<GeoPoint, GeocodeError> {
        match query {
            GeocodeQuery::Freeform(address) => {
                first_point(&self.search(&[("q", address.as_str())]).await?)
            }
            GeocodeQuery::Structured {
                venue,
                city,
                state,
                country,
            } => {
                if let Some(venue) = venue {
                    let qualified = format!("{}, {}, {}, {}", venue, city, state, country);
                    let hits = self.search(&[("q", qualified.as_str())]).await?;
                    if !hits.is_empty() {
                        return first_point(&hits);
                    }
                    tracing::debug!("No match for {:?}, retrying without venue", qualified);
                }

                let hits = self
                    .search(&[
                        ("city", city.as_str()),
                        ("state", state.as_str()),
                        ("country", country.as_str()),
                    ])
                    .await?;
                first_point(&hits)
            }
        }
    }
}

fn first_point(hits: &[Value]) -> std::result::Result<GeoPoint, GeocodeError> {
    let hit = hits.first().ok_or(GeocodeError::NoResults)?;
    Ok(GeoPoint::new(coordinate(hit, "lat")?, coordinate(hit, "lon")?))
}

/// Nominatim encodes coordinates as strings; plain numbers are accepted too.
fn coordinate(hit: &Value, field: &str) -> std::result::Result<f64, GeocodeError> {
    let value = hit
        .get(field)
        .ok_or_else(|| GeocodeError::Malformed(format!("result has no {:?} field", field)))?;

    let parsed = match value {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    };

    // "NaN" and "inf" parse as f64 but cannot be placed on the map.
    parsed
        .filter(|number| number.is_finite())
        .ok_or_else(|| GeocodeError::Malformed(format!("invalid {}: {}", field, value)))
}
