// Availability service: fetch from the airline, normalize, deliver
use thiserror::Error;
use tracing::{info, instrument};

use crate::error::AvailabilityError;
use crate::parser::AvailabilityParser;
use crate::response::AvailabilityResponse;
use crate::upstream::{AvailabilityQuery, AvailabilitySource, UpstreamError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Upstream document is not UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

pub struct FlightAvailabilityService<S: AvailabilitySource> {
    source: S,
    parser: AvailabilityParser,
}

impl<S: AvailabilitySource> FlightAvailabilityService<S> {
    pub fn new(source: S, parser: AvailabilityParser) -> Self {
        Self { source, parser }
    }

    pub fn parser(&self) -> &AvailabilityParser {
        &self.parser
    }

    #[instrument(skip(self), fields(route = %query.route()))]
    pub async fn availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResponse, ServiceError> {
        let body = self.source.fetch(query).await?;
        let xml = std::str::from_utf8(&body)?;
        let response = self.parser.process(xml)?;

        info!(flights = response.len(), "availability normalized");
        Ok(response)
    }

    pub async fn availability_json(&self, query: &AvailabilityQuery) -> Result<String, ServiceError> {
        let response = self.availability(query).await?;
        Ok(self.parser.to_json(&response)?)
    }
}
