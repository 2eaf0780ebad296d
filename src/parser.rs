// Availability parser: turns the airline's flights into presentation-ready records
use rayon::prelude::*;
use tracing::{debug, error};

use crate::error::{AvailabilityError, TransformError};
use crate::fares::decompose_fares;
use crate::response::{AvailabilityResponse, FlightRecord};
use crate::supplier::{RawFlight, XmlAvailability};
use crate::timestamp::{display_time, flight_duration, require_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub execution: ExecutionMode,
    // Batches smaller than this are transformed on the calling thread even in parallel mode
    pub parallel_threshold: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::Sequential,
            parallel_threshold: 64,
        }
    }
}

impl ParserConfig {
    pub fn parallel() -> Self {
        Self {
            execution: ExecutionMode::Parallel,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityParser {
    config: ParserConfig,
}

impl AvailabilityParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decodes an upstream XML document and normalizes every flight in it.
    pub fn process(&self, xml: &str) -> Result<AvailabilityResponse, AvailabilityError> {
        let flights = XmlAvailability::from_xml(xml)?.into_raw_flights()?;
        self.parse_availability(&flights)
    }

    /// Normalizes a batch of flights, all or nothing, keeping input order.
    pub fn parse_availability(
        &self,
        flights: &[RawFlight],
    ) -> Result<AvailabilityResponse, AvailabilityError> {
        let parallel = self.config.execution == ExecutionMode::Parallel
            && flights.len() >= self.config.parallel_threshold;
        debug!(flights = flights.len(), parallel, "normalizing availability");

        let transform = |(index, flight): (usize, &RawFlight)| {
            build_flight_record(flight).map_err(|e| AvailabilityError::flight(index, e))
        };

        // rayon's indexed collect keeps source order regardless of completion order
        let records = if parallel {
            flights
                .par_iter()
                .enumerate()
                .map(transform)
                .collect::<Result<Vec<_>, _>>()
        } else {
            flights
                .iter()
                .enumerate()
                .map(transform)
                .collect::<Result<Vec<_>, _>>()
        };

        match records {
            Ok(records) => Ok(AvailabilityResponse::new(records)),
            Err(e) => {
                error!(error = %e, "availability batch rejected");
                Err(e)
            }
        }
    }

    pub fn to_json(&self, response: &AvailabilityResponse) -> Result<String, AvailabilityError> {
        serde_json::to_string(response)
            .map_err(|e| AvailabilityError::JsonSerializeError(e.to_string()))
    }
}

pub fn build_flight_record(flight: &RawFlight) -> Result<FlightRecord, TransformError> {
    let departure = require_timestamp(flight.departure.as_ref(), "departure")?;
    let arrival = require_timestamp(flight.arrival.as_ref(), "arrival")?;

    Ok(FlightRecord {
        operator: flight.carrier_code.clone(),
        flight_number: flight.flight_designator.clone(),
        departs_from: flight.origin_airport.clone(),
        arrives_at: flight.destination_airport.clone(),
        departs_on: display_time(departure),
        arrives_on: display_time(arrival),
        flight_time: flight_duration(departure, arrival),
        fare_prices: decompose_fares(&flight.fares)?,
    })
}
