use serde::Serialize;

use crate::fares::FarePrices;
use crate::timestamp::DisplayTime;

// One normalized flight, ready for JSON delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub operator: String,
    pub flight_number: String,
    pub departs_from: String,
    pub arrives_at: String,
    pub departs_on: DisplayTime,
    pub arrives_on: DisplayTime,
    pub flight_time: String,
    pub fare_prices: FarePrices,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityResponse {
    #[serde(rename = "flight")]
    pub flights: Vec<FlightRecord>,
}

impl AvailabilityResponse {
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self { flights }
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
