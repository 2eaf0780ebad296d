// Flight availability: normalizes the airline availability feed into presentation-ready JSON

pub mod error;
pub mod fares;
pub mod money;
pub mod parser;
pub mod response;
pub mod service;
pub mod supplier;
pub mod timestamp;
pub mod upstream;

// Re-export key types for convenience
pub use error::{AvailabilityError, TransformError};
pub use fares::{decompose_fares, CabinTier, FareClassPrices, FarePrices};
pub use money::{parse_money_token, CurrencyAmount};
pub use parser::{build_flight_record, AvailabilityParser, ExecutionMode, ParserConfig};
pub use response::{AvailabilityResponse, FlightRecord};
pub use service::{FlightAvailabilityService, ServiceError};
pub use supplier::{RawFare, RawFlight, XmlAvailability};
pub use timestamp::{display_time, flight_duration, require_timestamp, DisplayTime, Timestamp};
pub use upstream::{
    AvailabilityQuery, AvailabilitySource, HttpAvailabilitySource, RetryConfig, UpstreamConfig,
    UpstreamError,
};
