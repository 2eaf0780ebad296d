// Airline availability feed: XML document structures and the raw flights decoded from them
use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, TransformError};
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct RawFlight {
    pub carrier_code: String,
    pub flight_designator: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure: Option<Timestamp>,
    pub arrival: Option<Timestamp>,
    pub fares: Vec<RawFare>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFare {
    pub class: String,
    pub base_price: String,
    pub tax: String,
    pub fees: String,
}

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
#[serde(rename = "Availability")]
pub struct XmlAvailability {
    #[serde(rename = "Flight")]
    pub flights: Vec<XmlFlight>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlFlight {
    pub carrier_code: String,
    pub flight_designator: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_date: Option<String>,
    pub arrival_date: Option<String>,
    pub fares: XmlFares,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlFares {
    #[serde(rename = "Fare")]
    pub fares: Vec<XmlFare>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlFare {
    #[serde(rename = "@class")]
    pub class: String,
    pub base_price: String,
    pub fees: String,
    pub tax: String,
}

impl XmlAvailability {
    pub fn from_xml(xml: &str) -> Result<Self, AvailabilityError> {
        from_str(xml).map_err(|e| AvailabilityError::XmlParseError(e.to_string()))
    }

    /// Converts every flight in document order; the first bad timestamp fails the batch.
    pub fn into_raw_flights(self) -> Result<Vec<RawFlight>, AvailabilityError> {
        self.flights
            .into_iter()
            .enumerate()
            .map(|(index, flight)| {
                RawFlight::try_from(flight).map_err(|e| AvailabilityError::flight(index, e))
            })
            .collect()
    }
}

impl From<XmlFare> for RawFare {
    fn from(item: XmlFare) -> Self {
        RawFare {
            class: item.class.trim().to_string(),
            base_price: item.base_price,
            tax: item.tax,
            fees: item.fees,
        }
    }
}

impl TryFrom<XmlFlight> for RawFlight {
    type Error = TransformError;

    fn try_from(item: XmlFlight) -> Result<Self, Self::Error> {
        Ok(RawFlight {
            departure: parse_optional_timestamp(item.departure_date.as_deref())?,
            arrival: parse_optional_timestamp(item.arrival_date.as_deref())?,
            carrier_code: item.carrier_code,
            flight_designator: item.flight_designator,
            origin_airport: item.origin_airport,
            destination_airport: item.destination_airport,
            fares: item.fares.fares.into_iter().map(RawFare::from).collect(),
        })
    }
}

// Absent or blank elements stay absent; the normalizer reports them
fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<Timestamp>, TransformError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

// Sample upstream document (stored in the samples directory)
pub const SAMPLE_XML_PATH: &str = "samples/availability_response.xml";

pub fn load_sample_document() -> Result<String, std::io::Error> {
    std::fs::read_to_string(SAMPLE_XML_PATH)
}

// A small sample for inline testing
pub const SMALL_SAMPLE_XML: &str = r#"
<Availability>
  <Flight>
    <CarrierCode>EK</CarrierCode>
    <FlightDesignator>EK0011</FlightDesignator>
    <OriginAirport>DXB</OriginAirport>
    <DestinationAirport>LGW</DestinationAirport>
    <DepartureDate>2014-01-02T07:45:00.000+04:00</DepartureDate>
    <ArrivalDate>2014-01-02T11:55:00.000+00:00</ArrivalDate>
    <Fares>
      <Fare class="FIF">
        <BasePrice>AED 2000.00</BasePrice>
        <Fees>AED 300.00</Fees>
        <Tax>AED 150.00</Tax>
      </Fare>
      <Fare class="CIF">
        <BasePrice>AED 1500.00</BasePrice>
        <Fees>AED 200.00</Fees>
        <Tax>AED 100.00</Tax>
      </Fare>
      <Fare class="YIF">
        <BasePrice>AED 500.00</BasePrice>
        <Fees>AED 30.00</Fees>
        <Tax>AED 50.00</Tax>
      </Fare>
    </Fares>
  </Flight>
</Availability>
"#;
