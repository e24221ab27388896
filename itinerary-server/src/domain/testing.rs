//! Builders for itineraries in tests.

use rust_decimal::Decimal;

use super::{AirportCode, Charge, ChargeType, FlightTime, Itinerary, Pricing, RateType, Segment};

pub fn code(s: &str) -> AirportCode {
    AirportCode::new(s)
}

/// A flight leg with feed-format timestamps.
pub fn segment(from: &str, to: &str, dep: &str, arr: &str) -> Segment {
    Segment {
        carrier: "China Southern Airlines".to_string(),
        carrier_id: Some("CZ".to_string()),
        flight_number: "384".to_string(),
        source: code(from),
        destination: code(to),
        departure: FlightTime::parse(dep).unwrap(),
        arrival: FlightTime::parse(arr).unwrap(),
        class: "T".to_string(),
        number_of_stops: Some(0),
        fare_basis: None,
        warning_text: None,
        ticket_type: "E".to_string(),
    }
}

/// An itinerary over `legs` (from, to, dep, arr) with an adult total.
pub fn itinerary(legs: &[(&str, &str, &str, &str)], total_cents: i64) -> Itinerary {
    Itinerary {
        id: None,
        onward: legs
            .iter()
            .map(|(from, to, dep, arr)| segment(from, to, dep, arr))
            .collect(),
        return_segments: Vec::new(),
        pricing: Some(Pricing {
            currency: "SGD".to_string(),
            charges: vec![Charge {
                charge_type: ChargeType::TotalAmount,
                rate_type: RateType::SingleAdult,
                cost: Decimal::new(total_cents, 2),
            }],
        }),
    }
}

/// DXB to BKK via DEL: 385.40, 19 hours door to door.
pub fn via_delhi() -> Itinerary {
    itinerary(
        &[
            ("DXB", "DEL", "2018-10-22T0035", "2018-10-22T0510"),
            ("DEL", "BKK", "2018-10-22T1405", "2018-10-22T1935"),
        ],
        38540,
    )
}

/// DXB to BKK via CAN: 382.70, 16 hours door to door.
pub fn via_guangzhou() -> Itinerary {
    itinerary(
        &[
            ("DXB", "CAN", "2018-10-27T0100", "2018-10-27T1200"),
            ("CAN", "BKK", "2018-10-27T1600", "2018-10-27T1700"),
        ],
        38270,
    )
}
