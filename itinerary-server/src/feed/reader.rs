//! Streaming XML itinerary reader.
//!
//! The reader walks the document event by event and materializes one
//! itinerary at a time, so memory use is bounded by the largest single
//! record rather than the file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rust_decimal::Decimal;

use crate::domain::{
    AirportCode, Charge, ChargeType, FlightTime, Itinerary, Pricing, RateType, Segment,
};

use super::error::{FeedError, RecordError};

/// Element name of one itinerary.
///
/// The same name is reused for the segment list inside each leg; those are
/// never seen here because a record is consumed whole once it starts.
const RECORD_TAG: &[u8] = b"Flights";

/// Iterator over the itineraries of one feed document.
///
/// Yields `Err` with a recoverable [`FeedError::Record`] for a record that
/// fails to decode and keeps going; any other error is yielded once and
/// ends iteration.
pub struct ItineraryReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    records: usize,
    finished: bool,
}

impl ItineraryReader<BufReader<File>> {
    /// Open a feed file for reading.
    pub fn open(path: &Path) -> Result<Self, FeedError> {
        let file = File::open(path).map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ItineraryReader<R> {
    /// Wrap any buffered source.
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        Self {
            reader,
            buf: Vec::new(),
            records: 0,
            finished: false,
        }
    }

    /// Number of itinerary elements encountered so far, decodable or not.
    pub fn records_seen(&self) -> usize {
        self.records
    }

    /// Scan forward to the next record and decode it.
    fn next_record(&mut self, buf: &mut Vec<u8>) -> Option<Result<Itinerary, FeedError>> {
        enum Scan {
            Record { empty: bool },
            Skip,
            Eof,
        }

        loop {
            buf.clear();
            let scan = match self.reader.read_event_into(buf) {
                Ok(Event::Start(e)) if is_record(&e) => Scan::Record { empty: false },
                Ok(Event::Empty(e)) if is_record(&e) => Scan::Record { empty: true },
                Ok(Event::Eof) => Scan::Eof,
                Ok(_) => Scan::Skip,
                Err(e) => return Some(Err(e.into())),
            };

            match scan {
                Scan::Skip => continue,
                Scan::Eof => return None,
                Scan::Record { empty } => {
                    self.records += 1;
                    let index = self.records;
                    let draft = if empty {
                        RecordDraft::default()
                    } else {
                        match self.read_record(buf, index) {
                            Ok(draft) => draft,
                            Err(e) => return Some(Err(e)),
                        }
                    };
                    return Some(
                        draft
                            .finish()
                            .map_err(|reason| FeedError::Record { index, reason }),
                    );
                }
            }
        }
    }

    /// Consume events up to the end tag of the current record.
    fn read_record(&mut self, buf: &mut Vec<u8>, index: usize) -> Result<RecordDraft, FeedError> {
        let mut draft = RecordDraft::default();
        // Element names below the record root.
        let mut path: Vec<String> = Vec::new();

        loop {
            buf.clear();
            match self.reader.read_event_into(buf)? {
                Event::Start(e) => {
                    path.push(local_name(&e));
                    draft.open(&path, &e);
                }
                Event::Empty(e) => {
                    path.push(local_name(&e));
                    draft.open(&path, &e);
                    draft.close(&path);
                    path.pop();
                }
                Event::Text(t) => match t.unescape() {
                    Ok(text) => draft.text(&text),
                    Err(e) => draft.fail(RecordError::Content(e.to_string())),
                },
                Event::CData(c) => draft.text(&String::from_utf8_lossy(&c)),
                Event::End(_) => {
                    if path.is_empty() {
                        return Ok(draft);
                    }
                    draft.close(&path);
                    path.pop();
                }
                Event::Eof => return Err(FeedError::Truncated(index)),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ItineraryReader<R> {
    type Item = Result<Itinerary, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut buf = std::mem::take(&mut self.buf);
        let item = self.next_record(&mut buf);
        self.buf = buf;

        match &item {
            None => self.finished = true,
            Some(Err(e)) if !e.is_recoverable() => self.finished = true,
            _ => {}
        }
        item
    }
}

fn is_record(element: &BytesStart) -> bool {
    element.local_name().as_ref() == RECORD_TAG
}

fn local_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Which leg a segment list belongs to.
#[derive(Debug, Clone, Copy)]
enum Leg {
    Onward,
    Return,
}

impl Leg {
    fn from_element(name: &str) -> Option<Self> {
        match name {
            "OnwardPricedItinerary" => Some(Leg::Onward),
            "ReturnPricedItinerary" => Some(Leg::Return),
            _ => None,
        }
    }
}

/// Partially decoded itinerary.
#[derive(Default)]
struct RecordDraft {
    onward: Vec<Segment>,
    return_segments: Vec<Segment>,
    pricing: Option<Pricing>,
    flight: FlightDraft,
    charge: Option<(ChargeType, RateType)>,
    text: String,
    error: Option<RecordError>,
}

impl RecordDraft {
    /// Handle a start tag; `path` ends with the element being opened.
    fn open(&mut self, path: &[String], element: &BytesStart) {
        self.text.clear();
        let path: Vec<&str> = path.iter().map(String::as_str).collect();

        match path.as_slice() {
            [leg, "Flights", "Flight"] if Leg::from_element(leg).is_some() => {
                self.flight = FlightDraft::default();
            }
            [leg, "Flights", "Flight", "Carrier"] if Leg::from_element(leg).is_some() => {
                self.flight.carrier_id = self.attribute(element, b"id");
            }
            ["Pricing"] => {
                let currency = self.attribute(element, b"currency").unwrap_or_default();
                self.pricing = Some(Pricing {
                    currency,
                    charges: Vec::new(),
                });
            }
            ["Pricing", "ServiceCharges"] => {
                let charge_type = self.attribute(element, b"ChargeType").unwrap_or_default();
                let rate_type = self.attribute(element, b"type").unwrap_or_default();
                self.charge = Some((
                    ChargeType::from_attr(&charge_type),
                    RateType::from_attr(&rate_type),
                ));
            }
            _ => {}
        }
    }

    /// Handle an end tag; `path` still ends with the element being closed.
    fn close(&mut self, path: &[String]) {
        let text = std::mem::take(&mut self.text);
        let path: Vec<&str> = path.iter().map(String::as_str).collect();

        match path.as_slice() {
            [leg, "Flights", "Flight"] => {
                let Some(leg) = Leg::from_element(leg) else {
                    return;
                };
                match std::mem::take(&mut self.flight).build() {
                    Ok(segment) => match leg {
                        Leg::Onward => self.onward.push(segment),
                        Leg::Return => self.return_segments.push(segment),
                    },
                    Err(e) => self.fail(e),
                }
            }
            [leg, "Flights", "Flight", field] if Leg::from_element(leg).is_some() => {
                self.flight.set(field, text);
            }
            ["Pricing", "ServiceCharges"] => {
                let Some((charge_type, rate_type)) = self.charge.take() else {
                    return;
                };
                match Decimal::from_str(text.trim()) {
                    Ok(cost) => self
                        .pricing
                        .get_or_insert_with(Pricing::default)
                        .charges
                        .push(Charge {
                            charge_type,
                            rate_type,
                            cost,
                        }),
                    Err(_) => self.fail(RecordError::InvalidCost(text)),
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Remember the first problem; the record is dropped when it ends.
    fn fail(&mut self, error: RecordError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn attribute(&mut self, element: &BytesStart, key: &[u8]) -> Option<String> {
        for attr in element.attributes() {
            match attr {
                Ok(attr) if attr.key.local_name().as_ref() == key => {
                    return match attr.unescape_value() {
                        Ok(value) => Some(value.into_owned()),
                        Err(e) => {
                            self.fail(RecordError::Content(e.to_string()));
                            None
                        }
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    self.fail(RecordError::Content(e.to_string()));
                    return None;
                }
            }
        }
        None
    }

    fn finish(self) -> Result<Itinerary, RecordError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        Ok(Itinerary {
            id: None,
            onward: self.onward,
            return_segments: self.return_segments,
            pricing: self.pricing,
        })
    }
}

/// Partially decoded flight segment.
#[derive(Default)]
struct FlightDraft {
    carrier: String,
    carrier_id: Option<String>,
    flight_number: String,
    source: Option<String>,
    destination: Option<String>,
    departure: FlightTime,
    arrival: FlightTime,
    class: String,
    number_of_stops: Option<String>,
    fare_basis: Option<String>,
    warning_text: Option<String>,
    ticket_type: String,
}

impl FlightDraft {
    fn set(&mut self, field: &str, text: String) {
        match field {
            "Carrier" => self.carrier = text,
            "FlightNumber" => self.flight_number = text,
            "Source" => self.source = Some(text),
            "Destination" => self.destination = Some(text),
            "DepartureTimeStamp" => self.departure = FlightTime::parse_lenient(&text),
            "ArrivalTimeStamp" => self.arrival = FlightTime::parse_lenient(&text),
            "Class" => self.class = text,
            "NumberOfStops" => self.number_of_stops = Some(text),
            "FareBasis" => self.fare_basis = non_empty(text),
            "WarningText" => self.warning_text = non_empty(text),
            "TicketType" => self.ticket_type = text,
            _ => {}
        }
    }

    fn build(self) -> Result<Segment, RecordError> {
        let source = airport(self.source, "Source")?;
        let destination = airport(self.destination, "Destination")?;
        let number_of_stops = self
            .number_of_stops
            .and_then(|stops| stops.trim().parse().ok());

        Ok(Segment {
            carrier: self.carrier,
            carrier_id: self.carrier_id,
            flight_number: self.flight_number,
            source,
            destination,
            departure: self.departure,
            arrival: self.arrival,
            class: self.class,
            number_of_stops,
            fare_basis: self.fare_basis,
            warning_text: self.warning_text,
            ticket_type: self.ticket_type,
        })
    }
}

/// Any non-blank text is a usable code.
fn airport(value: Option<String>, field: &'static str) -> Result<AirportCode, RecordError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(AirportCode::new(&value)),
        _ => Err(RecordError::MissingField(field)),
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
