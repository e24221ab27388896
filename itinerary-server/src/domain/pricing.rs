//! Pricing blocks attached to itineraries.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// What a charge covers (the feed's `ChargeType` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChargeType {
    BaseFare,
    AirlineTaxes,
    TotalAmount,
    /// Any value the feed uses that we don't know about, kept verbatim.
    Other(String),
}

impl ChargeType {
    /// Map a feed attribute value onto a charge type.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "BaseFare" => Self::BaseFare,
            "AirlineTaxes" => Self::AirlineTaxes,
            "TotalAmount" => Self::TotalAmount,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BaseFare => "BaseFare",
            Self::AirlineTaxes => "AirlineTaxes",
            Self::TotalAmount => "TotalAmount",
            Self::Other(value) => value,
        }
    }
}

/// Which passenger a charge applies to (the feed's `type` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateType {
    SingleAdult,
    SingleChild,
    SingleInfant,
    /// Any value the feed uses that we don't know about, kept verbatim.
    Other(String),
}

impl RateType {
    /// Map a feed attribute value onto a rate type.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "SingleAdult" => Self::SingleAdult,
            "SingleChild" => Self::SingleChild,
            "SingleInfant" => Self::SingleInfant,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SingleAdult => "SingleAdult",
            Self::SingleChild => "SingleChild",
            Self::SingleInfant => "SingleInfant",
            Self::Other(value) => value,
        }
    }
}

impl Serialize for ChargeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for RateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One line of a pricing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charge {
    pub charge_type: ChargeType,
    pub rate_type: RateType,
    pub cost: Decimal,
}

/// Currency plus an unordered list of charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pricing {
    pub currency: String,
    pub charges: Vec<Charge>,
}

impl Pricing {
    /// Cost of the first charge matching both categories.
    pub fn find(&self, charge_type: &ChargeType, rate_type: &RateType) -> Option<Decimal> {
        self.charges
            .iter()
            .find(|c| &c.charge_type == charge_type && &c.rate_type == rate_type)
            .map(|c| c.cost)
    }
}
