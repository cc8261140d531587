use std::fmt;

use foundation::math::LatLng;
use serde::{Deserialize, Serialize};

/// Anything that can be flown to from the origin.
pub trait Trip {
    fn destination(&self) -> LatLng;
}

impl Trip for LatLng {
    fn destination(&self) -> LatLng {
        *self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub name: String,
    pub destination: LatLng,
}

impl TripRecord {
    pub fn new(name: impl Into<String>, destination: LatLng) -> Self {
        Self {
            name: name.into(),
            destination,
        }
    }
}

impl Trip for TripRecord {
    fn destination(&self) -> LatLng {
        self.destination
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::OutOfRange { index, len } => {
                write!(f, "trip index {index} out of range for {len} trip(s)")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Destination of the selected trip; `None` selects nothing.
pub fn selected_destination<T: Trip>(trips: &[T], index: Option<usize>) -> Result<Option<LatLng>, SelectionError> {
    let Some(index) = index else {
        return Ok(None);
    };
    trips
        .get(index)
        .map(|trip| Some(trip.destination()))
        .ok_or(SelectionError::OutOfRange {
            index,
            len: trips.len(),
        })
}
