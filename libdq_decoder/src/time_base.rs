use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::constants::{GPS_EPOCH_UNIX, LEAP_SECONDS_GPS, MASK_SAMPLE_RATE};
use super::error::TimeBaseError;

/// The time axis shared by the mask and strain series of a single file.
///
/// Mask sample `i` covers GPS time `[gps_start + i, gps_start + i + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBase {
    pub gps_start: i64,
    pub duration: u64,
    pub strain_rate: u32,
}

impl TimeBase {
    pub fn new(gps_start: i64, duration: u64, strain_rate: u32) -> Self {
        Self {
            gps_start,
            duration,
            strain_rate,
        }
    }

    pub fn gps_end(&self) -> i64 {
        self.gps_start + self.duration as i64
    }

    /// Number of samples the mask series should hold
    pub fn mask_samples(&self) -> usize {
        (self.duration * MASK_SAMPLE_RATE as u64) as usize
    }

    /// Number of samples the strain series should hold
    pub fn strain_samples(&self) -> usize {
        (self.duration * self.strain_rate as u64) as usize
    }

    /// Ratio of strain samples to mask samples
    pub fn strain_per_mask_sample(&self) -> u32 {
        self.strain_rate / MASK_SAMPLE_RATE
    }

    pub fn utc_start(&self) -> Result<OffsetDateTime, TimeBaseError> {
        gps_to_utc(self.gps_start)
    }
}

/// Number of leap seconds between GPS and UTC at a given GPS time
pub fn leap_seconds(gps_time: i64) -> i64 {
    LEAP_SECONDS_GPS
        .iter()
        .take_while(|leap| **leap <= gps_time)
        .count() as i64
}

/// Convert a GPS time in seconds to a UTC date
pub fn gps_to_utc(gps_time: i64) -> Result<OffsetDateTime, TimeBaseError> {
    let unix = GPS_EPOCH_UNIX + gps_time - leap_seconds(gps_time);
    OffsetDateTime::from_unix_timestamp(unix).map_err(|e| TimeBaseError::OutOfRange(gps_time, e))
}
