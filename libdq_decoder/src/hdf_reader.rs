use hdf5::types::{FixedAscii, VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, File};
use ndarray::Array1;
use std::path::{Path, PathBuf};

use super::catalog::FlagCatalog;
use super::constants::*;
use super::decoder::BoolSeries;
use super::error::{CatalogError, HDFReaderError};
use super::time_base::TimeBase;

// Large enough for the longest flag description in the open-data releases
const STRING_CAPACITY: usize = 256;

/// A bit-mask series together with the catalog that names its bits
#[derive(Debug, Clone)]
pub struct QualityMask {
    pub catalog: FlagCatalog,
    pub mask: Vec<MaskWord>,
}

impl QualityMask {
    /// The channel which is good when all of the named flags are good
    pub fn good_channel<S: AsRef<str>>(&self, names: &[S]) -> Result<BoolSeries, CatalogError> {
        self.catalog.good_channel(&self.mask, names)
    }
}

/// Truncate raw mask values to mask words.
///
/// Values which fit in either a signed or unsigned 32 bit integer keep all of their bits.
/// Returns the mask and the number of values which had higher bits set.
fn narrow_mask(raw: Vec<i64>) -> (Vec<MaskWord>, usize) {
    let mut n_wide = 0;
    let mask = raw
        .into_iter()
        .map(|word| {
            if word < i32::MIN as i64 || word > MaskWord::MAX as i64 {
                n_wide += 1;
            }
            word as MaskWord
        })
        .collect();
    (mask, n_wide)
}

fn clean_string(s: &str) -> String {
    s.trim_end_matches('\0').trim().to_string()
}

/// A simple struct which wraps around the hdf5-rust library.
///
/// Opens a gravitational-wave open-data HDF5 file for reading the data quality and
/// injection masks, their flag catalogs, and the strain.
#[derive(Debug)]
pub struct HDFReader {
    file_handle: File,
    path: PathBuf,
}
// Structure
// meta - GPSstart, Duration, Detector
// quality
// |---- simple - DQmask, DQShortnames, DQDescriptions
// |---- injections - Injmask, InjShortnames, InjDescriptions
// strain
// |---- Strain(dset) - Xspacing

impl HDFReader {
    /// Open the file at path
    pub fn open(path: &Path) -> Result<Self, HDFReaderError> {
        if !path.exists() {
            return Err(HDFReaderError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self {
            file_handle: File::open(path)?,
            path: path.to_path_buf(),
        })
    }

    /// Read the time axis of the file.
    ///
    /// If `strain_rate` is None the rate is taken from the spacing of the strain dataset, falling
    /// back to the standard 4096 Hz when the file carries no strain.
    pub fn read_time_base(&self, strain_rate: Option<u32>) -> Result<TimeBase, HDFReaderError> {
        let gps_start = self.file_handle.dataset(META_GPS_START)?.read_scalar::<i64>()?;
        let duration = self.file_handle.dataset(META_DURATION)?.read_scalar::<i64>()?;
        if duration < 0 {
            return Err(HDFReaderError::NegativeValue(
                String::from(META_DURATION),
                duration,
            ));
        }

        let rate = match strain_rate {
            Some(rate) => rate,
            None => {
                if self.file_handle.link_exists(STRAIN) {
                    self.read_strain_rate()?
                } else {
                    log::warn!(
                        "{} has no strain; assuming {} Hz",
                        self.path.display(),
                        DEFAULT_STRAIN_RATE
                    );
                    DEFAULT_STRAIN_RATE
                }
            }
        };

        Ok(TimeBase::new(gps_start, duration as u64, rate))
    }

    /// Name of the detector which recorded this file, if the file says
    pub fn read_detector(&self) -> Result<Option<String>, HDFReaderError> {
        if !self.file_handle.link_exists(META_DETECTOR) {
            return Ok(None);
        }
        let dataset = self.file_handle.dataset(META_DETECTOR)?;
        if let Ok(value) = dataset.read_scalar::<VarLenUnicode>() {
            return Ok(Some(clean_string(value.as_str())));
        }
        if let Ok(value) = dataset.read_scalar::<VarLenAscii>() {
            return Ok(Some(clean_string(value.as_str())));
        }
        if let Ok(value) = dataset.read_scalar::<FixedAscii<STRING_CAPACITY>>() {
            return Ok(Some(clean_string(value.as_str())));
        }
        // Some releases store the detector as a one element array
        Ok(self.read_strings(META_DETECTOR)?.into_iter().next())
    }

    /// Read the simple data quality mask and its catalog
    pub fn read_dq(&self, time_base: &TimeBase) -> Result<QualityMask, HDFReaderError> {
        self.read_quality(time_base, DQ_MASK, DQ_NAMES, DQ_DESCRIPTIONS)
    }

    /// Read the hardware injection mask and its catalog. Not every release has one.
    pub fn read_injections(
        &self,
        time_base: &TimeBase,
    ) -> Result<Option<QualityMask>, HDFReaderError> {
        if !self.file_handle.link_exists(INJ_GROUP) {
            return Ok(None);
        }
        Ok(Some(self.read_quality(
            time_base,
            INJ_MASK,
            INJ_NAMES,
            INJ_DESCRIPTIONS,
        )?))
    }

    /// Read the full strain series
    pub fn read_strain(&self) -> Result<Array1<f64>, HDFReaderError> {
        Ok(self.file_handle.dataset(STRAIN)?.read_1d::<f64>()?)
    }

    fn read_strain_rate(&self) -> Result<u32, HDFReaderError> {
        let spacing = self
            .file_handle
            .dataset(STRAIN)?
            .attr(STRAIN_SPACING_ATTR)?
            .read_scalar::<f64>()?;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(HDFReaderError::BadStrainSpacing(spacing));
        }
        // Spacings over 2 s round to a rate of 0
        let rate = (1.0 / spacing).round() as u32;
        if rate == 0 {
            return Err(HDFReaderError::BadStrainSpacing(spacing));
        }
        Ok(rate)
    }

    fn read_quality(
        &self,
        time_base: &TimeBase,
        mask_path: &str,
        names_path: &str,
        descriptions_path: &str,
    ) -> Result<QualityMask, HDFReaderError> {
        let mask = self.read_mask(&self.file_handle.dataset(mask_path)?)?;
        if mask.len() != time_base.mask_samples() {
            return Err(HDFReaderError::LengthMismatch(
                mask.len(),
                time_base.duration,
            ));
        }
        let catalog = FlagCatalog::new(
            self.read_strings(names_path)?,
            self.read_strings(descriptions_path)?,
        )?;
        log::debug!(
            "Read {} flags and {} samples from {}",
            catalog.len(),
            mask.len(),
            mask_path
        );
        Ok(QualityMask { catalog, mask })
    }

    /// Masks are stored as signed integers in some releases; read wide and keep the low bits
    fn read_mask(&self, dataset: &Dataset) -> Result<Vec<MaskWord>, HDFReaderError> {
        let (mask, n_wide) = narrow_mask(dataset.read_raw::<i64>()?);
        if n_wide > 0 {
            log::warn!(
                "{} samples of {} in {} have bits set beyond the {} bit mask word; those bits are dropped",
                n_wide,
                dataset.name(),
                self.path.display(),
                MASK_WIDTH
            );
        }
        Ok(mask)
    }

    fn read_strings(&self, path: &str) -> Result<Vec<String>, HDFReaderError> {
        let dataset = self.file_handle.dataset(path)?;
        if let Ok(values) = dataset.read_raw::<VarLenUnicode>() {
            return Ok(values.iter().map(|v| clean_string(v.as_str())).collect());
        }
        if let Ok(values) = dataset.read_raw::<VarLenAscii>() {
            return Ok(values.iter().map(|v| clean_string(v.as_str())).collect());
        }
        if let Ok(values) = dataset.read_raw::<FixedAscii<STRING_CAPACITY>>() {
            return Ok(values.iter().map(|v| clean_string(v.as_str())).collect());
        }
        Err(HDFReaderError::BadStringDataset(path.to_string()))
    }
}
