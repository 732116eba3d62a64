// A catalog is the per-release table that says which bit of the mask means what.
// The bit position of a flag is implicit in the order the names are stored in the file,
// so we keep the names in order and index them with a hash map for lookup by name.
use fxhash::FxHashMap;

use super::constants::{MaskWord, MASK_WIDTH};
use super::decoder::{combine_flags, extract_flag, BoolSeries};
use super::error::CatalogError;

/// A single named flag and the bit it occupies in the mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagInfo {
    pub bit: usize,
    pub name: String,
    pub description: String,
}

/// FlagCatalog maps flag names to bit positions within a data quality mask.
///
/// Names must be unique, and there can be no more flags than there are bits in a mask word.
#[derive(Debug, Clone, Default)]
pub struct FlagCatalog {
    flags: Vec<FlagInfo>,
    index: FxHashMap<String, usize>,
}

impl FlagCatalog {
    /// Build a catalog from the names and descriptions in bit order
    pub fn new(names: Vec<String>, descriptions: Vec<String>) -> Result<Self, CatalogError> {
        if names.len() != descriptions.len() {
            return Err(CatalogError::LengthMismatch(names.len(), descriptions.len()));
        }
        if names.len() > MASK_WIDTH {
            return Err(CatalogError::CatalogTooLarge(names.len()));
        }

        let mut catalog = Self::default();
        for (bit, (name, description)) in names.into_iter().zip(descriptions).enumerate() {
            if catalog.index.contains_key(&name) {
                return Err(CatalogError::DuplicateFlag(name));
            }
            catalog.index.insert(name.clone(), bit);
            catalog.flags.push(FlagInfo {
                bit,
                name,
                description,
            });
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate over the flags in bit order
    pub fn iter(&self) -> std::slice::Iter<'_, FlagInfo> {
        self.flags.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FlagInfo> {
        self.index.get(name).map(|bit| &self.flags[*bit])
    }

    /// Get the bit position of a flag
    pub fn bit_of(&self, name: &str) -> Result<usize, CatalogError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownFlag(name.to_string()))
    }

    /// Resolve a selection of names into bit positions
    pub fn bits_of<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, CatalogError> {
        names.iter().map(|name| self.bit_of(name.as_ref())).collect()
    }

    /// The boolean channel for a single named flag
    pub fn channel(&self, mask: &[MaskWord], name: &str) -> Result<BoolSeries, CatalogError> {
        Ok(extract_flag(mask, self.bit_of(name)?)?)
    }

    /// Every channel in the catalog, in bit order
    pub fn channels(&self, mask: &[MaskWord]) -> Result<Vec<(&FlagInfo, BoolSeries)>, CatalogError> {
        self.flags
            .iter()
            .map(|flag| Ok((flag, extract_flag(mask, flag.bit)?)))
            .collect()
    }

    /// The channel which is good only when every one of the named flags is good
    pub fn good_channel<S: AsRef<str>>(
        &self,
        mask: &[MaskWord],
        names: &[S],
    ) -> Result<BoolSeries, CatalogError> {
        let bits = self.bits_of(names)?;
        Ok(combine_flags(mask, &bits)?)
    }
}

impl<'a> IntoIterator for &'a FlagCatalog {
    type Item = &'a FlagInfo;
    type IntoIter = std::slice::Iter<'a, FlagInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
