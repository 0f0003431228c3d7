use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::band::{Band, BandLimits, MAX_BANDS};
use crate::error::{ChartError, ChartResult};

type BandVec = SmallVec<[Band; MAX_BANDS]>;

/// Discrete edit applied to a [`BandList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BandEdit {
    /// Moves the upper boundary of band `index` and stitches the band above.
    SetBoundary { index: usize, to: f64 },
    SetColor { index: usize, color: String },
    SetLabel { index: usize, text: String },
    /// Prepends `band` as the new lowest band.
    AddBand { band: Band },
    /// Drops the lowest band.
    RemoveBand,
}

impl BandEdit {
    /// Adds the stock "New Color" band `{from: 0, to: 5}`.
    #[must_use]
    pub fn add_default() -> Self {
        Self::AddBand {
            band: default_new_band(),
        }
    }
}

/// Why an edit left the list untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditRejection {
    TooManyBands { max: usize },
    LastBand,
    /// The top band's upper bound is pinned at `+max_range`.
    FixedTopBoundary,
    NonFiniteBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    Applied,
    Rejected(EditRejection),
}

impl EditOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

pub(crate) fn default_new_band() -> Band {
    Band::new(0.0, 5.0, "#FFFFFF", "New Color")
}

/// Ordered, contiguous band list; index `0` is the lowest value range.
///
/// After every applied edit:
/// - `bands[0].from == -max_range` and `bands[last].to == +max_range`;
/// - `bands[i].to == bands[i + 1].from`;
/// - `1 <= len <= max_bands`.
///
/// Deserializing validates the same invariants as [`BandList::from_bands`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBandList", into = "RawBandList")]
pub struct BandList {
    bands: BandVec,
    limits: BandLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBandList {
    bands: Vec<Band>,
    limits: BandLimits,
}

impl TryFrom<RawBandList> for BandList {
    type Error = ChartError;

    fn try_from(raw: RawBandList) -> ChartResult<Self> {
        Self::from_bands(raw.bands, raw.limits)
    }
}

impl From<BandList> for RawBandList {
    fn from(list: BandList) -> Self {
        Self {
            bands: list.bands.into_vec(),
            limits: list.limits,
        }
    }
}

impl BandList {
    /// One band spanning the whole axis.
    #[must_use]
    pub fn single(limits: BandLimits, color: impl Into<String>, text: impl Into<String>) -> Self {
        let mut bands = BandVec::new();
        bands.push(Band::new(-limits.max_range, limits.max_range, color, text));
        Self { bands, limits }
    }

    /// Builds a list that must already satisfy every invariant.
    pub fn from_bands(bands: Vec<Band>, limits: BandLimits) -> ChartResult<Self> {
        let list = Self {
            bands: BandVec::from_vec(bands),
            limits,
        };
        list.validate()?;
        Ok(list)
    }

    /// Builds a list from persisted bands, re-anchoring both ends and
    /// stitching every `from` to the previous band's `to`.
    ///
    /// Empty or oversized lists and non-finite bounds are rejected.
    pub fn from_stored(bands: &[Band], limits: BandLimits) -> ChartResult<Self> {
        if bands.is_empty() {
            return Err(ChartError::InvalidData(
                "stored band list must not be empty".to_owned(),
            ));
        }
        if bands.len() > limits.max_bands {
            return Err(ChartError::InvalidData(format!(
                "stored band list has {} bands, limit is {}",
                bands.len(),
                limits.max_bands
            )));
        }
        if bands
            .iter()
            .any(|band| !band.from.is_finite() || !band.to.is_finite())
        {
            return Err(ChartError::InvalidData(
                "stored band bounds must be finite".to_owned(),
            ));
        }

        let mut list = Self {
            bands: bands.iter().cloned().collect(),
            limits,
        };
        let repaired = list.reanchor();
        if repaired > 0 {
            debug!(repaired, len = list.len(), "re-anchored stored bands");
        }
        Ok(list)
    }

    fn reanchor(&mut self) -> usize {
        let max_range = self.limits.max_range;
        let mut repaired = 0;

        if let Some(first) = self.bands.first_mut() {
            if first.from != -max_range {
                first.from = -max_range;
                repaired += 1;
            }
        }
        if let Some(last) = self.bands.last_mut() {
            if last.to != max_range {
                last.to = max_range;
                repaired += 1;
            }
        }
        for index in 1..self.bands.len() {
            let below_to = self.bands[index - 1].to;
            if self.bands[index].from != below_to {
                self.bands[index].from = below_to;
                repaired += 1;
            }
        }
        repaired
    }

    /// Checks anchoring, contiguity and the count bound.
    pub fn validate(&self) -> ChartResult<()> {
        let len = self.bands.len();
        if len == 0 || len > self.limits.max_bands {
            return Err(ChartError::InvalidData(format!(
                "band count {len} outside 1..={}",
                self.limits.max_bands
            )));
        }

        let max_range = self.limits.max_range;
        if self.bands[0].from != -max_range {
            return Err(ChartError::InvalidData(
                "lowest band must start at -max_range".to_owned(),
            ));
        }
        if self.bands[len - 1].to != max_range {
            return Err(ChartError::InvalidData(
                "highest band must end at +max_range".to_owned(),
            ));
        }
        if let Some(index) = self
            .bands
            .windows(2)
            .position(|pair| pair[0].to != pair[1].from)
        {
            return Err(ChartError::InvalidData(format!(
                "bands {index} and {} are not contiguous",
                index + 1
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Band> {
        self.bands.to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    #[must_use]
    pub fn limits(&self) -> BandLimits {
        self.limits
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        self.bands.len() < self.limits.max_bands
    }

    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.bands.len() > 1
    }

    /// Band whose `[from, to)` holds `value`; the top band also owns its
    /// upper bound.
    #[must_use]
    pub fn band_for(&self, value: f64) -> Option<(usize, &Band)> {
        if let Some(found) = self
            .bands
            .iter()
            .enumerate()
            .find(|(_, band)| band.contains(value))
        {
            return Some(found);
        }
        let last = self.bands.len().checked_sub(1)?;
        (self.bands[last].to == value).then(|| (last, &self.bands[last]))
    }

    /// Single entry point for every band edit.
    ///
    /// # Panics
    ///
    /// Panics when an indexed edit names a band that does not exist.
    pub fn apply(&mut self, edit: BandEdit) -> EditOutcome {
        let outcome = match edit {
            BandEdit::SetBoundary { index, to } => self.set_boundary(index, to),
            BandEdit::SetColor { index, color } => self.set_color(index, color),
            BandEdit::SetLabel { index, text } => self.set_label(index, text),
            BandEdit::AddBand { band } => self.add_band(band),
            BandEdit::RemoveBand => self.remove_band(),
        };
        if let EditOutcome::Rejected(reason) = outcome {
            warn!(?reason, len = self.bands.len(), "band edit rejected");
        }
        debug_assert!(self.validate().is_ok(), "band invariants broken by edit");
        outcome
    }

    pub fn set_boundary(&mut self, index: usize, to: f64) -> EditOutcome {
        self.assert_index(index);
        if index == self.bands.len() - 1 {
            return EditOutcome::Rejected(EditRejection::FixedTopBoundary);
        }
        if !to.is_finite() {
            return EditOutcome::Rejected(EditRejection::NonFiniteBoundary);
        }

        self.bands[index].to = to;
        self.bands[index + 1].from = to;
        self.bands[index].from = if index > 0 {
            self.bands[index - 1].to
        } else {
            -self.limits.max_range
        };
        EditOutcome::Applied
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> EditOutcome {
        self.assert_index(index);
        self.bands[index].color = color.into();
        EditOutcome::Applied
    }

    pub fn set_label(&mut self, index: usize, text: impl Into<String>) -> EditOutcome {
        self.assert_index(index);
        self.bands[index].text = text.into();
        EditOutcome::Applied
    }

    /// Prepends `band` at index `0`, anchoring it at `-max_range` and
    /// stitching the former lowest band onto its `to`.
    ///
    /// Only contiguity is restored: when the former lowest band ended below
    /// `band.to` it is left with `from > to` and holds no values until its
    /// boundary is edited.
    pub fn add_band(&mut self, band: Band) -> EditOutcome {
        if !self.can_add() {
            return EditOutcome::Rejected(EditRejection::TooManyBands {
                max: self.limits.max_bands,
            });
        }
        if !band.to.is_finite() {
            return EditOutcome::Rejected(EditRejection::NonFiniteBoundary);
        }

        let mut band = band;
        band.from = -self.limits.max_range;
        self.bands.insert(0, band);
        if self.bands.len() > 1 {
            self.bands[1].from = self.bands[0].to;
        }
        EditOutcome::Applied
    }

    pub fn remove_band(&mut self) -> EditOutcome {
        if !self.can_remove() {
            return EditOutcome::Rejected(EditRejection::LastBand);
        }

        self.bands.remove(0);
        self.bands[0].from = -self.limits.max_range;
        EditOutcome::Applied
    }

    /// Replaces empty labels, returning how many bands changed.
    pub fn fill_empty_labels(&mut self, replacement: &str) -> usize {
        let mut filled = 0;
        for band in self.bands.iter_mut().filter(|band| band.text.is_empty()) {
            band.text = replacement.to_owned();
            filled += 1;
        }
        filled
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.bands.len(),
            "band index {index} out of range for {} bands",
            self.bands.len()
        );
    }
}
