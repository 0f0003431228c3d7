pub mod axis_transform;
pub mod band;
pub mod band_list;

pub use axis_transform::{AxisTick, AxisTransform, CustomTickScale};
pub use band::{Band, BandLimits, MAX_BANDS, MAX_RANGE};
pub use band_list::{BandEdit, BandList, EditOutcome, EditRejection};
