pub mod types;
pub mod vector3;
pub mod error;
pub mod settings;
pub mod element_table;
pub mod bounding_box;
pub mod uniform_grid;
pub mod proximity;
pub mod bond_builder;

pub use bond_builder::{infer_bonds, BondBuilder};
pub use bounding_box::BoundingBox;
pub use element_table::{ElementRecord, ElementTable};
pub use error::{BondError, GridError, SettingsError};
pub use proximity::ProximityIter;
pub use settings::Settings;
pub use types::{AtomRecord, Bond, BondCandidate, BondResults};
pub use uniform_grid::{GridCell, UniformGrid, MAX_CELLS};
