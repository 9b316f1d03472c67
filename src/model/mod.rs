//! Types that represent the loaded data, such as `Dataset`, `Series` and `Amount`, along with the
//! grouped views the charts are drawn from.
mod amount;
mod dataset;
mod mapping;
mod value;
mod views;

pub use amount::{Amount, AmountError};
pub use dataset::{Dataset, Series, DISCLOSURE_DATE, YEAR};
pub use mapping::{Header, Mapping, MappingError};
pub use value::{ColumnKind, Value};

/// The column holding the board-approved IFC investment, in millions of USD.
pub const AMOUNT: &str = "total_inversion_ifc_aprobada_junta_millones_usd";
/// The industry of the project.
pub const INDUSTRY: &str = "industria";
/// The environmental category of the project.
pub const ENVIRONMENTAL_CATEGORY: &str = "categoria_ambiental";
/// The country of the project.
pub const COUNTRY: &str = "pais";
/// The project status.
pub const STATUS: &str = "estado";
