pub mod area;
pub mod error;
pub mod model;
pub mod outcome;
pub mod validation;

pub use area::{filter_areas, get_areas, map_area_colors, AreaColors, AreaSelector, LayoutArea};
pub use error::{ParsingError, ParsingErrorKind};
pub use model::{format_number, LayoutFormula, LayoutSpan, LayoutValue, Unit, TEXT_SPAN_TYPE};
pub use outcome::ParseOutcome;
pub use validation::{validate_formula_size, ValidationErrors};
