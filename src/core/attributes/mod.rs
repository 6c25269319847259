mod attribute;
mod nominal_attribute;
mod numeric_attribute;

pub use attribute::Attribute;
pub use nominal_attribute::{NominalAttribute, compare_labels};
pub use numeric_attribute::NumericAttribute;
