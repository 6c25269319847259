use crate::core::attributes::Attribute;

#[derive(Clone, Debug, PartialEq)]
pub struct NumericAttribute {
    pub name: String,
}

impl NumericAttribute {
    pub fn new(name: impl Into<String>) -> NumericAttribute {
        NumericAttribute { name: name.into() }
    }
}

impl Attribute for NumericAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} numeric", self.name)
    }
}
