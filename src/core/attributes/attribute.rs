pub trait Attribute: Send + Sync {
    fn name(&self) -> &str;

    /// One-line description used when printing a dataset header.
    fn summary(&self) -> String;
}
