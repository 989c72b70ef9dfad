pub mod catalog;
pub mod health;
pub mod hosts;
pub mod notifications;
pub mod runs;
pub mod templates;

// Re-export handler functions
pub use catalog::*;
pub use health::*;
pub use hosts::*;
pub use notifications::*;
pub use runs::*;
pub use templates::*;

use serde::Deserialize;

/// `?type=` filter shared by the template and file listings
#[derive(Debug, Default, Deserialize)]
pub struct TypeFilter {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TypeFilter {
    /// The filter value, treating an empty parameter as absent
    pub fn value(&self) -> Option<&str> {
        self.kind.as_deref().filter(|k| !k.is_empty())
    }
}
