pub mod advisor;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod sections;

pub use advisor::{ActionItems, AdvisorError, AdvisorService};
pub use sections::{ParsedSections, SectionMarker, SectionParser};
