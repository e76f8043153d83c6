pub mod loader;
pub mod narrative;
pub mod overlay;

pub use loader::{
    effective_ruleset, load_rules_config, read_rules_config, resolve_rules_config, PolicyError,
};
pub use narrative::NarrativeLinter;
pub use overlay::{deep_merge, load_for_client};
