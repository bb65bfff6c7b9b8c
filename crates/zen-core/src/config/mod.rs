//! Engine configuration
//!
//! Settings come from an optional file found by walking up from the working
//! directory (see [`ConfigLoader::auto_discover`]). JSON, TOML and YAML are
//! accepted, all with camelCase keys:
//!
//! ```json
//! {
//!   "defaultProfile": "html",
//!   "fallbackProfile": "xhtml",
//!   "profilesDir": "./profiles",
//!   "maxNodes": 10000,
//!   "rangeReplace": "all"
//! }
//! ```

mod loader;
mod zen_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use zen_config::ZenConfig;
