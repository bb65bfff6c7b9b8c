//! Zen Core
//!
//! Abbreviation expansion engine. An abbreviation such as `ul#nav>li.item$*3`
//! is tokenized, built into a node tree, rendered with an output profile and
//! finally stripped of its caret placeholder:
//!
//! ```
//! use zen_core::Engine;
//!
//! let engine = Engine::new();
//! let result = engine.expand_abbreviation("p.note", "html").unwrap();
//! assert_eq!(result.text, r#"<p class="note"></p>"#);
//! assert_eq!(result.caret, Some(16));
//! ```
//!
//! [`Engine`] also wraps selected text and manages profiles; [`Session`]
//! carries a caller's active profile on top of a shared engine.

pub mod builder;
pub mod caret;
pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod numbering;
pub mod profile;
pub mod render;
pub mod result;
pub mod tree;
pub mod wrap;

// Re-export commonly used types
pub use builder::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Limits, build, build_with_limits};
pub use caret::{CARET_PLACEHOLDER, RangeReplace, resolve_caret, resolve_caret_with};
pub use config::{ConfigLoader, ZenConfig};
pub use engine::{Engine, EngineOptions, Expansion, RenderResult, Session};
pub use error::{BuildErrorKind, ErrorKind, ParseErrorKind, ZenError};
pub use extract::extract_abbreviation;
pub use lexer::{Token, TokenKind, tokenize};
pub use profile::{
    BUILTIN_PROFILES, Case, LineBreaks, Profile, ProfileRegistry, QuoteStyle, SelfClosingStyle,
};
pub use render::render;
pub use result::Result;
pub use tree::{Node, NodeKind, Repetition};
pub use wrap::wrap;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zen=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
