//! `bellagonia_core` is the core library for the `bellagonia` command line
//! tool. It wires the sibling stylesheet of a directive source into every
//! `directive(...)` call of that file, so the directive's runtime context
//! receives the stylesheet module without hand-written glue.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source file + id
//!   → Pipeline (extension / node_modules / directive-source glob filters)
//!   → FileResolver (finds `counter.module.css` next to `counter.ts`)
//!   → StyleRegistry (collects the stylesheet for the current build)
//!   → Rewriter
//!       → Import injector (`import * as $styles from './counter.module.css'`)
//!       → Call-site locator (every `directive(` in the file)
//!       → Argument-span parser (argument list + optional options object)
//!       → Options injector (`assign: { $styles }`), last call site first
//! ```
//!
//! The rewriter works on raw text with depth-tracked bracket scans rather
//! than a syntax tree. It does not understand strings, template literals or
//! comments: brackets inside them count towards nesting, and `directive(`
//! inside them is treated as a call.
//!
//! ## Modules
//!
//! - [`brackets`]: The depth-tracked bracket matcher every other scan uses.
//! - [`locator`]: Finding call sites of the directive function.
//! - [`arguments`]: Argument list and options object boundaries.
//! - [`inject`]: Editing or synthesizing the options object.
//! - [`imports`]: Adding the marker import.
//! - [`project`]: Running the build hook over a project on disk.
//!
//! ## Key Types
//!
//! - [`Rewriter`]: Rewrites one source text and reports what it did.
//! - [`Pipeline`]: The bundler-facing hook with filtering and stylesheet
//!   collection.
//! - [`StyleRegistry`]: Stylesheets collected during one build.
//! - [`BellagoniaConfig`]: Configuration loaded from `bellagonia.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use bellagonia_core::transform_directive;
//!
//! let code = transform_directive("directive('counter', fn)", "./counter.module.css");
//! assert_eq!(
//! 	code,
//! 	"import * as $styles from './counter.module.css'\ndirective('counter', fn, { assign: { \
//! 	 $styles } })"
//! );
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use filter::*;
pub use pipeline::*;
pub use project::*;
pub use registry::*;
pub use resolver::*;
pub use tags::*;

pub mod arguments;
pub mod brackets;
mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod filter;
pub mod imports;
pub mod inject;
pub mod locator;
mod pipeline;
pub mod project;
mod registry;
mod resolver;
mod tags;
