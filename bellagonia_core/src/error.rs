use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BellagoniaError {
	#[error(transparent)]
	#[diagnostic(code(bellagonia::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(bellagonia::config_parse),
		help("check that bellagonia.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("invalid directive source pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(bellagonia::invalid_glob),
		help("`*` matches within a path segment and `**` matches across segments")
	)]
	InvalidGlob { pattern: String, reason: String },

	#[error("invalid {role} identifier: `{value}`")]
	#[diagnostic(
		code(bellagonia::invalid_identifier),
		help("identifiers must match `[A-Za-z_$][A-Za-z0-9_$]*`")
	)]
	InvalidIdentifier { role: &'static str, value: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(bellagonia::file_too_large),
		help("increase `max_file_size` in bellagonia.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(bellagonia::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type BellagoniaResult<T> = Result<T, BellagoniaError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
