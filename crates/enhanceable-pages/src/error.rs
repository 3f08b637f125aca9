//! Render-time error type.

/// Errors that abort a template evaluation or a render.
///
/// All variants are authoring or configuration mistakes; none of them is
/// retried, and a failed render never yields partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
	/// A closing component marker was found with no open component frame.
	#[error("unmatched closing tag")]
	UnmatchedClosingTag,

	/// A handler was used as an attribute value where no function registry exists.
	#[error("functions not allowed in attributes in this environment (attribute `{attribute}`)")]
	FunctionsNotAllowed {
		/// The offending attribute name
		attribute: String,
	},

	/// An operation required an active render context.
	#[error("render context not found")]
	ContextNotFound,

	/// A behaviour name was requested from a local client module that does not define it.
	#[error("unknown enhancement `{name}`")]
	UnknownEnhancement {
		/// The requested behaviour name
		name: String,
	},

	/// Registering this binding would map one id to two functions or one function to two ids.
	#[error("function registry conflict for id `{id}`")]
	RegistryConflict {
		/// The conflicting id
		id: String,
	},

	/// A component reported its own failure.
	#[error("component failed: {0}")]
	Component(String),
}

impl RenderError {
	/// Creates a component-authored error.
	pub fn component(msg: impl Into<String>) -> Self {
		Self::Component(msg.into())
	}
}
