//! Markup value model.
//!
//! The values a template position may hold:
//!
//! - [`Markup`]: trusted, already escaped HTML, never escaped again
//! - [`Child`]: the tagged union interpolated into templates
//! - [`Attributes`] / [`AttrValue`]: attribute bags, also used as component [`Props`]
//! - [`Component`]: an async function from props to a child

mod attributes;
mod child;
mod definition;
mod markup;

pub use attributes::{AttrValue, Attributes, Props};
pub use child::{Child, DeferredChild};
pub use definition::{Component, ComponentFuture};
pub use markup::{Markup, trusted};

pub(crate) use attributes::{CHILDREN_KEY, format_number};
