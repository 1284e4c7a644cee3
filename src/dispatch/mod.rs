//! Request dispatching on top of the middleware chain.
//!
//! This module provides:
//! - The dispatcher itself ([`Dispatcher`])
//! - Supported verbs ([`Verb`])
//! - Per-request options and POST payloads ([`RequestOptions`], [`PostData`], [`Body`])
//! - Content-type driven body decoding ([`unwrap_response`], [`Unwrapped`])
//! - Error types ([`RequestError`], [`DecodeError`])

mod dispatcher;
mod error;
mod options;
mod unwrap;
mod verb;

#[cfg(test)]
mod verb_tests;

pub use dispatcher::Dispatcher;
pub use error::{DecodeError, RequestError};
pub use options::{Body, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, PostData, RequestOptions};
pub use unwrap::{Unwrapped, XML_ATTRIBUTES_KEY, XML_TEXT_KEY, unwrap_response, xml_to_json};
pub use verb::Verb;
