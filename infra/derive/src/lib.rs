#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros for the fstore workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! fstore-derive = { path = "../infra/derive" }
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a workspace error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]`, unless already derived.
/// * A `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for every variant with a `source` field (or a field marked
///   `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Every variant uses named fields. Variants wrapping a source error must carry a
/// `context: Option<Cow<'static, str>>` field. Violations are reported at compile time.
///
/// # Example
///
/// ```rust,ignore
/// use fstore_derive::fstore_error;
/// use std::borrow::Cow;
///
/// #[fstore_error]
/// pub enum IndexError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Entry missing{}: {message}", format_context(.context))]
///     Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &std::path::Path) -> Result<Vec<u8>, IndexError> {
///     std::fs::read(path).context("Loading index")
/// }
/// ```
#[proc_macro_attribute]
pub fn fstore_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
