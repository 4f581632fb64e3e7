#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the SurveyHub workspace: error enums with
//! call-site context, wire-policy DTOs, documented handlers, feature slice
//! handles, and the runtime entrypoint.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Entrypoint macro: turns `async fn main` into a synchronous `fn main` that
/// builds a profiled Tokio runtime and blocks on the body.
///
/// Profiles: `high_performance`, `memory_efficient`, or `default` (worker
/// count auto-detected).
///
/// ```rust,ignore
/// #[shub_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Wire-policy macro for API data models.
///
/// Adds the derives a DTO needs (`Debug`, `Serialize`, `Deserialize` when
/// missing, `utoipa::ToSchema` behind the `server` feature) and pins the
/// serde policy to `rename_all = "camelCase"` with `deny_unknown_fields`.
/// Override with `rename_all = "..."` or `deny_unknown_fields = false`.
///
/// ```rust,ignore
/// use shub_derive::api_model;
///
/// #[api_model]
/// pub struct SurveyDraft {
///     pub name: String,
///     pub email: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Handler macro bridging Axum and `OpenAPI` documentation.
///
/// Takes the usual `utoipa::path` arguments (`get`/`post`, `path = "..."`,
/// `request_body`, `responses(...)`, `tag = ...`) and applies them behind
/// the `server` feature, so client builds skip the documentation machinery.
///
/// ```rust,ignore
/// use shub_derive::api_handler;
///
/// #[api_handler(
///     post,
///     path = "/api/survey-responses",
///     responses((status = CREATED, body = SubmissionReceipt)),
///     tag = "Survey"
/// )]
/// pub async fn submit_handler() {}
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Error-enum macro wiring up the crate's error conventions.
///
/// Injects `#[derive(Debug, thiserror::Error)]` when missing, then
/// generates:
/// * a companion `{Name}Ext` trait adding `.context(...)` to any `Result`
///   whose error converts into this enum;
/// * `From<T>` for each variant carrying a `source` field (or a field
///   marked `#[source]`/`#[from]`), enabling plain `?`;
/// * `From<&'static str>` / `From<String>` when an `Internal` variant
///   exists.
///
/// Variants must use named fields; context-capable variants carry
/// `context: Option<Cow<'static, str>>`, and source-wrapping variants need
/// both a source and a context field.
///
/// ```rust,ignore
/// use shub_derive::shub_error;
/// use std::borrow::Cow;
///
/// #[shub_error]
/// pub enum SurveyError {
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database {
///         #[source]
///         source: surrealdb::Error,
///         context: Option<Cow<'static, str>>,
///     },
///     #[error("Internal survey error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn shub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Feature-slice macro.
///
/// Renames the annotated struct to `{Name}Inner` and generates `{Name}` as a
/// cheap-to-clone Arc handle that derefs to the inner state and implements
/// `FeatureSlice` for registration in the API state.
///
/// ```rust,ignore
/// #[shub_derive::shub_slice]
/// pub struct Survey {
///     pub repository: SurveyRepository,
/// }
///
/// fn init(repository: SurveyRepository) -> Survey {
///     Survey::new(SurveyInner { repository })
/// }
/// ```
#[proc_macro_attribute]
pub fn shub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
