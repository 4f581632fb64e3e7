use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, ItemFn, ItemStruct, Lit, LitStr, Meta};

/// Expands the `#[api_model]` attribute macro.
///
/// Adds the common derives (`Serialize`, `Deserialize`, `ToSchema`) and pins
/// the wire policy to camelCase with strict field checking.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let (rename_all, deny_unknown) = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let derives = existing_derives(&input.attrs);
    let (existing_rename, existing_deny) = match existing_serde_policy(&input.attrs) {
        Ok(policy) => policy,
        Err(err) => return err,
    };

    let mut derive_tokens = Vec::new();
    if !derives.contains("Debug") {
        derive_tokens.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        derive_tokens.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        derive_tokens.push(quote! { ::serde::Deserialize });
    }
    let derive_attr = if derive_tokens.is_empty() {
        quote! {}
    } else {
        quote! { #[derive(#(#derive_tokens),*)] }
    };

    let schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_value = rename_all
        .unwrap_or_else(|| LitStr::new("camelCase", proc_macro2::Span::call_site()));
    let rename_attr = match &existing_rename {
        Some(existing) if existing.value() != rename_value.value() => {
            return syn::Error::new_spanned(
                existing,
                "Conflicting serde rename_all; remove it or set api_model(rename_all = \"...\") to match",
            )
            .to_compile_error();
        },
        Some(_) => quote! {},
        None => quote! { #[serde(rename_all = #rename_value)] },
    };

    let deny = deny_unknown.unwrap_or(true);
    let deny_attr = if existing_deny {
        if !deny {
            return syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            )
            .to_compile_error();
        }
        quote! {}
    } else if deny {
        quote! { #[serde(deny_unknown_fields)] }
    } else {
        quote! {}
    };

    quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    }
}

/// Expands the `#[api_handler]` attribute macro.
///
/// Registers handler metadata with `utoipa::path` while leaving the handler
/// signature untouched.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let body = &input.block;
    let sig = &input.sig;
    let vis = &input.vis;
    let attrs = &input.attrs;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig {
            #body
        }
    }
}

type ApiModelArgs = (Option<LitStr>, Option<bool>);

fn parse_args(args: TokenStream) -> Result<ApiModelArgs, TokenStream> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let metas = parser.parse2(args).map_err(|err| err.to_compile_error())?;

    let mut rename_all = None;
    let mut deny_unknown = None;

    for meta in metas {
        let Meta::NameValue(nv) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "Expected name-value arguments like `rename_all = \"...\"`",
            )
            .to_compile_error());
        };

        if nv.path.is_ident("rename_all") {
            if rename_all.is_some() {
                return Err(syn::Error::new_spanned(&nv, "Duplicate argument").to_compile_error());
            }
            rename_all = Some(string_literal(&nv, "rename_all")?);
        } else if nv.path.is_ident("deny_unknown_fields") {
            if deny_unknown.is_some() {
                return Err(syn::Error::new_spanned(&nv, "Duplicate argument").to_compile_error());
            }
            deny_unknown = Some(bool_literal(&nv, "deny_unknown_fields")?);
        } else {
            return Err(syn::Error::new_spanned(
                nv.path,
                "Unsupported argument; expected rename_all or deny_unknown_fields",
            )
            .to_compile_error());
        }
    }

    Ok((rename_all, deny_unknown))
}

fn string_literal(nv: &syn::MetaNameValue, label: &str) -> Result<LitStr, TokenStream> {
    if let syn::Expr::Lit(expr) = &nv.value
        && let Lit::Str(lit) = &expr.lit
    {
        return Ok(lit.clone());
    }
    Err(syn::Error::new_spanned(&nv.value, format!("{label} must be a string literal"))
        .to_compile_error())
}

fn bool_literal(nv: &syn::MetaNameValue, label: &str) -> Result<bool, TokenStream> {
    if let syn::Expr::Lit(expr) = &nv.value
        && let Lit::Bool(lit) = &expr.lit
    {
        return Ok(lit.value);
    }
    Err(syn::Error::new_spanned(&nv.value, format!("{label} must be a boolean literal"))
        .to_compile_error())
}

fn existing_derives(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.segments.last().map(|seg| seg.ident.to_string()) {
                traits.insert(ident);
            }
            Ok(())
        });
    }
    traits
}

fn existing_serde_policy(attrs: &[Attribute]) -> Result<(Option<LitStr>, bool), TokenStream> {
    let mut rename_all = None;
    let mut deny_unknown = false;

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let res = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rename_all = Some(lit);
            } else if meta.path.is_ident("deny_unknown_fields") {
                deny_unknown = true;
            }
            Ok(())
        });
        if let Err(err) = res {
            return Err(err.to_compile_error());
        }
    }

    Ok((rename_all, deny_unknown))
}
