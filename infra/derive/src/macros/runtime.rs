use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

/// Expands `#[shub_runtime::main]` (optionally with a profile argument)
/// into a synchronous `main` that builds the runtime and blocks on the body.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if let Err(err) = check_signature(&input) {
        return err;
    }

    let profile = match parse_profile(args) {
        Ok(profile) => profile,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = &input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #profile;
            let rt = ::shub_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async { #block })
        }
    }
}

fn check_signature(input: &ItemFn) -> Result<(), TokenStream> {
    if input.sig.asyncness.is_none() {
        return Err(Error::new_spanned(
            &input.sig.ident,
            "The #[shub_runtime::main] attribute can only be used on async functions",
        )
        .to_compile_error());
    }

    if !returns_result(&input.sig.output) {
        return Err(Error::new_spanned(
            &input.sig.output,
            "The #[shub_runtime::main] attribute requires a Result return type",
        )
        .to_compile_error());
    }

    Ok(())
}

fn parse_profile(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::shub_runtime::RuntimeConfig::default() });
    }

    let ident: syn::Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    match ident.to_string().as_str() {
        "high_performance" => Ok(quote! { ::shub_runtime::RuntimeConfig::high_performance() }),
        "memory_efficient" => Ok(quote! { ::shub_runtime::RuntimeConfig::memory_efficient() }),
        "default" => Ok(quote! { ::shub_runtime::RuntimeConfig::default() }),
        _ => Err(Error::new_spanned(
            ident,
            "Unknown runtime profile. Use: high_performance, memory_efficient, or default",
        )
        .to_compile_error()),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
