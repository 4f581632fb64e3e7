use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

/// Expands `#[shub_slice]`: the annotated struct becomes `{Name}Inner`, and
/// `{Name}` is regenerated as an Arc handle implementing `Deref` and
/// `FeatureSlice`.
pub fn expand_slice(input: ItemStruct) -> TokenStream {
    let handle = &input.ident;
    let inner = format_ident!("{handle}Inner");
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner #fields

        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #handle {
            inner: std::sync::Arc<#inner>,
        }

        impl #handle {
            pub fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #handle {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::shub_kernel::domain::registry::FeatureSlice for #handle {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}
