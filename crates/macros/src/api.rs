use proc_macro2::{Span, TokenStream};
use syn::{Ident, Lit, Meta, NestedMeta, spanned::Spanned};
use synstructure::{BindingInfo, Structure, VariantInfo};

/// Parsed contents of a single `#[api(...)]` attribute.
#[derive(Default)]
struct ApiMeta {
    /// `#[api(internal)]` — an error which must never be reported to the
    /// user in detail.
    internal: bool,
    /// `#[api(code = "...")]`.
    code: Option<Lit>,
    /// `#[api(status = "...")]`, named after a `StatusCode` constant.
    status: Option<Ident>,
}

pub fn derive_error(s: Structure) -> TokenStream {
    let mut statuses = Vec::new();
    let mut codes = Vec::new();

    for variant in s.variants() {
        let pat = variant.pat();

        match variant_meta(variant) {
            Ok(Some(meta)) => {
                let status = meta.status.map_or_else(
                    || quote!(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
                    |status| quote!(actix_web::http::StatusCode::#status),
                );
                let code = meta.code.map_or_else(
                    || quote!(None),
                    |code| quote!(Some(Cow::Borrowed(#code))),
                );
                statuses.push(quote!(#pat => #status,));
                codes.push(quote!(#pat => #code,));
            }
            // No #[api] attribute: delegate to the #[cause] field.
            Ok(None) => match variant.bindings().iter().find(is_cause) {
                Some(cause) => {
                    statuses.push(quote!(#pat => #cause.status(),));
                    codes.push(quote!(#pat => #cause.code(),));
                }
                None => {
                    let err = error(
                        variant.ast().ident.span(),
                        "each variant must be #[api]-annotated or have \
                         a #[cause]",
                    );
                    statuses.push(err.clone());
                    codes.push(err);
                }
            },
            Err(err) => {
                statuses.push(err.clone());
                codes.push(err);
            }
        }
    }

    s.gen_impl(quote! {
        extern crate actix_web;
        use std::borrow::Cow;

        gen impl ApiError for @Self {
            fn status(&self) -> actix_web::http::StatusCode {
                match *self { #(#statuses)* }
            }

            fn code(&self) -> Option<Cow<str>> {
                match *self { #(#codes)* }
            }
        }
    })
}

/// Find and parse this variant's `#[api(...)]` attribute. `Ok(None)` means
/// the variant carries no such attribute.
fn variant_meta(v: &VariantInfo) -> Result<Option<ApiMeta>, TokenStream> {
    let mut attrs = v.ast().attrs.iter()
        .filter_map(|attr| attr.parse_meta().ok())
        .filter(|meta| meta.path().is_ident("api"));

    let meta = match attrs.next() {
        Some(meta) => meta,
        None => return Ok(None),
    };

    if let Some(extra) = attrs.next() {
        return Err(error(
            extra.span(), "api attribute must be used exactly once"));
    }

    let list = match meta {
        Meta::List(list) => {
            if list.nested.is_empty() {
                return Err(error(
                    list.span(), "api attribute requires at least one argument"));
            }
            list
        }
        _ => return Err(error(
            meta.span(), "api attribute must take a list in parentheses")),
    };

    let span = list.span();
    let mut api = ApiMeta::default();

    for item in list.nested {
        match item {
            NestedMeta::Meta(Meta::Path(ref path))
            if path.is_ident("internal") =>
                api.internal = true,
            NestedMeta::Meta(Meta::NameValue(ref nv))
            if nv.path.is_ident("code") =>
                api.code = Some(nv.lit.clone()),
            NestedMeta::Meta(Meta::NameValue(ref nv))
            if nv.path.is_ident("status") =>
                api.status = Some(match nv.lit {
                    Lit::Str(ref s) => Ident::new(&s.value(), s.span()),
                    _ => return Err(error(nv.lit.span(), "expected a string")),
                }),
            _ => return Err(error(
                item.span(), "expected one of: internal, code, status")),
        }
    }

    if api.internal && (api.code.is_some() || api.status.is_some()) {
        return Err(error(span, "internal errors can't have codes or statuses"));
    }

    Ok(Some(api))
}

fn is_cause(bi: &&BindingInfo) -> bool {
    bi.ast()
        .attrs
        .iter()
        .filter_map(|attr| attr.parse_meta().ok())
        .any(|meta| meta.path().is_ident("cause"))
}

fn error(span: Span, message: &str) -> TokenStream {
    quote_spanned! { span =>
        compile_error!(#message);
    }
}
