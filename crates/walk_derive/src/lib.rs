use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{Data, DeriveInput, Field, Fields, Index, parse_macro_input, spanned::Spanned};

/// Derives `crate::walk::WalkChildren`, visiting every field in declaration
/// order. Fields marked `#[walk(skip)]` are not visited.
#[proc_macro_derive(Walk, attributes(walk))]
pub fn derive_walk(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let (walk_body, walk_mut_body) = match generate_bodies(&input.data) {
        Ok(bodies) => bodies,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl crate::walk::WalkChildren for #name {
            #[inline]
            fn walk_children<V: crate::walk::Visitor + ?Sized>(&self, v: &mut V) {
                #walk_body
            }

            #[inline]
            fn walk_children_mut<V: crate::walk::VisitorMut + ?Sized>(&mut self, v: &mut V) {
                #walk_mut_body
            }
        }
    };

    expanded.into()
}

fn is_skipped(field: &Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path().is_ident("walk")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|arg| arg == "skip")
    })
}

fn generate_bodies(
    data: &Data,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    match data {
        Data::Struct(data_struct) => Ok((
            generate_fields_walk(&data_struct.fields, false),
            generate_fields_walk(&data_struct.fields, true),
        )),
        Data::Enum(data_enum) => {
            let arms: Vec<_> = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields, false))
                .collect();
            let arms_mut: Vec<_> = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields, true))
                .collect();

            Ok((
                quote! { match self { #(#arms)* } },
                quote! { match self { #(#arms_mut)* } },
            ))
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "Walk cannot be derived for unions",
        )),
    }
}

fn walk_call(target: proc_macro2::TokenStream, mutable: bool) -> proc_macro2::TokenStream {
    if mutable {
        quote! { crate::walk::Walk::walk_mut(#target, v); }
    } else {
        quote! { crate::walk::Walk::walk(#target, v); }
    }
}

fn generate_fields_walk(fields: &Fields, mutable: bool) -> proc_macro2::TokenStream {
    let calls = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !is_skipped(field))
        .map(|(i, field)| {
            let member = match &field.ident {
                Some(ident) => quote! { #ident },
                None => {
                    let index = Index::from(i);
                    quote! { #index }
                }
            };
            let target = if mutable {
                quote! { &mut self.#member }
            } else {
                quote! { &self.#member }
            };
            walk_call(target, mutable)
        });

    quote! { #(#calls)* }
}

fn generate_variant_arm(
    variant_name: &syn::Ident,
    fields: &Fields,
    mutable: bool,
) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! { Self::#variant_name => {} },
        Fields::Named(named) => {
            let bindings: Vec<_> = named
                .named
                .iter()
                .filter(|f| !is_skipped(f))
                .filter_map(|f| f.ident.as_ref())
                .collect();
            let calls = bindings.iter().map(|b| walk_call(quote! { #b }, mutable));

            quote! {
                Self::#variant_name { #(#bindings,)* .. } => {
                    #(#calls)*
                }
            }
        }
        Fields::Unnamed(unnamed) => {
            let mut patterns = Vec::new();
            let mut calls = Vec::new();
            for (i, field) in unnamed.unnamed.iter().enumerate() {
                if is_skipped(field) {
                    patterns.push(quote! { _ });
                } else {
                    let var = format_ident!("f{}", i);
                    calls.push(walk_call(quote! { #var }, mutable));
                    patterns.push(quote! { #var });
                }
            }

            quote! {
                Self::#variant_name(#(#patterns),*) => {
                    #(#calls)*
                }
            }
        }
    }
}
