//! Derive macros for todosync action enums
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (intents/outcomes)
//!
//! # Example
//!
//! ```ignore
//! use todosync_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodolistAction {
//!     #[intent]
//!     CreateTodolist { request_id: RequestId, title: String },
//!
//!     #[outcome]
//!     TodolistCreated { request_id: RequestId, todolist: Todolist },
//! }
//!
//! // Generated methods:
//! assert!(action.is_intent());
//! assert_eq!(action.action_name(), "create_todolist");
//! assert_eq!(action.request_id(), Some(&id));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Type, Variant, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is a caller-issued intent
/// - `is_outcome()` - Returns true if this variant reports a finished operation
/// - `action_name()` - Returns the variant name in `snake_case`, for logs and metric labels
/// - `request_id()` - Returns the correlation id of variants with a named
///   `request_id` field (only generated when at least one variant has one)
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as an intent
/// - `#[outcome]` - Mark a variant as an outcome
///
/// # Errors
///
/// This macro produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[outcome]` attributes
/// - Two `request_id` fields have different types
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum TaskAction {
///     #[intent]
///     DeleteTask { request_id: RequestId, todolist_id: TodolistId, task_id: TaskId },
///
///     #[outcome]
///     TaskDeleted { request_id: RequestId, todolist_id: TodolistId, task_id: TaskId },
/// }
///
/// assert!(action.is_intent());
/// assert!(!action.is_outcome());
/// ```
#[proc_macro_derive(Action, attributes(intent, outcome))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_action(&input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    let mut is_intent_arms = Vec::new();
    let mut is_outcome_arms = Vec::new();
    let mut name_arms = Vec::new();
    let mut request_id_arms = Vec::new();
    let mut request_id_type: Option<&Type> = None;

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_outcome = has_attribute(&variant.attrs, "outcome");

        if is_intent && is_outcome {
            return Err(syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[outcome]",
            ));
        }

        let pattern = wildcard_pattern(variant);
        let action_name = snake_case(&variant.ident.to_string());

        is_intent_arms.push(quote! { #pattern => #is_intent, });
        is_outcome_arms.push(quote! { #pattern => #is_outcome, });
        name_arms.push(quote! { #pattern => #action_name, });

        match request_id_field(variant) {
            Some(field_ty) => {
                if let Some(existing) = request_id_type {
                    if quote!(#existing).to_string() != quote!(#field_ty).to_string() {
                        return Err(syn::Error::new_spanned(
                            field_ty,
                            "all `request_id` fields must share one type",
                        ));
                    }
                } else {
                    request_id_type = Some(field_ty);
                }
                let variant_name = &variant.ident;
                request_id_arms.push(quote! {
                    Self::#variant_name { request_id, .. } => ::core::option::Option::Some(request_id),
                });
            },
            None => request_id_arms.push(quote! { #pattern => ::core::option::Option::None, }),
        }
    }

    let request_id_impl = request_id_type.map(|ty| {
        quote! {
            /// Returns the correlation id carried by this action, if any
            #[must_use]
            pub const fn request_id(&self) -> ::core::option::Option<&#ty> {
                match self {
                    #(#request_id_arms)*
                }
            }
        }
    });

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns true if this action is an intent
            #[must_use]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#is_intent_arms)*
                }
            }

            /// Returns true if this action is an outcome
            #[must_use]
            pub const fn is_outcome(&self) -> bool {
                match self {
                    #(#is_outcome_arms)*
                }
            }

            /// Returns the `snake_case` name of this action's variant
            #[must_use]
            pub const fn action_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            #request_id_impl
        }
    })
}

/// Pattern matching any value of `variant`
fn wildcard_pattern(variant: &Variant) -> TokenStream2 {
    let variant_name = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#variant_name { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
        Fields::Unit => quote! { Self::#variant_name },
    }
}

/// Type of the named `request_id` field, if the variant has one
fn request_id_field(variant: &Variant) -> Option<&Type> {
    let Fields::Named(fields) = &variant.fields else {
        return None;
    };
    fields
        .named
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "request_id"))
        .map(|field| &field.ty)
}

/// `TodolistCreated` -> `todolist_created`
fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
