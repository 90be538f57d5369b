use proc_macro::TokenStream;
use quote::quote;
use syn::{braced, parse::Parse, parse_macro_input, punctuated::Punctuated, token::Comma, Ident, LitStr, Token};

/// One `CODE => { message: "..." }` entry in a `diagnostics!` table.
struct Entry {
    code: Ident,
    _arrow: Token![=>],
    _brace_token: syn::token::Brace,
    message: LitStr,
}

impl Parse for Entry {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let code: Ident = input.parse()?;
        let _arrow: Token![=>] = input.parse()?;
        let content;
        let _brace_token = braced!(content in input);

        let mut message: Option<LitStr> = None;
        while !content.is_empty() {
            let field: Ident = content.parse()?;
            let _: Token![:] = content.parse()?;
            match field.to_string().as_str() {
                "message" => {
                    let lit: LitStr = content.parse()?;
                    message = Some(lit);
                }
                _ => {
                    let _ = content.parse::<syn::Expr>()?;
                }
            }
            let _ = content.parse::<Comma>();
        }
        let message = message.ok_or_else(|| syn::Error::new(code.span(), "missing `message` for diagnostic"))?;
        Ok(Entry { code, _arrow, _brace_token, message })
    }
}

struct Spec {
    entries: Punctuated<Entry, Comma>,
}

impl Parse for Spec {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let entries = Punctuated::<Entry, Comma>::parse_terminated(input)?;
        Ok(Spec { entries })
    }
}

/// Builds the `DiagnosticCode` enum plus `as_str`/`default_message`/`severity`/`category`
/// inherent methods from a table of `WE#### => { message: "..." }` / `WW#### => { .. }`
/// entries. Severity and category both derive from the code's prefix/number range so the
/// table only has to state the message once per code.
#[proc_macro]
pub fn diagnostics(input: TokenStream) -> TokenStream {
    let Spec { entries } = parse_macro_input!(input as Spec);

    let mut enum_variants = Vec::new();
    let mut as_str_arms = Vec::new();
    let mut default_msg_arms = Vec::new();
    let mut severity_arms = Vec::new();
    let mut category_arms = Vec::new();

    for e in entries.iter() {
        let code_ident = &e.code;
        let code_str = code_ident.to_string();
        let msg = &e.message;
        enum_variants.push(quote! { #code_ident });
        as_str_arms.push(quote! { DiagnosticCode::#code_ident => #code_str });
        default_msg_arms.push(quote! { DiagnosticCode::#code_ident => #msg });

        if code_str.starts_with("WW") {
            severity_arms.push(quote! { DiagnosticCode::#code_ident => DiagnosticSeverity::Warning });
        } else {
            severity_arms.push(quote! { DiagnosticCode::#code_ident => DiagnosticSeverity::Error });
        }

        let category = if code_str.starts_with("WE01") || code_str.starts_with("WW01") {
            quote! { DiagnosticCategory::Syntax }
        } else if code_str.starts_with("WE02") || code_str.starts_with("WW02") {
            quote! { DiagnosticCategory::Name }
        } else if code_str.starts_with("WE03") || code_str.starts_with("WW03") {
            quote! { DiagnosticCategory::Type }
        } else if code_str.starts_with("WE04") || code_str.starts_with("WW04") {
            quote! { DiagnosticCategory::Attribute }
        } else if code_str.starts_with("WE05") || code_str.starts_with("WW05") {
            quote! { DiagnosticCategory::Ordinal }
        } else if code_str.starts_with("WE06") || code_str.starts_with("WW06") {
            quote! { DiagnosticCategory::Layout }
        } else {
            quote! { DiagnosticCategory::Configuration }
        };
        category_arms.push(quote! { DiagnosticCode::#code_ident => #category });
    }

    let out = quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum DiagnosticCode { #( #enum_variants, )* }

        impl DiagnosticCode {
            pub fn as_str(&self) -> &'static str {
                match self { #( #as_str_arms, )* }
            }
            pub fn default_message(&self) -> &'static str {
                match self { #( #default_msg_arms, )* }
            }
            pub fn severity(&self) -> DiagnosticSeverity {
                match self { #( #severity_arms, )* }
            }
            pub fn category(&self) -> DiagnosticCategory {
                match self { #( #category_arms, )* }
            }
        }
    };

    out.into()
}
