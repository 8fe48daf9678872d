use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Expr, Ident, LitStr, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

/// Key of a single entry: either a bare identifier (`prod`) or a string literal
/// (`"eu-west"`) for names that are not valid Rust identifiers.
enum EntryKey {
    Ident(Ident),
    Str(LitStr),
}

impl EntryKey {
    fn to_name(&self) -> String {
        match self {
            EntryKey::Ident(i) => i.to_string(),
            EntryKey::Str(s) => s.value(),
        }
    }
}

/// Parsed entry: `<key> => <value>`
struct Entry {
    key: EntryKey,
    _arrow: Token![=>],
    value: Expr,
}

impl Parse for Entry {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let key = if input.peek(LitStr) {
            EntryKey::Str(input.parse()?)
        } else {
            // `parse_any` also accepts keywords such as `default`
            EntryKey::Ident(input.call(Ident::parse_any)?)
        };
        let _arrow = input.parse()?;
        let value = input.parse()?;
        Ok(Self { key, _arrow, value })
    }
}

struct MacroInput {
    entries: Punctuated<Entry, Token![,]>,
}

impl Parse for MacroInput {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        Ok(Self {
            entries: Punctuated::parse_terminated(input)?,
        })
    }
}

/// Build an `envsmart::EnvValues` map of environment or group name to value, e.g.
/// `env_values!(default => 7, g_dev => 2, dev1 => 1)`. Keys are identifiers (keywords
/// included) or string literals. The macro is re-exported as `envsmart::env_values`, whose
/// crate docs carry a runnable example.
#[proc_macro]
pub fn env_values(item: TokenStream) -> TokenStream {
    let MacroInput { entries } = parse_macro_input!(item as MacroInput);

    let mut seen = Vec::new();
    let mut inserts: Vec<TokenStream2> = Vec::new();
    for entry in entries.iter() {
        let name = entry.key.to_name();
        if seen.contains(&name) {
            let span = match &entry.key {
                EntryKey::Ident(i) => i.span(),
                EntryKey::Str(s) => s.span(),
            };
            return syn::Error::new(span, format!("`{name}` is given more than once"))
                .to_compile_error()
                .into();
        }
        seen.push(name.clone());

        let value = &entry.value;
        inserts.push(quote!( values.insert(::std::string::String::from(#name), #value); ));
    }

    quote!({
        let mut values = ::envsmart::EnvValues::new();
        #(#inserts)*
        values
    })
    .into()
}
