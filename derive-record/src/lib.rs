use proc_macro;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Data, Field, Fields, Ident, LitStr, Visibility};

/// Derive `Record` for a struct with named fields.  Only `pub` fields are part of the record,
/// and each of them must implement `RecordField`; other fields are left alone.
/// Like the other derives in this workspace, the generated impl refers to `Record` and
/// `RecordField` unqualified, so both must be in scope at the use site.
#[proc_macro_derive(Record)]
pub fn derive_record(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let name_str = LitStr::new(&name.to_string(), name.span());

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let s = match input.data {
        Data::Struct(ref s) => s,
        _ => panic!("#[derive(Record)] is supported only on structs"),
    };

    let field_idents = match s.fields {
        Fields::Named(ref fs) => fs.named.iter()
            .filter(|f| is_public(f))
            .map(|f| f.ident.clone().expect("named field has no name?"))
            .collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => panic!("#[derive(Record)] requires named fields"),
    };
    let field_strs = field_idents.iter().map(field_name).collect::<Vec<_>>();

    let result = quote! {
        impl #impl_generics Record for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #name_str
            }

            fn fields(&self) -> Vec<(&'static str, &dyn RecordField)> {
                vec![
                    #( (#field_strs, &self.#field_idents as &dyn RecordField), )*
                ]
            }

            fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn RecordField)> {
                vec![
                    #( (#field_strs, &mut self.#field_idents as &mut dyn RecordField), )*
                ]
            }
        }
    };
    //eprintln!("result: {}", result);
    result.into()
}

fn is_public(f: &Field) -> bool {
    match f.vis {
        Visibility::Public(_) => true,
        _ => false,
    }
}

/// The field name as it appears in generated Lean code.  Raw identifiers lose their `r#`.
fn field_name(ident: &Ident) -> TokenStream {
    let s = ident.to_string();
    let s = s.strip_prefix("r#").unwrap_or(&s);
    let lit = LitStr::new(s, ident.span());
    quote! { #lit }
}
