//! Expansion of `#[views]`.
//!
//! The annotated module is the whole compilation unit: its top-level structs
//! and inherent `impl` blocks form the type model, views are generated into
//! the module itself, and diagnostics are attached to the bearer that caused
//! them. Errors become `compile_error!` invocations; warnings are surfaced
//! through a deprecated constant so they show up as compiler warnings.

use camino::Utf8PathBuf;
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::{LitStr, parse::Parser};
use view_synth_core::{
    Diagnostic, Engine, EngineConfig, GeneratedNames, MemorySink, RustRenderer, Severity,
    SourceUnit, ViewError, strip_helper_attrs,
};

/// Arguments accepted by `#[views(...)]`.
#[derive(Debug, Default)]
struct Options {
    suffix: Option<String>,
    runtime: Option<syn::Path>,
}

impl Options {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut options = Self::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("suffix") {
                options.suffix = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("runtime") {
                options.runtime = Some(meta.value()?.parse::<syn::Path>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported views option; expected `suffix` or `runtime`"))
            }
        });
        parser.parse2(args)?;
        Ok(options)
    }

    fn apply(self, mut config: EngineConfig) -> EngineConfig {
        if let Some(suffix) = self.suffix {
            config.view_suffix = suffix;
        }
        if let Some(runtime) = self.runtime {
            config.runtime_crate = quote!(#runtime).to_string();
        }
        config
    }
}

pub(crate) fn views(args: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let options = Options::parse(args)?;
    let mut module: syn::ItemMod = syn::parse2(item)?;
    let config = options.apply(package_config()?);
    expand_module(&mut module, &config)
}

/// Settings of the package being compiled, or the defaults outside cargo.
fn package_config() -> syn::Result<EngineConfig> {
    let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return Ok(EngineConfig::default());
    };
    EngineConfig::load(&Utf8PathBuf::from(dir)).map_err(|err| call_site_error(&err))
}

fn call_site_error(err: &ViewError) -> syn::Error {
    syn::Error::new(Span::call_site(), err.to_string())
}

fn expand_module(module: &mut syn::ItemMod, config: &EngineConfig) -> syn::Result<TokenStream> {
    let Some((_, items)) = &mut module.content else {
        return Err(syn::Error::new_spanned(
            &module.ident,
            "#[views] requires an inline module body",
        ));
    };
    let scope = vec![module.ident.unraw().to_string()];
    let unit = SourceUnit::from_items(&scope, items)?;
    check_gen_modules(&unit, &scope)?;

    let engine = Engine::new(config.clone()).map_err(|err| call_site_error(&err))?;
    let renderer = RustRenderer::from_config(config).map_err(|err| call_site_error(&err))?;
    let mut sink = MemorySink::default();
    let report = engine.run(
        &unit.model,
        &unit.bearers,
        &mut GeneratedNames::default(),
        &renderer,
        &mut sink,
    );

    let diagnostics: Vec<TokenStream> = report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic_tokens(&unit, diagnostic))
        .collect();
    strip_helper_attrs(items);
    let generated = sink.into_tokens();
    items.push(syn::Item::Verbatim(quote! {
        #generated
        #(#diagnostics)*
    }));
    Ok(quote!(#module))
}

/// Views and meta types generated by the macro can only live in the annotated module.
fn check_gen_modules(unit: &SourceUnit, scope: &[String]) -> syn::Result<()> {
    for bearer in &unit.bearers {
        let misplaced = bearer
            .requests
            .iter()
            .filter_map(|request| request.gen_module.as_deref())
            .chain(
                bearer
                    .metas
                    .iter()
                    .filter_map(|meta| meta.gen_module.as_deref()),
            )
            .any(|module| module != scope);
        if misplaced {
            return Err(syn::Error::new(
                unit.span_of(&bearer.name),
                format!(
                    "gen_module must name the annotated module `{}`; use the build-script \
                     generator to place views elsewhere",
                    scope.join("::")
                ),
            ));
        }
    }
    Ok(())
}

fn diagnostic_tokens(unit: &SourceUnit, diagnostic: &Diagnostic) -> TokenStream {
    let span = diagnostic
        .origin
        .as_ref()
        .map_or_else(Span::call_site, |origin| unit.span_of(origin));
    let message = &diagnostic.message;
    match diagnostic.severity {
        Severity::Error => syn::Error::new(span, message).into_compile_error(),
        Severity::Warning => quote_spanned! {span=>
            const _: () = {
                #[deprecated(note = #message)]
                const VIEW_SYNTH_WARNING: () = ();
                VIEW_SYNTH_WARNING
            };
        },
    }
}
