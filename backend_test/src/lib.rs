use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one, inject dependencies,
/// and ensure that the scratch data directory is removed regardless of how the
/// test terminates.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// `crate::DataDir`, the root of the directory tree the server was built on.
///
/// By default the directory is populated with the fixture datasets before the
/// server is built. Pass `empty` (i.e. `#[backend_test(empty)]`) to build the
/// server on an empty directory instead.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the arguments to inject and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Decide whether to lay down the fixture datasets.
    let with_fixtures = match parse_macro_input!(args as Option<Ident>) {
        Some(arg) if arg == "empty" => false,
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `empty` or no argument")
                .into_compile_error()
                .into();
        }
        None => true,
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (rocket::local::asynchronous::Client, crate::DataDir) {
                let data_dir = crate::DataDir::random();
                if #with_fixtures {
                    crate::fixtures::populate(&data_dir).unwrap();
                } else {
                    std::fs::create_dir_all(&*data_dir).unwrap();
                }
                let rocket_client = rocket::local::asynchronous::Client::tracked(crate::rocket_for_data_dir(&data_dir))
                    .await
                    .unwrap();

                (rocket_client, data_dir)
            }

            /// The test itself.
            #item_fn

            /// Test cleanup.
            fn cleanup(data_dir: crate::DataDir) {
                std::fs::remove_dir_all(&*data_dir).unwrap();
            }

            // Create an async runtime. We need a separate one for inside and
            // outside the `catch_unwind`.
            let outer_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("test-setup")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            let inner_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            // Run the setup.
            let (rocket_client, data_dir) = outer_runtime.block_on(setup());

            // Run the test, catching any panics.
            // Use mutexes to safely transfer `!UnwindSafe` data.
            let client_mutex = std::sync::Mutex::new(rocket_client);
            let data_dir_mutex = std::sync::Mutex::new(data_dir.clone());
            let runtime_mutex = std::sync::Mutex::new(inner_runtime);
            let result = std::panic::catch_unwind(|| {
                let rocket_client = client_mutex.into_inner().unwrap();
                let data_dir = data_dir_mutex.into_inner().unwrap();
                let runtime = runtime_mutex.into_inner().unwrap();

                runtime.block_on(#new_name(#(#test_args),*));
            });

            // Run the cleanup.
            cleanup(data_dir);

            // If the test panicked, re-raise the panic.
            if let Err(cause) = result {
                std::panic::resume_unwind(cause);
            }
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_data_dir = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        } else if type_ident == "DataDir" {
                            if has_data_dir {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `DataDir`",
                                ));
                            }
                            has_data_dir = true;
                            args.push(quote! { data_dir });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client` or `dir_ident: DataDir`",
        ));
    }

    Ok(args)
}
