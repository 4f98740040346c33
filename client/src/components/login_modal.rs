//! Sign-in dialog offering the Google OAuth redirect.

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::Session;

use crate::app::AppStore;

#[component]
pub fn LoginModal(on_close: Callback<()>) -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let session = expect_context::<RwSignal<Session>>();

    let close = {
        let store = Arc::clone(&store);
        Callback::new(move |()| {
            store.clear_error();
            on_close.run(());
        })
    };
    let on_google = move |_| {
        if session.get_untracked().loading {
            return;
        }
        store.login_with_google_redirect();
        on_close.run(());
    };
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            close.run(());
        }
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| close.run(())>
            <div
                class="dialog dialog--login"
                on:click=move |ev| ev.stop_propagation()
                on:keydown=on_keydown
                tabindex="0"
            >
                <div class="dialog__header">
                    <h2>"Sign in"</h2>
                    <button class="btn dialog__close" on:click=move |_| close.run(()) title="Close">"×"</button>
                </div>
                <p class="dialog__subtitle">"Sign in to manage your profile and orders."</p>

                <Show when=move || session.get().error.is_some()>
                    <p class="dialog__error">{move || session.get().error.unwrap_or_default()}</p>
                </Show>

                <button class="btn btn--google" disabled=move || session.get().loading on:click=on_google>
                    {move || if session.get().loading { "Signing in…" } else { "Continue with Google" }}
                </button>
            </div>
        </div>
    }
}
