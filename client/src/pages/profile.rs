//! OAuth landing and profile view.
//!
//! SYSTEM CONTEXT
//! ==============
//! The Google flow redirects here with the handshake in the URL. The store
//! consumes it during initialization; this page only waits for the session
//! to resolve and then shows the user or a way back.

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::Session;

use crate::app::{AppStore, spawn_store_task};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let session = expect_context::<RwSignal<Session>>();

    let on_logout = Callback::new(move |()| {
        spawn_store_task(&store, |store| async move {
            store.logout().await;
        });
    });

    view! {
        <section class="page page--profile">
            <Show
                when=move || session.get().is_resolved()
                fallback=|| {
                    view! {
                        <h1>"Signing you in…"</h1>
                        <p class="page__status">"Please wait."</p>
                    }
                }
            >
                <Show
                    when=move || session.get().is_authenticated()
                    fallback=move || {
                        view! {
                            <h1>"You are not signed in"</h1>
                            <Show when=move || session.get().error.is_some()>
                                <p class="page__error">{move || session.get().error.unwrap_or_default()}</p>
                            </Show>
                            <a class="btn" href="/">"Back to home"</a>
                        }
                    }
                >
                    {move || {
                        session
                            .get()
                            .user
                            .map(|user| {
                                view! {
                                    <div class="profile-card">
                                        {user
                                            .picture
                                            .clone()
                                            .map(|src| view! { <img class="profile-card__avatar" src=src alt=""/> })}
                                        <h1>{user.name.clone()}</h1>
                                        <p>{user.email.clone()}</p>
                                        <p class="profile-card__meta">
                                            "Role: " {if user.is_admin() { "Administrator" } else { "Customer" }}
                                        </p>
                                        <p class="profile-card__meta">
                                            "Signed in with: " {user.provider.clone().unwrap_or_else(|| "Google".to_owned())}
                                        </p>
                                    </div>
                                }
                            })
                    }}
                    <button class="btn btn--danger" on:click=move |_| on_logout.run(())>"Sign out"</button>
                </Show>
            </Show>
        </section>
    }
}
