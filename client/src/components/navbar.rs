//! Top navigation with catalog links and the account area.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shows a sign-in button while signed out (disabled during auth calls) and
//! the user's name, role, and menu once authenticated. The mobile variant
//! collapses links behind a toggle.

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::Session;

use crate::app::{AppStore, spawn_store_task};
use crate::components::login_modal::LoginModal;
use crate::state::device::Variant;

const LINKS: [(&str, &str); 4] =
    [("/", "Home"), ("/products", "Products"), ("/categories", "Categories"), ("/about", "About")];

#[component]
pub fn Navbar(variant: Signal<Variant>) -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let session = expect_context::<RwSignal<Session>>();
    let show_login = RwSignal::new(false);
    let menu_open = RwSignal::new(false);
    let links_open = RwSignal::new(false);

    let is_mobile = move || variant.get() == Variant::Mobile;
    let on_logout = Callback::new(move |()| {
        menu_open.set(false);
        spawn_store_task(&store, |store| async move {
            store.logout().await;
        });
    });
    let on_login_close = Callback::new(move |()| show_login.set(false));

    let user_name = move || session.get().user.map(|u| u.name).unwrap_or_default();
    let avatar = move || {
        let user = session.get().user?;
        Some(match user.picture.clone() {
            Some(src) => view! { <img class="navbar__avatar" src=src alt=user.name.clone()/> }.into_any(),
            None => view! { <span class="navbar__avatar navbar__avatar--initial">{user.initial()}</span> }.into_any(),
        })
    };

    view! {
        <nav class=move || if is_mobile() { "navbar navbar--mobile" } else { "navbar navbar--desktop" }>
            <a class="navbar__brand" href="/">"Storefront"</a>

            <Show when=is_mobile>
                <button class="btn navbar__toggle" on:click=move |_| links_open.update(|open| *open = !*open)>
                    "☰"
                </button>
            </Show>

            <div class="navbar__links" class:navbar__links--open=move || !is_mobile() || links_open.get()>
                {LINKS
                    .into_iter()
                    .map(|(href, label)| {
                        view! {
                            <a class="navbar__link" href=href on:click=move |_| links_open.set(false)>
                                {label}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="navbar__account">
                <Show
                    when=move || session.get().is_authenticated()
                    fallback=move || {
                        view! {
                            <button
                                class="btn btn--primary navbar__login"
                                disabled=move || session.get().loading
                                on:click=move |_| show_login.set(true)
                            >
                                {move || if session.get().loading { "Signing in…" } else { "Sign in" }}
                            </button>
                        }
                    }
                >
                    <button class="navbar__user" on:click=move |_| menu_open.update(|open| *open = !*open)>
                        {avatar}
                        <span class="navbar__user-name">{user_name}</span>
                        <Show when=move || session.get().is_admin()>
                            <span class="badge badge--admin">"Admin"</span>
                        </Show>
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="navbar__menu">
                            <div class="navbar__menu-header">
                                <div>{user_name}</div>
                                <div class="navbar__menu-email">
                                    {move || session.get().user.map(|u| u.email).unwrap_or_default()}
                                </div>
                            </div>
                            <a class="navbar__menu-item" href="/profile">"My profile"</a>
                            <Show when=move || session.get().is_admin()>
                                <a class="navbar__menu-item" href="/admin">"Admin dashboard"</a>
                                <a class="navbar__menu-item" href="/admin/products">"Manage products"</a>
                                <a class="navbar__menu-item" href="/admin/analytics">"Analytics"</a>
                            </Show>
                            <button class="navbar__menu-item navbar__menu-item--danger" on:click=move |_| on_logout.run(())>
                                "Sign out"
                            </button>
                        </div>
                    </Show>
                </Show>
            </div>

            <Show when=move || show_login.get()>
                <LoginModal on_close=on_login_close/>
            </Show>
        </nav>
    }
}
