//! Admin dashboard entry. Non-admins are redirected home.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use storefront_core::Session;

use crate::util::auth::install_admin_guard;

#[component]
pub fn AdminPage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    install_admin_guard(session, use_navigate());

    view! {
        <Show
            when=move || session.get().is_admin()
            fallback=|| view! { <p class="page__status">"Checking access…"</p> }
        >
            <section class="page page--admin">
                <h1>"Admin dashboard"</h1>
                <p>{move || format!("Signed in as {}", session.get().user.map(|u| u.name).unwrap_or_default())}</p>
                <ul class="admin-links">
                    <li><a href="/admin/products">"Manage products"</a></li>
                    <li><a href="/admin/analytics">"Visitor analytics"</a></li>
                </ul>
            </section>
        </Show>
    }
}
