//! Static about page.

use leptos::prelude::*;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <section class="page page--about">
            <h1>"About us"</h1>
            <p>
                "We are a small online shop focused on well-made everyday goods. "
                "Orders ship within two business days."
            </p>
            <p>"Sign in with your Google account to keep your profile across devices."</p>
        </section>
    }
}
