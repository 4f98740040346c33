//! Visitor analytics: headline counters and the page-view histogram.

#[cfg(test)]
#[path = "analytics_test.rs"]
mod analytics_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use storefront_core::{Analytics, CatalogApi, PageViews, Session};

use crate::app::AppStore;
use crate::state::remote::Remote;
use crate::util::auth::{install_admin_guard, leave_if_denied};
use crate::util::fetch::load_into;

/// Bar width for `count` relative to the busiest page, in whole percent.
pub(crate) fn bar_percent(count: u64, max: u64) -> u64 {
    if max == 0 { 0 } else { (count.saturating_mul(100) / max).min(100) }
}

pub(crate) fn busiest(views: &[PageViews]) -> u64 {
    views.iter().map(|v| v.count).max().unwrap_or(0)
}

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let session = expect_context::<RwSignal<Session>>();
    let navigate = use_navigate();
    install_admin_guard(session, navigate.clone());
    let is_admin = Memo::new(move |_| session.get().is_admin());

    let analytics = RwSignal::new(Remote::<Analytics>::Loading);
    Effect::new(move || {
        if !is_admin.get() {
            return;
        }
        let store = Arc::clone(&store);
        let navigate = navigate.clone();
        load_into(analytics, async move {
            leave_if_denied(store.backend().analytics(store.token().as_deref()).await, &navigate)
        });
    });

    view! {
        <Show when=move || is_admin.get() fallback=|| view! { <p class="page__status">"Checking access…"</p> }>
            <section class="page page--analytics">
                <h1>"Analytics"</h1>
                {move || match analytics.get() {
                    Remote::Loading => view! { <p class="page__status">"Loading analytics…"</p> }.into_any(),
                    Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                    Remote::Ready(data) => {
                        let max = busiest(&data.page_views);
                        view! {
                            <div class="stat-grid">
                                <div class="stat"><span class="stat__value">{data.total_visitors}</span>" visitors"</div>
                                <div class="stat"><span class="stat__value">{data.unique_visitors}</span>" unique"</div>
                                <div class="stat"><span class="stat__value">{data.total_products}</span>" products"</div>
                                <div class="stat"><span class="stat__value">{data.total_users}</span>" users"</div>
                            </div>
                            <h2>"Page views"</h2>
                            <ul class="histogram">
                                {data
                                    .page_views
                                    .into_iter()
                                    .map(|views| {
                                        let width = format!("width: {}%", bar_percent(views.count, max));
                                        view! {
                                            <li class="histogram__row">
                                                <span class="histogram__label">{views.page}</span>
                                                <span class="histogram__bar" style=width></span>
                                                <span class="histogram__count">{views.count}</span>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                        .into_any()
                    }
                }}
            </section>
        </Show>
    }
}
