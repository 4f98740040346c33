//! Category index linking into the filtered catalog.

#[cfg(test)]
#[path = "categories_test.rs"]
mod categories_test;

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::CatalogApi;

use crate::app::AppStore;
use crate::state::remote::Remote;
use crate::util::fetch::load_into;

/// Catalog link filtered to `category`.
pub(crate) fn category_href(category: &str) -> String {
    let query = storefront_core::ProductQuery { category: Some(category.to_owned()), ..Default::default() };
    format!("/products?{}", query.to_query_string())
}

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let categories = RwSignal::new(Remote::<Vec<String>>::Loading);

    load_into(categories, async move { store.backend().list_categories(store.token().as_deref()).await });

    view! {
        <section class="page page--categories">
            <h1>"Categories"</h1>
            {move || match categories.get() {
                Remote::Loading => view! { <p class="page__status">"Loading categories…"</p> }.into_any(),
                Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                Remote::Ready(names) => view! {
                    <ul class="category-list">
                        {names
                            .into_iter()
                            .map(|name| {
                                let href = category_href(&name);
                                view! {
                                    <li>
                                        <a class="category-list__link" href=href>{name}</a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any(),
            }}
        </section>
    }
}
