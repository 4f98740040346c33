//! Catalog listing with category and search filters.
//!
//! SYSTEM CONTEXT
//! ==============
//! Initial filters come from the `category`/`search` query string so the
//! categories page can deep-link here. Every filter change refetches.

#[cfg(test)]
#[path = "products_test.rs"]
mod products_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use storefront_core::{CatalogApi, Product, ProductQuery};

use crate::app::AppStore;
use crate::components::product_card::ProductCard;
use crate::state::remote::Remote;
use crate::util::fetch::load_into;

/// Build the listing query from the filter inputs. Blank inputs mean "any".
pub(crate) fn catalog_query(category: &str, search: &str) -> ProductQuery {
    let non_blank = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_owned())
    };
    ProductQuery { category: non_blank(category), search: non_blank(search), ..ProductQuery::default() }
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let params = use_query_map();
    let initial = params.get_untracked();

    let category = RwSignal::new(initial.get("category").unwrap_or_default());
    let search = RwSignal::new(initial.get("search").unwrap_or_default());
    let search_input = RwSignal::new(search.get_untracked());
    let products = RwSignal::new(Remote::<Vec<Product>>::Loading);
    let categories = RwSignal::new(Remote::<Vec<String>>::Loading);

    {
        let store = Arc::clone(&store);
        load_into(categories, async move { store.backend().list_categories(store.token().as_deref()).await });
    }

    Effect::new(move || {
        let query = catalog_query(&category.get(), &search.get());
        let store = Arc::clone(&store);
        load_into(products, async move { store.backend().list_products(&query, store.token().as_deref()).await });
    });

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        search.set(search_input.get_untracked());
    };

    view! {
        <section class="page page--products">
            <h1>"Catalog"</h1>
            <form class="filters" on:submit=on_search>
                <select
                    class="filters__category"
                    prop:value=move || category.get()
                    on:change=move |ev| category.set(event_target_value(&ev))
                >
                    <option value="">"All categories"</option>
                    {move || {
                        categories
                            .get()
                            .ready()
                            .cloned()
                            .unwrap_or_default()
                            .into_iter()
                            .map(|name| {
                                let value = name.clone();
                                view! { <option value=value>{name}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <input
                    class="filters__search"
                    type="search"
                    placeholder="Search products"
                    prop:value=move || search_input.get()
                    on:input=move |ev| search_input.set(event_target_value(&ev))
                />
                <button class="btn" type="submit">"Search"</button>
            </form>

            {move || match products.get() {
                Remote::Loading => view! { <p class="page__status">"Loading products…"</p> }.into_any(),
                Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                Remote::Ready(items) if items.is_empty() => {
                    view! { <p class="page__status">"No products match these filters."</p> }.into_any()
                }
                Remote::Ready(items) => view! {
                    <div class="product-grid">
                        {items.into_iter().map(|product| view! { <ProductCard product/> }).collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </section>
    }
}
