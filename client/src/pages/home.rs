//! Landing page: variant-specific intro plus featured products.

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::{CatalogApi, Product, ProductQuery};

use crate::app::AppStore;
use crate::components::product_card::ProductCard;
use crate::state::device::Variant;
use crate::state::remote::Remote;
use crate::util::fetch::load_into;

pub const FEATURED_LIMIT: usize = 4;

#[component]
pub fn HomePage(variant: Signal<Variant>) -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let featured = RwSignal::new(Remote::<Vec<Product>>::Loading);

    load_into(featured, async move {
        let query = ProductQuery { limit: Some(FEATURED_LIMIT), ..ProductQuery::default() };
        store.backend().list_products(&query, store.token().as_deref()).await
    });

    view! {
        <section class="page page--home">
            {move || match variant.get() {
                Variant::Desktop => view! {
                    <div class="hero hero--desktop">
                        <h1>"Everything for your home, delivered"</h1>
                        <p>
                            "Browse the full catalog, filter by category, and sign in with Google "
                            "to keep your profile in sync across devices."
                        </p>
                        <a class="btn btn--primary" href="/products">"Shop the catalog"</a>
                    </div>
                }
                .into_any(),
                Variant::Mobile => view! {
                    <div class="hero hero--mobile">
                        <h1>"Shop on the go"</h1>
                        <a class="btn btn--primary" href="/products">"Browse"</a>
                    </div>
                }
                .into_any(),
            }}

            <h2>"Featured products"</h2>
            {move || match featured.get() {
                Remote::Loading => view! { <p class="page__status">"Loading products…"</p> }.into_any(),
                Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                Remote::Ready(products) if products.is_empty() => {
                    view! { <p class="page__status">"No products yet."</p> }.into_any()
                }
                Remote::Ready(products) => view! {
                    <div class="product-grid" class:product-grid--compact=move || variant.get() == Variant::Mobile>
                        {products.into_iter().map(|product| view! { <ProductCard product/> }).collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </section>
    }
}
