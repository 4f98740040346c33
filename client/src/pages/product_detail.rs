//! Single product view.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use storefront_core::{CatalogApi, Product, types::image_data_url};

use crate::app::AppStore;
use crate::state::remote::Remote;
use crate::util::fetch::load_into;
use crate::util::format::{format_price, stock_label};

#[component]
pub fn ProductDetailPage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let params = use_params_map();
    let product = RwSignal::new(Remote::<Product>::Loading);

    Effect::new(move || {
        let Some(id) = params.get().get("id") else {
            return;
        };
        let store = Arc::clone(&store);
        load_into(product, async move { store.backend().get_product(&id, store.token().as_deref()).await });
    });

    view! {
        <section class="page page--product">
            <a class="page__back" href="/products">"← Back to catalog"</a>
            {move || match product.get() {
                Remote::Loading => view! { <p class="page__status">"Loading product…"</p> }.into_any(),
                Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                Remote::Ready(item) => view! {
                    <article class="product-detail">
                        <div class="product-detail__gallery">
                            {item
                                .images
                                .iter()
                                .map(|blob| view! { <img class="product-detail__image" src=image_data_url(blob) alt=""/> })
                                .collect_view()}
                            {item
                                .images
                                .is_empty()
                                .then(|| item.image_url.clone())
                                .flatten()
                                .map(|src| view! { <img class="product-detail__image" src=src alt=""/> })}
                        </div>
                        <div class="product-detail__info">
                            <h1>{item.name.clone()}</h1>
                            <p class="product-detail__category">{item.category.clone()}</p>
                            <p class="product-detail__price">{format_price(item.price)}</p>
                            <p class="product-detail__stock">{stock_label(item.stock)}</p>
                            <p class="product-detail__description">{item.description.clone()}</p>
                        </div>
                    </article>
                }
                .into_any(),
            }}
        </section>
    }
}
