//! Catalog tile linking to the product detail page.

use leptos::prelude::*;
use storefront_core::Product;

use crate::util::format::{excerpt, format_price, stock_label};

const DESCRIPTION_EXCERPT_CHARS: usize = 90;

#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let href = format!("/products/{}", product.id);
    let cover = product.cover_image();
    let sold_out = !product.in_stock();

    view! {
        <a class="product-card" class:product-card--sold-out=sold_out href=href>
            {cover.map(|src| view! { <img class="product-card__image" src=src alt=product.name.clone()/> })}
            <div class="product-card__body">
                <h3 class="product-card__name">{product.name.clone()}</h3>
                <p class="product-card__category">{product.category.clone()}</p>
                <p class="product-card__description">{excerpt(&product.description, DESCRIPTION_EXCERPT_CHARS)}</p>
                <div class="product-card__footer">
                    <span class="product-card__price">{format_price(product.price)}</span>
                    <span class="product-card__stock">{stock_label(product.stock)}</span>
                </div>
            </div>
        </a>
    }
}
