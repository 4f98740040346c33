//! Admin product table with delete.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use storefront_core::{CatalogApi, Product, ProductQuery, Session};

use crate::app::{AppStore, spawn_store_task};
use crate::state::remote::{Remote, failure_message};
use crate::util::auth::{install_admin_guard, leave_if_denied};
use crate::util::fetch::load_into;
use crate::util::format::format_price;

#[component]
pub fn AdminProductsPage() -> impl IntoView {
    let store = expect_context::<Arc<AppStore>>();
    let session = expect_context::<RwSignal<Session>>();
    let navigate = use_navigate();
    install_admin_guard(session, navigate.clone());
    let is_admin = Memo::new(move |_| session.get().is_admin());

    let products = RwSignal::new(Remote::<Vec<Product>>::Loading);
    let notice = RwSignal::new(None::<String>);
    let busy_id = RwSignal::new(None::<String>);

    {
        let store = Arc::clone(&store);
        Effect::new(move || {
            if !is_admin.get() {
                return;
            }
            let store = Arc::clone(&store);
            let navigate = navigate.clone();
            load_into(products, async move {
                let result = store.backend().list_products(&ProductQuery::default(), store.token().as_deref()).await;
                leave_if_denied(result, &navigate)
            });
        });
    }

    let on_delete = Callback::new(move |id: String| {
        if busy_id.get_untracked().is_some() {
            return;
        }
        busy_id.set(Some(id.clone()));
        notice.set(None);
        spawn_store_task(&store, move |store| async move {
            match store.backend().delete_product(&id, store.token().as_deref()).await {
                Ok(()) => {
                    products.update(|remote| {
                        if let Remote::Ready(items) = remote {
                            items.retain(|p| p.id != id);
                        }
                    });
                    notice.set(Some("Product deleted.".to_owned()));
                }
                Err(e) => notice.set(Some(failure_message(&e))),
            }
            busy_id.set(None);
        });
    });

    view! {
        <Show when=move || is_admin.get() fallback=|| view! { <p class="page__status">"Checking access…"</p> }>
            <section class="page page--admin-products">
                <h1>"Manage products"</h1>
                <Show when=move || notice.get().is_some()>
                    <p class="page__notice">{move || notice.get().unwrap_or_default()}</p>
                </Show>
                {move || match products.get() {
                    Remote::Loading => view! { <p class="page__status">"Loading products…"</p> }.into_any(),
                    Remote::Failed(message) => view! { <p class="page__error">{message}</p> }.into_any(),
                    Remote::Ready(items) => view! {
                        <table class="admin-table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Category"</th>
                                    <th>"Price"</th>
                                    <th>"Stock"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {items
                                    .into_iter()
                                    .map(|product| {
                                        let id = product.id.clone();
                                        let row_id = product.id.clone();
                                        view! {
                                            <tr>
                                                <td><a href=format!("/products/{}", product.id)>{product.name.clone()}</a></td>
                                                <td>{product.category.clone()}</td>
                                                <td>{format_price(product.price)}</td>
                                                <td>{product.stock}</td>
                                                <td>{String::from(product.status.clone())}</td>
                                                <td>
                                                    <button
                                                        class="btn btn--danger"
                                                        disabled=move || busy_id.get().is_some_and(|busy| busy == row_id)
                                                        on:click=move |_| on_delete.run(id.clone())
                                                    >
                                                        "Delete"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }}
            </section>
        </Show>
    }
}
