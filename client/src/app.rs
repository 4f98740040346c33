//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` mounts the session store once, mirrors its snapshots into a
//! `RwSignal<Session>` for views, and picks the presentation variant. Views
//! reach the store through `expect_context::<Arc<AppStore>>()`.

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};
use storefront_core::{Session, SessionStore};

use crate::components::{device_switcher::DeviceSwitcher, navbar::Navbar};
use crate::net::api::HttpBackend;
use crate::pages::{
    about::AboutPage, admin::AdminPage, admin_products::AdminProductsPage, analytics::AnalyticsPage,
    categories::CategoriesPage, home::HomePage, product_detail::ProductDetailPage, products::ProductsPage,
    profile::ProfilePage,
};
use crate::state::device::DeviceState;
use crate::util::location::BrowserLocation;
use crate::util::storage::BrowserStorage;

/// Session store wired to the browser transport, storage, and address bar.
pub type AppStore = SessionStore<HttpBackend, BrowserStorage, BrowserLocation>;

/// Run a store operation on the browser executor. No-op during SSR.
pub fn spawn_store_task<F, Fut>(store: &Arc<AppStore>, task: F)
where
    F: FnOnce(Arc<AppStore>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(task(Arc::clone(store)));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (store, task);
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store = Arc::new(AppStore::new(HttpBackend::from_env(), BrowserStorage, BrowserLocation));
    let session = RwSignal::new(store.snapshot());
    store.subscribe(move |snapshot| {
        let _ = session.try_set(snapshot.clone());
    });
    let device = RwSignal::new(DeviceState::default());

    provide_context(Arc::clone(&store));
    provide_context::<RwSignal<Session>>(session);
    provide_context(device);

    // Viewport detection waits for mount so hydration matches the server render.
    Effect::new(move || {
        device.set(crate::util::device::detect());
        crate::util::device::install_resize_listener(device);
    });

    spawn_store_task(&store, |store| async move {
        store.initialize().await;
    });

    let variant = Signal::derive(move || device.get().effective());

    view! {
        <Stylesheet id="leptos" href="/pkg/storefront.css"/>
        <Title text="Storefront"/>

        <Router>
            <div class="app" data-variant=move || variant.get().as_str()>
                <Navbar variant/>
                <main class="app__main">
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=move || view! { <HomePage variant/> }/>
                        <Route path=StaticSegment("products") view=ProductsPage/>
                        <Route path=(StaticSegment("products"), ParamSegment("id")) view=ProductDetailPage/>
                        <Route path=StaticSegment("categories") view=CategoriesPage/>
                        <Route path=StaticSegment("about") view=AboutPage/>
                        <Route path=StaticSegment("profile") view=ProfilePage/>
                        <Route path=StaticSegment("admin") view=AdminPage/>
                        <Route path=(StaticSegment("admin"), StaticSegment("products")) view=AdminProductsPage/>
                        <Route path=(StaticSegment("admin"), StaticSegment("analytics")) view=AnalyticsPage/>
                    </Routes>
                </main>
                <DeviceSwitcher/>
            </div>
        </Router>
    }
}
