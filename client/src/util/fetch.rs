//! Fill a view's `Remote` signal from a backend call.

use std::future::Future;

use leptos::prelude::*;
use storefront_core::ApiError;

use crate::state::remote::Remote;

/// Mark `target` loading, then store the outcome of `request` once it resolves.
/// Late results after the view unmounts are dropped.
pub fn load_into<T, Fut>(target: RwSignal<Remote<T>>, request: Fut)
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    target.set(Remote::Loading);
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            let result = request.await;
            if let Err(e) = &result {
                log::warn!("request failed: {e}");
            }
            let _ = target.try_set(Remote::from_result(result));
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        drop(request);
    }
}
