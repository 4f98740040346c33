//! Floating control to force the desktop or mobile variant.

use leptos::prelude::*;

use crate::state::device::{DeviceState, Variant};
use crate::util::device::save_forced;

#[component]
pub fn DeviceSwitcher() -> impl IntoView {
    let device = expect_context::<RwSignal<DeviceState>>();

    let choose = move |forced: Option<Variant>| {
        device.update(|d| d.forced = forced);
        save_forced(forced);
    };
    let option = move |forced: Option<Variant>, label: &'static str| {
        view! {
            <button
                class="btn device-switcher__option"
                class:device-switcher__option--active=move || device.get().forced == forced
                on:click=move |_| choose(forced)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="device-switcher" title="Layout">
            {option(None, "Auto")}
            {option(Some(Variant::Desktop), Variant::Desktop.label())}
            {option(Some(Variant::Mobile), Variant::Mobile.label())}
        </div>
    }
}
