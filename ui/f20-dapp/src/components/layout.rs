use dioxus::prelude::*;

use crate::state::{ConnectionStatus, SharedChain, WalletStatus};
use crate::Route;

#[component]
pub fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            div { class: "sidebar-brand",
                span { class: "brand-icon", "◈" }
                span { class: "brand-text", "F20 Token Sale" }
            }
            div { class: "sidebar-nav",
                NavSection { label: "Sale" }
                NavLink { to: Route::Home {}, label: "Buy Tokens", icon: "⌂" }
                NavSection { label: "Owner" }
                NavLink { to: Route::Admin {}, label: "Admin Panel", icon: "⚙" }
            }
        }
    }
}

#[component]
pub fn TopBar() -> Element {
    let chain = use_context::<SharedChain>();
    let wallet = use_context::<WalletStatus>();
    let contract = chain.contract_address().to_string();

    let status = wallet.read().clone();
    let (dot_class, label) = status.indicator();
    let account = account_label(&status);

    rsx! {
        header { class: "topbar",
            div { class: "topbar-left",
                span { class: "topbar-label", "Contract" }
                span { class: "topbar-value mono", title: "{contract}", "{truncate_address(&contract)}" }
            }
            div { class: "topbar-right",
                span { class: dot_class }
                span { class: "conn-label", "{label}" }
                span { class: "topbar-value mono", "{account}" }
            }
        }
    }
}

#[component]
fn NavSection(label: &'static str) -> Element {
    rsx! {
        div { class: "nav-section-label", "{label}" }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { class: "nav-link", to: to,
            span { class: "nav-icon", "{icon}" }
            span { "{label}" }
        }
    }
}

/// `0x1266...4d0b` style shortening for narrow places.
pub fn truncate_address(address: &str) -> String {
    if address.len() > 12 {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Connected account for the top bar, shortened.
pub fn account_label(status: &ConnectionStatus) -> String {
    match status.connection() {
        Some(connection) => truncate_address(&connection.address.to_string()),
        None => "Not connected".to_string(),
    }
}
