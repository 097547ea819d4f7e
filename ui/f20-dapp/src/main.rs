#![allow(non_snake_case)]

mod admin;
mod components;
mod config;
mod purchase;
mod session;
mod state;

use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::DappConfig;
use state::{ConnectionStatus, SharedChain, WalletStatus};

const STYLE: &str = include_str!("../assets/style.css");

#[derive(Routable, Clone, Debug, PartialEq)]
enum Route {
    #[layout(Layout)]
    #[route("/")]
    Home {},
    #[route("/admin")]
    Admin {},
    #[end_layout]
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

fn main() {
    let config_path = DappConfig::default_path();
    let config = match DappConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        config = %config_path.display(),
        wallet = %config.wallet.rpc_url,
        contract = %config.contract.address,
        "starting F20 front-end"
    );

    let chain: SharedChain = match config.chain_access() {
        Ok(chain) => Arc::new(chain),
        Err(e) => {
            error!(error = %e, "could not set up wallet access");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new().with_context(chain).launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Style { {STYLE} }
        Router::<Route> {}
    }
}

// ---------------------------------------------------------------------------
// Layout: sidebar + content
// ---------------------------------------------------------------------------

#[component]
fn Layout() -> Element {
    use_context_provider::<WalletStatus>(|| Signal::new(ConnectionStatus::Disconnected));

    rsx! {
        div { class: "app-container",
            components::layout::Sidebar {}
            div { class: "main-panel",
                components::layout::TopBar {}
                div { class: "main-content",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Route components, thin wrappers around the real pages
// ---------------------------------------------------------------------------

#[component]
fn Home() -> Element {
    rsx! { components::sale::SalePage {} }
}

#[component]
fn Admin() -> Element {
    rsx! { components::admin_panel::AdminPanelPage {} }
}

/// Anything unrouted goes back to the sale page.
#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    let nav = navigator();
    debug!(path = %segments.join("/"), "unknown route, redirecting home");
    use_effect(move || {
        nav.replace(Route::Home {});
    });
    rsx! {}
}
