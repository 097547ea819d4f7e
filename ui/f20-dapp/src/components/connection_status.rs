use dioxus::prelude::*;

use crate::state::ConnectionStatus;

#[component]
pub fn ConnectionStatusIndicator(
    status: ConnectionStatus,
    on_connect: EventHandler<MouseEvent>,
) -> Element {
    let (dot_class, label) = status.indicator();

    rsx! {
        div { class: "conn-indicator",
            span { class: dot_class }
            span { class: "conn-label", "{label}" }
            match &status {
                ConnectionStatus::Connected(connection) => rsx! {
                    span { class: "mono", "{connection.address}" }
                },
                ConnectionStatus::WalletMissing => rsx! {
                    p { class: "error-text",
                        "No wallet answered. Install or start a wallet, then reload."
                    }
                },
                _ => rsx! {
                    button {
                        class: "conn-btn conn-btn-connect",
                        disabled: !status.can_connect(),
                        onclick: move |evt| on_connect.call(evt),
                        "Connect Wallet"
                    }
                },
            }
            if let ConnectionStatus::Error(msg) = &status {
                p { class: "error-text", "{msg}" }
            }
        }
    }
}
