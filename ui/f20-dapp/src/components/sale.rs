use dioxus::prelude::*;

use super::connection_status::ConnectionStatusIndicator;
use crate::purchase::{self, PurchaseView};
use crate::session;
use crate::state::{ConnectionStatus, SharedChain, WalletStatus};

fn connect(chain: SharedChain, mut view: Signal<PurchaseView>, mut wallet: WalletStatus) {
    if !view.write().begin_connect() {
        return;
    }
    spawn(async move {
        wallet.set(ConnectionStatus::Connecting);
        let result = session::blocking(chain, session::connect_and_read).await;
        view.write().finish_connect(result);
        wallet.set(view.read().connection.clone());
    });
}

fn buy(chain: SharedChain, mut view: Signal<PurchaseView>) {
    let Some((connection, quantity)) = view.write().begin_buy() else {
        return;
    };
    spawn(async move {
        let result = session::blocking(chain, move |chain| {
            purchase::run_buy(chain, &connection, quantity)
        })
        .await;
        view.write().finish_buy(result);
    });
}

#[component]
pub fn SalePage() -> Element {
    let chain = use_context::<SharedChain>();
    let wallet = use_context::<WalletStatus>();
    let mut view = use_signal(PurchaseView::default);

    let state = view.read().clone();
    let busy = state.purchase.is_busy();

    let on_connect = {
        let chain = chain.clone();
        move |_: MouseEvent| connect(chain.clone(), view, wallet)
    };
    let on_buy = move |_| buy(chain.clone(), view);

    rsx! {
        div { class: "page",
            h1 { "F20 Token Sale" }
            p { class: "subtitle", "Buy F20 tokens with the connected wallet." }

            ConnectionStatusIndicator { status: state.connection.clone(), on_connect: on_connect }

            if state.connection.connection().is_some() {
                div { class: "result-card",
                    p { class: "label", "Available tokens" }
                    p { class: "balance-large", "{state.available}" }
                    p { class: "label", "Price per token" }
                    p { class: "mono", "{state.price} ETH" }
                    p { class: "label", "Your balance" }
                    p { class: "mono", "{state.balance} F20" }
                }

                div { class: "form-group",
                    label { "Quantity" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Quantity to buy",
                        value: "{state.quantity}",
                        oninput: move |e| view.write().quantity = e.value(),
                    }
                }

                button {
                    class: "btn btn-primary",
                    disabled: busy,
                    onclick: on_buy,
                    if busy { "Processing..." } else { "Buy Tokens" }
                }

                if let Some(msg) = state.purchase.message.as_ref() {
                    p {
                        class: if state.purchase.is_failure() { "error-text" } else { "success-text" },
                        "{msg}"
                    }
                }
            }
        }
    }
}
