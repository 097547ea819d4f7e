use dioxus::prelude::*;

use super::connection_status::ConnectionStatusIndicator;
use crate::admin::{self, AdminView};
use crate::session;
use crate::state::{ConnectionStatus, PendingOperation, SharedChain, WalletStatus};

fn connect(chain: SharedChain, mut view: Signal<AdminView>, mut wallet: WalletStatus) {
    if !view.write().begin_connect() {
        return;
    }
    spawn(async move {
        wallet.set(ConnectionStatus::Connecting);
        let result = session::blocking(chain, admin::connect_and_check_owner).await;
        view.write().finish_connect(result);
        wallet.set(view.read().connection.clone());
    });
}

fn mint(chain: SharedChain, mut view: Signal<AdminView>) {
    let Some((connection, amount)) = view.write().begin_mint() else {
        return;
    };
    spawn(async move {
        let result =
            session::blocking(chain, move |chain| admin::run_mint(chain, &connection, amount)).await;
        view.write().finish_mint(result);
    });
}

fn change_price(chain: SharedChain, mut view: Signal<AdminView>) {
    let Some((connection, price)) = view.write().begin_change_price() else {
        return;
    };
    spawn(async move {
        let result = session::blocking(chain, move |chain| {
            admin::run_change_price(chain, &connection, price)
        })
        .await;
        view.write().finish_change_price(result);
    });
}

fn withdraw(chain: SharedChain, mut view: Signal<AdminView>) {
    let Some(connection) = view.write().begin_withdraw() else {
        return;
    };
    spawn(async move {
        let result =
            session::blocking(chain, move |chain| admin::run_withdraw(chain, &connection)).await;
        view.write().finish_withdraw(result);
    });
}

#[component]
pub fn AdminPanelPage() -> Element {
    let chain = use_context::<SharedChain>();
    let wallet = use_context::<WalletStatus>();
    let mut view = use_signal(AdminView::default);

    // Connect as soon as the page mounts
    {
        let chain = chain.clone();
        use_hook(move || connect(chain, view, wallet));
    }

    let state = view.read().clone();

    let on_connect = {
        let chain = chain.clone();
        move |_: MouseEvent| connect(chain.clone(), view, wallet)
    };
    let on_mint = {
        let chain = chain.clone();
        move |_| mint(chain.clone(), view)
    };
    let on_change_price = {
        let chain = chain.clone();
        move |_| change_price(chain.clone(), view)
    };
    let on_withdraw = move |_| withdraw(chain.clone(), view);

    rsx! {
        div { class: "page",
            h1 { "Admin Panel" }

            ConnectionStatusIndicator { status: state.connection.clone(), on_connect: on_connect }

            if let Some(notice) = state.notice() {
                p { class: "error-text", "{notice}" }
            }

            if state.controls_visible() {
                h2 { "Administrative Functions" }

                div { class: "form-group",
                    h3 { "Mint Tokens" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "Amount to mint",
                        value: "{state.mint_amount}",
                        oninput: move |e| view.write().mint_amount = e.value(),
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: state.mint.is_busy(),
                        onclick: on_mint,
                        if state.mint.is_busy() { "Processing..." } else { "Mint" }
                    }
                    OperationMessage { op: state.mint.clone() }
                }

                div { class: "form-group",
                    h3 { "Change Token Price" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "New price (ETH)",
                        value: "{state.new_price}",
                        oninput: move |e| view.write().new_price = e.value(),
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: state.price_change.is_busy(),
                        onclick: on_change_price,
                        if state.price_change.is_busy() { "Processing..." } else { "Update Price" }
                    }
                    OperationMessage { op: state.price_change.clone() }
                }

                div { class: "form-group",
                    h3 { "Withdraw Funds" }
                    button {
                        class: "btn btn-primary",
                        disabled: state.withdrawal.is_busy(),
                        onclick: on_withdraw,
                        if state.withdrawal.is_busy() { "Processing..." } else { "Withdraw" }
                    }
                    OperationMessage { op: state.withdrawal.clone() }
                }
            }
        }
    }
}

#[component]
fn OperationMessage(op: PendingOperation) -> Element {
    rsx! {
        if let Some(msg) = op.message.as_ref() {
            p {
                class: if op.is_failure() { "error-text" } else { "success-text" },
                "{msg}"
            }
        }
    }
}
