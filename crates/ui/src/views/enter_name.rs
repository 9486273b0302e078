use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::LaunchError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

/// Entry screen: collects the learner's name and starts a session.
#[component]
pub fn EnterNameView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let launcher = ctx.launcher();
    let session = ctx.session();

    let mut name = use_signal(String::new);
    let loading = use_signal(|| false);
    let error = use_signal(|| None::<ViewError>);

    let on_start = use_callback(move |()| {
        let launcher = launcher.clone();
        let session = session.clone();
        let mut loading = loading;
        let mut error = error;

        let username = name().trim().to_string();
        if username.is_empty() || loading() {
            return;
        }

        spawn(async move {
            loading.set(true);
            error.set(None);
            match launcher.start(&username).await {
                Ok(flow) => {
                    session.put(flow);
                    navigator.push(Route::Tutor {});
                }
                Err(err) => {
                    // A failed start leaves no half-built identity behind.
                    session.clear();
                    let view_err = match err {
                        LaunchError::EmptyBank => ViewError::EmptyBank,
                        _ => ViewError::Unknown,
                    };
                    error.set(Some(view_err));
                }
            }
            loading.set(false);
        });
    });

    rsx! {
        div { class: "login-bg",
            div { class: "login-card",
                div { class: "avatar-circle", "👤" }
                h2 { class: "login-title", "Start Your SQL Learning" }
                input {
                    class: "login-input",
                    placeholder: "Enter your name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                    onkeydown: move |evt| {
                        if evt.data.key() == Key::Enter {
                            on_start.call(());
                        }
                    },
                }
                button {
                    class: "login-button",
                    disabled: loading(),
                    onclick: move |_| on_start.call(()),
                    if loading() { "Starting..." } else { "Start" }
                }
                if let Some(err) = *error.read() {
                    p { class: "login-error", "{err.message()}" }
                }
            }
        }
    }
}
