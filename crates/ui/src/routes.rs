use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{EnterNameView, TutorView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", EnterNameView)] EnterName {},
        #[route("/tutor", TutorView)] Tutor {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
