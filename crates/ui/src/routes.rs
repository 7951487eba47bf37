use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ChatView, HistoryView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", ChatView)] Chat {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Sanderson AI Learning" }
            ul {
                li { Link { to: Route::Chat {}, "Chat" } }
                li { Link { to: Route::Quiz {}, "Quiz" } }
                li { Link { to: Route::History {}, "History" } }
            }
        }
    }
}
