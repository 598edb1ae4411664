//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::AnalyzerPage;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=AnalyzerPage />
                </Routes>
            </main>
        </Router>
    }
}
