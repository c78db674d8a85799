use gatehouse_auth::GuardDecision;
use yew::prelude::*;
use yew_router::prelude::Redirect;
use yewdux::prelude::use_selector;

use crate::app::Route;
use crate::components::spinner::Spinner;
use crate::store::AuthStore;

#[derive(Properties, PartialEq)]
pub(crate) struct ProtectedRouteProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

/// Renders children only with a session; otherwise redirects to `/auth`.
#[function_component(ProtectedRoute)]
pub(crate) fn protected_route(props: &ProtectedRouteProps) -> Html {
    let decision = use_selector(|store: &AuthStore| store.protected_decision());
    match *decision {
        GuardDecision::Pending => html! { <Spinner /> },
        GuardDecision::Redirect => html! { <Redirect<Route> to={Route::Auth} /> },
        GuardDecision::Render => html! { <>{ for props.children.iter() }</> },
    }
}
