use super::*;
use crate::session::Claims;

fn signed_in() -> Session {
    Session { is_authenticated: true, user: Some(Claims::from(serde_json::Map::new())) }
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn root_is_sign_in() {
    let m = RouteTable::default().resolve("/").unwrap();
    assert_eq!(m.views, vec![View::SignIn]);
    assert!(!m.requires_auth);
}

#[test]
fn orders_renders_container_only() {
    let m = RouteTable::default().resolve("/orders").unwrap();
    assert_eq!(m.views, vec![View::Orders]);
    assert!(m.requires_auth);
}

#[test]
fn static_children_resolve() {
    let table = RouteTable::default();
    assert_eq!(table.resolve("/orders/create").unwrap().views, vec![View::Orders, View::CreateOrder]);
    assert_eq!(table.resolve("/orders/list").unwrap().views, vec![View::Orders, View::OrderList]);
}

#[test]
fn static_child_beats_param_child() {
    let m = RouteTable::default().resolve("/orders/create").unwrap();
    assert_eq!(m.view(), View::CreateOrder);
    assert!(m.params.is_empty());
}

#[test]
fn param_child_captures_id() {
    let m = RouteTable::default().resolve("/orders/42").unwrap();
    assert_eq!(m.view(), View::OrderDetails);
    assert_eq!(m.param("id"), Some("42"));
    assert!(m.requires_auth);
}

#[test]
fn trailing_slash_query_and_fragment_ignored() {
    let table = RouteTable::default();
    assert_eq!(table.resolve("/orders/list/").unwrap().view(), View::OrderList);
    assert_eq!(table.resolve("/orders/7?tab=items#top").unwrap().param("id"), Some("7"));
    assert_eq!(table.resolve("//orders//create").unwrap().view(), View::CreateOrder);
}

#[test]
fn empty_path_is_root() {
    assert_eq!(RouteTable::default().resolve("").unwrap().view(), View::SignIn);
}

#[test]
fn unknown_paths_do_not_resolve() {
    let table = RouteTable::default();
    assert!(table.resolve("/customers").is_none());
    assert!(table.resolve("/orders/42/items").is_none());
    assert!(table.resolve("/signin").is_none());
}

#[test]
fn order_of_declaration_does_not_matter_for_ranking() {
    let table = RouteTable::new(vec![Route::new("/orders", View::Orders).with_children(vec![
        Route::new(":id", View::OrderDetails),
        Route::new("list", View::OrderList),
    ])]);
    assert_eq!(table.resolve("/orders/list").unwrap().view(), View::OrderList);
}

// =============================================================================
// navigate
// =============================================================================

#[test]
fn guarded_route_redirects_when_signed_out() {
    let nav = RouteTable::default().navigate("/orders/list", &Session::default());
    assert_eq!(nav, Navigation::Redirect(SIGN_IN_PATH));
}

#[test]
fn guarded_route_renders_when_signed_in() {
    let nav = RouteTable::default().navigate("/orders/9", &signed_in());
    match nav {
        Navigation::Render(m) => assert_eq!(m.param("id"), Some("9")),
        other => panic!("expected Render, got {other:?}"),
    }
}

#[test]
fn flag_alone_opens_the_gate() {
    // Claims are never consulted; the flag is the whole guard.
    let session = Session { is_authenticated: true, user: None };
    assert!(matches!(RouteTable::default().navigate("/orders", &session), Navigation::Render(_)));
}

#[test]
fn sign_in_always_renders() {
    let table = RouteTable::default();
    assert!(matches!(table.navigate("/", &Session::default()), Navigation::Render(_)));
    assert!(matches!(table.navigate("/", &signed_in()), Navigation::Render(_)));
}

#[test]
fn unknown_path_is_not_found_regardless_of_session() {
    let table = RouteTable::default();
    assert_eq!(table.navigate("/nope", &Session::default()), Navigation::NotFound);
    assert_eq!(table.navigate("/nope", &signed_in()), Navigation::NotFound);
}

#[test]
fn view_display_names() {
    assert_eq!(View::OrderDetails.to_string(), "OrderDetails");
    assert_eq!(View::SignIn.to_string(), "SignIn");
}
