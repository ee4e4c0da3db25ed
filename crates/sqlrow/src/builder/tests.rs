use super::*;
use crate::condition::Condition;
use serde_json::json;

#[test]
fn test_limit_single_and_pair() {
    assert_eq!(limit_clause(Limit::Count(5)), "LIMIT 5");
    assert_eq!(limit_clause(Limit::Range(5, 10)), "LIMIT 5,10");
}

#[test]
fn test_offset_standalone() {
    let clause = Clause::new().limit(10).offset(20);
    assert_eq!(clause.assemble(""), " LIMIT 10 OFFSET 20");
}

#[test]
fn test_assemble_where_order_limit() {
    let clause = Clause::new()
        .filter("a=1")
        .order_by("id desc")
        .limit(10);
    assert_eq!(clause.assemble(""), " WHERE a=1 ORDER BY id desc LIMIT 10");
}

#[test]
fn test_assemble_order_independent_of_build_order() {
    let built_backwards = Clause::new()
        .limit(10)
        .order_by("id desc")
        .filter("a=1");
    assert_eq!(
        built_backwards.assemble(""),
        " WHERE a=1 ORDER BY id desc LIMIT 10"
    );

    let from_json = Clause::from_json(&json!({
        "limit": [10],
        "order": "id desc",
        "where": "a=1",
    }))
    .unwrap();
    assert_eq!(from_json.assemble(""), " WHERE a=1 ORDER BY id desc LIMIT 10");
}

#[test]
fn test_every_kind_in_fixed_order() {
    let clause = Clause::new()
        .offset(3)
        .limit_range(0, 5)
        .order_by(vec![
            OrderItem::Column("total".into()),
            OrderItem::Directed("u.id".into(), "desc".into()),
        ])
        .having("COUNT(o.id) > 1")
        .group_by(["u.id", "u.name"])
        .filter(Condition::from(vec!["u.active = 1"]))
        .right_join("teams t", "t.id = u.team_id")
        .inner_join("orders o", "o.user_id = u.id")
        .left_join("roles r", "r.id = u.role_id");

    assert_eq!(
        clause.assemble("app_"),
        " LEFT JOIN app_roles r ON r.id = u.role_id \
         INNER JOIN app_orders o ON o.user_id = u.id \
         RIGHT JOIN app_teams t ON t.id = u.team_id \
         WHERE u.active = 1 \
         GROUP BY u.id,u.name \
         HAVING COUNT(o.id) > 1 \
         ORDER BY total,u.id DESC \
         LIMIT 0,5 \
         OFFSET 3"
    );
}

#[test]
fn test_join_table_prefix_is_idempotent() {
    let join = Join::new("app_roles", "r.id = u.role_id");
    assert_eq!(
        join_clause(JoinKind::Left, &join, "app_"),
        "LEFT JOIN app_roles ON r.id = u.role_id"
    );
}

#[test]
fn test_empty_where_and_having_are_absent() {
    let clause = Clause::new()
        .filter(Condition::new())
        .having(Vec::<&str>::new())
        .group_by(Vec::<String>::new())
        .order_by("");
    assert_eq!(clause.assemble(""), "");
}

#[test]
fn test_where_with_unknown_connective_only_is_absent() {
    let clause = Clause::new().filter(vec![("a=1", "xor")]);
    assert_eq!(clause.fragment(ClauseKind::Where, ""), None);
}

#[test]
fn test_having_uses_condition_compiler() {
    let clause = Clause::new().having(vec![("SUM(x) > 1", "and"), ("MIN(x) = 0", "or")]);
    assert_eq!(clause.assemble(""), " HAVING SUM(x) > 1 OR MIN(x) = 0");
}

#[test]
fn test_clause_kind_keys_round_trip() {
    for kind in ClauseKind::ALL {
        assert_eq!(ClauseKind::from_key(kind.key()), Some(kind));
    }
    assert_eq!(ClauseKind::from_key("joins"), None);
}

#[test]
fn test_from_json_ignores_unknown_keys() {
    let clause = Clause::from_json(&json!({
        "where": ["a=1", ["b=2", "or"]],
        "select": "ignored",
        "join-left": ["roles r", "r.id = u.role_id"],
        "join-inner": [["a x", "x.id = 1"], ["b y", "y.id = 2"]],
        "group": "u.id",
        "offset": "15",
    }))
    .unwrap();

    assert_eq!(
        clause.assemble(""),
        " LEFT JOIN roles r ON r.id = u.role_id \
         INNER JOIN a x ON x.id = 1 INNER JOIN b y ON y.id = 2 \
         WHERE a=1 OR b=2 GROUP BY u.id OFFSET 15"
    );
}

#[test]
fn test_from_json_rejects_malformed() {
    assert!(Clause::from_json(&json!("where a=1")).is_err());
    assert!(Clause::from_json(&json!({"limit": [1, 2, 3]})).is_err());
    assert!(Clause::from_json(&json!({"limit": -1})).is_err());
    assert!(Clause::from_json(&json!({"join-left": ["only-table"]})).is_err());
    assert!(Clause::from_json(&json!({"order": [["id"]]})).is_err());
}

#[test]
fn test_project_empty_is_star() {
    assert_eq!(Fields::from(Vec::<&str>::new()).project(), "*");
    assert_eq!(Fields::from("").project(), "*");
}

#[test]
fn test_project_alias() {
    assert_eq!(
        Fields::from(vec![("count", "COUNT(id)")]).project(),
        "COUNT(id) AS count"
    );
}

#[test]
fn test_project_list_and_mixed_json() {
    assert_eq!(Fields::from(vec!["id", "title"]).project(), "id,title");

    let mixed = Fields::from_json(&json!({
        "0": "p.id",
        "author": "u.name",
        "1": "p.title",
    }))
    .unwrap();
    assert_eq!(mixed.project(), "p.id,u.name AS author,p.title");
}

#[test]
fn test_project_json_rejects_non_string() {
    assert!(Fields::from_json(&json!(["id", 3])).is_err());
    assert!(Fields::from_json(&json!({"n": null})).is_err());
    assert!(Fields::from_json(&json!(true)).is_err());
}
