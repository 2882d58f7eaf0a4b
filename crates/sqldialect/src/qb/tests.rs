//! Integration tests for the qb module.

use crate::dialect::{Capability, Dialect, DialectOptions};
use crate::error::SqlError;
use crate::qb::expr::{Expr, Window, and, col, func, not, or, param, val};
use crate::qb::{SqlQb, delete, insert, select, update};
use crate::value::Value;

fn spanner() -> Dialect {
    Dialect::spanner()
}

#[test]
fn test_select_basic() {
    let sql = select("users").to_sql(&spanner()).unwrap();
    assert_eq!(sql, "SELECT * FROM `users`");
}

#[test]
fn test_select_with_conditions_prepared() {
    let built = select("users")
        .eq("status", "active")
        .gt("age", 18)
        .limit(10)
        .prepared(true)
        .build(&Dialect::postgres())
        .unwrap();

    assert_eq!(
        built.sql,
        r#"SELECT * FROM "users" WHERE (("status" = $1) AND ("age" > $2)) LIMIT $3"#
    );
    assert_eq!(
        built.params,
        vec![Value::from("active"), Value::Int(18), Value::UInt(10)]
    );
}

#[test]
fn test_nested_and_or() {
    let cond = and(vec![
        col("a").unwrap().eq(1),
        or(vec![col("b").unwrap().eq(2), col("c").unwrap().eq(3)]),
    ]);
    let sql = select("t").and_where(cond).to_sql(&spanner()).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `t` WHERE ((`a` = 1) AND ((`b` = 2) OR (`c` = 3)))"
    );
}

#[test]
fn test_single_condition_is_not_double_wrapped() {
    let sql = select("t").gt("age", 10).to_sql(&spanner()).unwrap();
    assert_eq!(sql, "SELECT * FROM `t` WHERE (`age` > 10)");
}

#[test]
fn test_empty_groups_render_nothing() {
    let sql = select("t")
        .and_where(and(vec![]))
        .and_where(or(vec![and(vec![])]))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `t`");
}

#[test]
fn test_not_wraps_operand() {
    let sql = select("t")
        .and_where(not(col("a").unwrap().eq(1)))
        .and_where(not(col("flag").unwrap()))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `t` WHERE ((NOT (`a` = 1)) AND (NOT (`flag`)))"
    );
}

#[test]
fn test_between_and_is_true() {
    let sql = select("t")
        .between("age", 18, 65)
        .and_where(col("flag").unwrap().is_true())
        .prepared(true)
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `t` WHERE ((`age` BETWEEN ? AND ?) AND (`flag` IS TRUE))"
    );
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let sql = select("t")
        .in_list("id", Vec::<i32>::new())
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `t` WHERE (1 = 0)");

    let sql = select("t")
        .not_in("id", Vec::<i32>::new())
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `t` WHERE (1 = 1)");
}

#[test]
fn test_in_subquery() {
    let banned = select("banned").select(&["user_id"]);
    let sql = select("users")
        .and_where(col("id").unwrap().in_subquery(banned))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE (`id` IN (SELECT `user_id` FROM `banned`))"
    );
}

#[test]
fn test_invalid_subquery_fails_outer_build() {
    let bad = select("bad table");
    let err = select("users")
        .and_where(col("id").unwrap().in_subquery(bad))
        .build(&spanner())
        .unwrap_err();
    assert!(err.is_invalid_expression());
}

#[test]
fn test_explicit_placeholder_binds_in_inline_mode() {
    let built = select("t")
        .and_where(col("a").unwrap().eq(param(5)))
        .and_where(col("b").unwrap().eq(val(6)))
        .build(&spanner())
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM `t` WHERE ((`a` = ?) AND (`b` = 6))");
    assert_eq!(built.params, vec![Value::Int(5)]);
}

#[test]
fn test_spanner_string_escapes() {
    let sql = select("t")
        .eq("name", r"O'Brien\")
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, r"SELECT * FROM `t` WHERE (`name` = 'O\'Brien\\')");
}

#[test]
fn test_window_function() {
    let rn = func("ROW_NUMBER", vec![])
        .unwrap()
        .over(
            Window::new()
                .partition_by(col("k").unwrap())
                .order_by(col("ts").unwrap().desc()),
        )
        .alias("rn")
        .unwrap();
    let qb = select("t").select_exprs(vec![col("k").unwrap(), rn]);

    assert_eq!(
        qb.to_sql(&spanner()).unwrap(),
        "SELECT `k`, ROW_NUMBER() OVER (PARTITION BY `k` ORDER BY `ts` DESC) AS `rn` FROM `t`"
    );

    let d = Dialect::new("nowin", DialectOptions::default().supports_window_function(false));
    assert_eq!(
        qb.build(&d).unwrap_err(),
        SqlError::unsupported(Capability::WindowFunction, "nowin")
    );
}

#[test]
fn test_params_follow_text_order_across_clauses() {
    let built = update("t")
        .set("a", 1)
        .set("b", Option::<i32>::None)
        .eq("id", 2)
        .prepared(true)
        .build(&Dialect::postgres())
        .unwrap();
    assert_eq!(
        built.sql,
        r#"UPDATE "t" SET "a" = $1, "b" = NULL WHERE ("id" = $2)"#
    );
    assert_eq!(built.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_placeholder_count_matches_params() {
    let built = select("orders")
        .in_list("status", ["new", "paid"])
        .between("total", 10.5, 99.5)
        .and_where(Expr::literal("created_at > ?", vec![val("2024-01-01")]).unwrap())
        .limit(5)
        .offset(10)
        .prepared(true)
        .build(&spanner())
        .unwrap();
    assert_eq!(built.sql.matches('?').count(), built.params.len());
    assert_eq!(built.params.len(), 7);
}

#[test]
fn test_build_is_idempotent() {
    let qb = select("t").eq("a", "x").order_by_asc("a").prepared(true);
    let d = spanner();
    assert_eq!(qb.build(&d).unwrap(), qb.build(&d).unwrap());
}

#[test]
fn test_insert_from_select() {
    let sql = insert("archive")
        .columns(&["id"])
        .from_select(select("users").select(&["id"]).lt("age", 0))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `archive` (`id`) SELECT `id` FROM `users` WHERE (`age` < 0)"
    );
}

#[test]
fn test_delete_basic() {
    let sql = delete("users").eq("id", 1i64).to_sql(&spanner()).unwrap();
    assert_eq!(sql, "DELETE FROM `users` WHERE (`id` = 1)");
}

#[test]
fn test_unsupported_build_returns_no_sql() {
    let result = select("t")
        .distinct_on(vec![col("a").unwrap()])
        .build(&spanner());
    assert!(matches!(
        result,
        Err(SqlError::UnsupportedConstruct {
            construct: Capability::DistinctOn,
            ..
        })
    ));
}

#[test]
fn test_empty_group_in_operand_position_is_rejected() {
    let cases = vec![
        ("not", select("t").and_where(not(and(vec![])))),
        (
            "join on",
            select("t").inner_join("b", or(vec![])),
        ),
        ("comparison rhs", select("t").and_where(col("a").unwrap().eq(and(vec![])))),
        (
            "function arg",
            select("t").select_exprs(vec![func("F", vec![and(vec![])]).unwrap()]),
        ),
        ("select item", select("t").select_exprs(vec![or(vec![and(vec![])])])),
        (
            "empty list outside IN",
            select("t").and_where(col("a").unwrap().eq(Value::List(vec![]))),
        ),
        (
            "empty bound list",
            select("t").and_where(col("a").unwrap().eq(param(Value::List(vec![])))),
        ),
    ];

    for (description, qb) in cases {
        let err = qb.build(&spanner()).unwrap_err();
        assert!(err.is_invalid_expression(), "{description}: {err}");
    }
}

#[test]
fn test_empty_groups_still_dropped_from_where() {
    let sql = select("t")
        .and_where(and(vec![]))
        .and_where(or(vec![and(vec![])]))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `t`");

    let sql = select("t")
        .and_where(and(vec![col("a").unwrap().eq(1), or(vec![])]))
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `t` WHERE (`a` = 1)");
}

#[test]
fn test_hand_built_nodes_are_checked_at_render() {
    use crate::ident::{Ident, IdentPart};

    let bad_func = Expr::Func {
        name: "DROP TABLE x; --".into(),
        args: vec![],
    };
    let err = select("t")
        .select_exprs(vec![bad_func])
        .build(&spanner())
        .unwrap_err();
    assert!(err.is_invalid_expression());

    let empty_part = Expr::Ident(Ident {
        parts: vec![IdentPart::Name(String::new())],
    });
    let err = select("t")
        .and_where(empty_part.eq(1))
        .build(&spanner())
        .unwrap_err();
    assert!(err.is_invalid_expression());

    let star_first = Ident {
        parts: vec![IdentPart::Star, IdentPart::Name("a".into())],
    };
    let err = update("t")
        .set("a", Expr::Ident(star_first))
        .build(&spanner())
        .unwrap_err();
    assert!(err.is_invalid_expression());
}

#[test]
fn test_spanner_escapes_control_characters_and_identifiers() {
    let sql = select("t")
        .eq("note", "line1\nline2")
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, r"SELECT * FROM `t` WHERE (`note` = 'line1\nline2')");

    let sql = select("t")
        .select_exprs(vec![Expr::Ident(crate::ident::Ident::name("we`ird").unwrap())])
        .to_sql(&spanner())
        .unwrap();
    assert_eq!(sql, r"SELECT `we\`ird` FROM `t`");
}
