//! Rendering against the built-in `spanner` dialect.

use sqldialect::qb::{self, Expr, avg, col, count, max, star, table, val};
use sqldialect::{Capability, DialectRegistry, SPANNER_DIALECT, SelectQb, SqlError, build_statement};

fn build(qb: SelectQb) -> Result<String, SqlError> {
    let registry = DialectRegistry::with_builtin_dialects();
    build_statement(&registry, qb, SPANNER_DIALECT).map(|b| b.sql)
}

#[test]
fn select_cases() {
    let cases: Vec<(&str, SelectQb, &str)> = vec![
        ("select star", qb::select("table"), "SELECT * FROM `table`"),
        (
            "select columns",
            qb::select("table").select(&["a", "b", "c"]),
            "SELECT `a`, `b`, `c` FROM `table`",
        ),
        (
            "select literal and alias",
            qb::select("table")
                .select_exprs(vec![
                    qb::lit("a + b").unwrap().alias("sum").unwrap(),
                    col("c").unwrap().alias("cc").unwrap(),
                ])
                .eq("a", 3)
                .is_not_null("b")
                .gt("cc", 2),
            "SELECT a + b AS `sum`, `c` AS `cc` FROM `table` \
             WHERE ((`a` = 3) AND (`b` IS NOT NULL) AND (`cc` > 2))",
        ),
        (
            "select count and functions",
            qb::select_from(table("table").unwrap().alias("the_table").unwrap())
                .order_by(col("age").unwrap().desc())
                .select_exprs(vec![
                    count(star()).alias("age_count").unwrap(),
                    max(col("age").unwrap()).alias("max_age").unwrap(),
                    avg(col("age").unwrap()).alias("avg_age").unwrap(),
                ]),
            "SELECT COUNT(*) AS `age_count`, MAX(`age`) AS `max_age`, AVG(`age`) AS `avg_age` \
             FROM `table` AS `the_table` ORDER BY `age` DESC",
        ),
        (
            "select sub query",
            qb::select_from(
                qb::select("sub_table")
                    .gt("age", 10)
                    .alias("temp_table")
                    .unwrap(),
            ),
            "SELECT * FROM (SELECT * FROM `sub_table` WHERE (`age` > 10)) AS `temp_table`",
        ),
        (
            "select distinct column",
            qb::select("table")
                .select_exprs(vec![
                    Expr::literal("COALESCE(?, ?)", vec![col("a").unwrap(), val("empty")]).unwrap(),
                ])
                .distinct(),
            "SELECT DISTINCT COALESCE(`a`, 'empty') FROM `table`",
        ),
        (
            "select in (not unnest)",
            qb::select("table").in_list("col", ["a", "b", "c"]),
            "SELECT * FROM `table` WHERE (`col` IN ('a', 'b', 'c'))",
        ),
        (
            "select literal and identifier",
            qb::select("table").and_where(
                Expr::literal(
                    "(? AND ?) OR (?)",
                    vec![
                        col("a").unwrap().eq(1),
                        col("b").unwrap().eq("b"),
                        col("c").unwrap().in_list(["a", "b", "c"]),
                    ],
                )
                .unwrap(),
            ),
            "SELECT * FROM `table` WHERE ((`a` = 1) AND (`b` = 'b')) OR ((`c` IN ('a', 'b', 'c')))",
        ),
        (
            "schema qualified table",
            qb::select("db.table").select(&["t.a"]),
            "SELECT `t`.`a` FROM `db`.`table`",
        ),
    ];

    for (description, qb, expected) in cases {
        assert_eq!(build(qb).unwrap(), expected, "{description}");
    }
}

#[test]
fn not_supported_cases() {
    let cases: Vec<(&str, SelectQb, Capability)> = vec![(
        "select distinct on",
        qb::select("table").distinct_on(vec![
            Expr::literal("COALESCE(?, ?)", vec![col("a").unwrap(), val("empty")]).unwrap(),
        ]),
        Capability::DistinctOn,
    )];

    for (description, qb, construct) in cases {
        let err = build(qb).unwrap_err();
        assert_eq!(
            err,
            SqlError::UnsupportedConstruct {
                construct,
                dialect: SPANNER_DIALECT.to_string(),
            },
            "{description}"
        );
    }
}

#[test]
fn mutations_rejected_by_spanner() {
    let registry = DialectRegistry::with_builtin_dialects();

    let returning = qb::insert("t").set("a", 1).returning(&["a"]);
    assert!(registry.build(returning, "spanner").unwrap_err().is_unsupported());

    let multi_table = qb::update("a").set("x", 1).from("b");
    assert!(registry.build(multi_table, "spanner").unwrap_err().is_unsupported());

    let delete_limit = qb::delete("t").limit(1);
    assert!(registry.build(delete_limit, "spanner").unwrap_err().is_unsupported());
}
