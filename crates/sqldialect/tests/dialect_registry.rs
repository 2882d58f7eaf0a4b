use std::sync::Arc;
use std::thread;

use sqldialect::qb::{self, col};
use sqldialect::{
    BytesFormat, Dialect, DialectOptions, DialectRegistry, SqlError, Value,
    default_dialect_options,
};

#[test]
fn register_then_build() {
    let mut registry = DialectRegistry::new();
    registry
        .register("mysqlish", default_dialect_options().quote_char('`'))
        .unwrap();

    let built = registry
        .build(qb::select("users").eq("id", 1), "mysqlish")
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM `users` WHERE (`id` = 1)");
    assert!(built.params.is_empty());
}

#[test]
fn duplicate_registration_keeps_first() {
    let mut registry = DialectRegistry::with_builtin_dialects();
    let err = registry
        .register("spanner", DialectOptions::default())
        .unwrap_err();
    assert_eq!(err, SqlError::DialectAlreadyRegistered("spanner".into()));
    assert_eq!(registry.resolve("spanner").unwrap().options().quote_char, '`');
}

#[test]
fn unknown_dialect() {
    let registry = DialectRegistry::new();
    let err = registry.build(qb::select("t"), "nope").unwrap_err();
    assert_eq!(err, SqlError::DialectNotFound("nope".into()));
}

#[test]
fn dialect_from_toml() {
    let options = DialectOptions::from_toml_str(
        r#"
        quote_char = "`"

        [placeholder]
        fragment = "@p"
        numbered = true

        [literals]
        true_literal = "1"
        false_literal = "0"

        [literals.bytes]
        style = "hex"

        [capabilities]
        supports_returning = false
        "#,
    )
    .unwrap();

    let mut registry = DialectRegistry::new();
    registry.register("custom", options).unwrap();

    let built = registry
        .build(
            qb::update("flags")
                .set("on", true)
                .eq("id", 9)
                .prepared(true),
            "custom",
        )
        .unwrap();
    assert_eq!(built.sql, "UPDATE `flags` SET `on` = @p1 WHERE (`id` = @p2)");
    assert_eq!(built.params, vec![Value::Bool(true), Value::Int(9)]);

    let inline = registry
        .build(qb::select("flags").eq("on", false), "custom")
        .unwrap();
    assert_eq!(inline.sql, "SELECT * FROM `flags` WHERE (`on` = 0)");

    let err = registry
        .build(qb::delete("flags").returning(&["id"]), "custom")
        .unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn same_tree_different_dialects() {
    let query = qb::select("public.users")
        .select(&["id"])
        .and_where(col("blob").unwrap().eq(Value::bytes(vec![0xde, 0xad])));

    let default = Dialect::default_dialect().build(query.clone()).unwrap();
    let spanner = Dialect::spanner().build(query.clone()).unwrap();
    let postgres = Dialect::postgres().build(query).unwrap();

    assert_eq!(
        default.sql,
        r#"SELECT "id" FROM "public"."users" WHERE ("blob" = X'dead')"#
    );
    assert_eq!(
        spanner.sql,
        r"SELECT `id` FROM `public`.`users` WHERE (`blob` = b'\xde\xad')"
    );
    assert_eq!(
        postgres.sql,
        r#"SELECT "id" FROM "public"."users" WHERE ("blob" = '\xdead')"#
    );
    assert_eq!(
        DialectOptions::postgres().literals.bytes,
        BytesFormat::Bytea
    );
}

#[test]
fn shared_registry_across_threads() {
    let registry = Arc::new(DialectRegistry::with_builtin_dialects());
    let expected = registry
        .build(qb::select("t").eq("k", "v"), "spanner")
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .build(qb::select("t").eq("k", "v"), "spanner")
                    .unwrap()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
