mod common;

use common::RecordingDriver;
use sqlrow::{Clause, Condition, FieldMap, Record, Row, Table, Value, params};
use std::sync::Arc;

fn record(driver: &Arc<RecordingDriver>) -> Record {
    Record::new(Table::new("posts", "blog_"), driver.clone())
}

#[test]
fn add_quotes_columns_and_binds_values() {
    let driver = Arc::new(RecordingDriver::default());
    let id = record(&driver).add(&FieldMap::new().set("title", "t").set("views", 0));

    assert_eq!(id, 42);
    let (sql, params) = driver.last();
    assert_eq!(sql, "INSERT INTO blog_posts (`title`,`views`) VALUES (?,?)");
    assert_eq!(params, params!["t", 0]);
}

#[test]
fn update_values_binds_set_before_condition() {
    let driver = Arc::new(RecordingDriver::default());
    let affected = record(&driver).update_values(
        &FieldMap::new().set("title", "new"),
        vec![("author_id = ?", "and"), ("draft = 1", "or")],
        &params![7],
    );

    assert_eq!(affected, 1);
    let (sql, params) = driver.last();
    assert_eq!(
        sql,
        "UPDATE blog_posts SET `title` = ? WHERE author_id = ? OR draft = 1"
    );
    assert_eq!(params, params!["new", 7]);
}

#[test]
fn update_by_id_casts_the_id() {
    let driver = Arc::new(RecordingDriver::default());
    record(&driver).update_by_id("5; DROP TABLE posts", &FieldMap::new().set("title", "x"));
    assert_eq!(
        driver.last().0,
        "UPDATE blog_posts SET `title` = ? WHERE id = 5"
    );
}

#[test]
fn update_one_forms() {
    let driver = Arc::new(RecordingDriver::default());
    let posts = record(&driver);

    posts.update_one("views", "id = 5", 1, &[]);
    posts.update_one("views", "id = 5", -3, &[]);
    posts.update_one(vec![("likes", "+ 2"), ("dislikes", "-1")], "id = ?", 0, &params![5]);

    assert_eq!(
        driver.statements(),
        [
            "UPDATE blog_posts SET `views` = `views` + 1 WHERE id = 5",
            "UPDATE blog_posts SET `views` = `views` - 3 WHERE id = 5",
            "UPDATE blog_posts SET `likes` = `likes` + 2,`dislikes` = `dislikes` -1 WHERE id = ?",
        ]
    );
}

#[test]
fn update_bool_toggles_in_sql() {
    let driver = Arc::new(RecordingDriver::default());
    record(&driver).update_bool("published", "id = 1", &[]);
    assert_eq!(
        driver.last().0,
        "UPDATE blog_posts SET `published` = CASE WHEN `published` = 1 THEN 0 ELSE 1 END WHERE id = 1"
    );
}

#[test]
fn find_assembles_projection_and_clauses() {
    let driver = Arc::new(RecordingDriver::default());
    let clause = Clause::new()
        .limit_range(0, 20)
        .order_by("p.id desc")
        .filter("p.author_id = ?")
        .left_join("users u", "u.id = p.author_id");
    record(&driver).find(&clause, vec![("author", "u.name"), ("title", "p.title")], &params![3]);

    let (sql, params) = driver.last();
    assert_eq!(
        sql,
        "SELECT u.name AS author,p.title AS title FROM blog_posts \
         LEFT JOIN blog_users u ON u.id = p.author_id \
         WHERE p.author_id = ? ORDER BY p.id desc LIMIT 0,20"
    );
    assert_eq!(params, params![3]);
}

#[test]
fn find_one_and_find_by_id_limit_to_one() {
    let driver = Arc::new(RecordingDriver::with_rows(vec![Row::from_pairs([(
        "id",
        Value::Int(9),
    )])]));
    let posts = record(&driver);

    let row = posts.find_one("slug = ?", "", &params!["hello"]).unwrap();
    assert_eq!(row.get("id"), Some(&Value::Int(9)));
    assert!(posts.find_by_id(9, vec!["id"]).is_some());

    assert_eq!(
        driver.statements(),
        [
            "SELECT * FROM blog_posts WHERE slug = ? LIMIT 1",
            "SELECT id FROM blog_posts WHERE id = 9 LIMIT 1",
        ]
    );
}

#[test]
fn count_and_scalar_sql() {
    let driver = Arc::new(RecordingDriver::with_rows(vec![Row::from_pairs([(
        "count",
        Value::Int(4),
    )])]));
    let posts = record(&driver);

    assert_eq!(posts.count("draft = 0", &[]), Some(4));
    assert_eq!(posts.count_by("", "DISTINCT author_id", &[]), Some(4));
    assert_eq!(
        posts.scalar(&Clause::new().filter("id = 1"), "title", &[]),
        Some(Value::Int(4))
    );

    assert_eq!(
        driver.statements(),
        [
            "SELECT COUNT(id) AS count FROM blog_posts WHERE draft = 0 LIMIT 1",
            "SELECT COUNT(DISTINCT author_id) AS count FROM blog_posts LIMIT 1",
            "SELECT title FROM blog_posts WHERE id = 1",
        ]
    );
}

#[test]
fn delete_sql() {
    let driver = Arc::new(RecordingDriver::default());
    let posts = record(&driver);
    posts.delete_values(Condition::new().and("draft = 1").and("views < ?"), &params![10]);
    posts.delete_by_id(3u32);
    assert_eq!(
        driver.statements(),
        [
            "DELETE FROM blog_posts WHERE draft = 1 AND views < ?",
            "DELETE FROM blog_posts WHERE id = 3",
        ]
    );
}

#[test]
fn mutations_without_condition_are_refused() {
    let driver = Arc::new(RecordingDriver::default());
    let posts = record(&driver);

    assert_eq!(posts.delete_values("", &[]), 0);
    assert!(posts.error().unwrap().contains("requires a non-empty condition"));

    // A condition made only of unknown connectives compiles to nothing.
    assert_eq!(posts.update_one("views", vec![("id = 1", "xor")], 1, &[]), 0);
    assert_eq!(
        posts.update_values(&FieldMap::new().set("a", 1), Condition::new(), &[]),
        0
    );
    assert_eq!(posts.update_bool("flag", "", &[]), 0);

    assert!(driver.statements().is_empty());
}

#[test]
fn empty_or_invalid_fields_are_refused() {
    let driver = Arc::new(RecordingDriver::default());
    let posts = record(&driver);

    assert_eq!(posts.add(&FieldMap::new()), 0);
    assert!(posts.error().is_some());
    assert_eq!(posts.update_values(&FieldMap::new(), "id = 1", &[]), 0);
    assert_eq!(posts.add(&FieldMap::new().set("title; --", "x")), 0);
    assert_eq!(posts.update_one("bad col", "id = 1", 1, &[]), 0);

    assert!(driver.statements().is_empty());

    // The next statement clears the recorded error.
    posts.delete_by_id(1);
    assert_eq!(posts.error(), None);
}
