//! Process-wide driver sharing. Kept in its own test binary: the registry
//! is global and the first config seen wins.

use sqlrow::{Driver, DriverConfig, FieldMap, Record, SqliteDriver};
use std::sync::Arc;

#[test]
fn first_config_wins_across_facades() {
    let first = DriverConfig::default().prefix("a_");
    let second = DriverConfig::database("/definitely/not/used.db").prefix("b_");

    let users = Record::shared::<SqliteDriver>("users", &first);
    let posts = Record::shared::<SqliteDriver>("posts", &second);

    assert!(Arc::ptr_eq(users.driver(), posts.driver()));
    assert_eq!(posts.driver().config(), first);

    // Each facade keeps the prefix of the config it was given.
    assert_eq!(users.table().qualified(), "a_users");
    assert_eq!(posts.table().qualified(), "b_posts");

    // The second config's database path was never opened.
    users
        .driver()
        .execute("CREATE TABLE b_posts (id INTEGER PRIMARY KEY, title TEXT)", &[]);
    let id = posts.add(&FieldMap::new().set("title", "shared"));
    assert_eq!(id, 1);
    assert_eq!(users.error(), None);
}
